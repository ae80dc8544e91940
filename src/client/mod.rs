//! Attendance Client
//!
//! The user-facing layer: bootstrap, input store, the five dispatchers,
//! count display state and the [`App`] shell that wires them together.

pub mod bootstrap;
mod context;
pub mod dispatch;
mod display;
mod error;
mod inputs;
mod notify;
pub mod render;
mod app;

pub use app::App;
pub use bootstrap::BOOTSTRAP_FAILED;
pub use context::ClientContext;
pub use display::{DisplayGroup, DisplaySnapshot, PerStatus};
pub use error::{BootstrapError, ClientError, ClientResult, InputError};
pub use inputs::{parse_address, InputBag, InputField, RangeQuery, DATE_FORMAT};
pub use notify::{ConsoleNotifier, Notifier, RecordingNotifier};
