//! # Attendance
//!
//! Client for an employee attendance smart contract. The contract owns the
//! ledger and its rules; this crate collects input, calls the contract
//! through a wallet provider, and renders what comes back.
//!
//! ## Modules
//!
//! - [`abi`]: Contract artifacts and Solidity ABI encoding
//! - [`provider`]: JSON-RPC wallet/node access
//! - [`contract`]: The attendance contract surface, bound or local
//! - [`client`]: Bootstrap, inputs, dispatchers and count display
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use attendance::client::{bootstrap, App, ConsoleNotifier, InputField};
//! use attendance::{AttendanceStatus, Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let ctx = bootstrap::connect(&config).await?;
//!     let mut app = App::new(ctx, &config.display, Arc::new(ConsoleNotifier));
//!
//!     app.set_input(InputField::Address, "0x32F44FE78943a60250Bc7E4BBf7695A1c5a72E8B")?;
//!     app.set_input(InputField::Name, "Jane Doe")?;
//!     app.set_input(InputField::Age, "28")?;
//!     app.set_input(InputField::Number, "77")?;
//!     app.add_employee().await?;
//!
//!     app.mark_attendance(AttendanceStatus::Present).await?;
//!     let present = app.show_daily_count(AttendanceStatus::Present).await?;
//!     println!("{} present today", present);
//!
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod client;
pub mod clock;
pub mod config;
pub mod contract;
pub mod provider;
pub mod types;

// Re-export top-level types for convenience
pub use abi::{Address, AbiError, ContractArtifact};

pub use client::{App, BootstrapError, ClientContext, ClientError, ClientResult, InputError};

pub use clock::{Clock, FixedClock, SystemClock};

pub use config::{Config, ConfigError, LoggingConfig};

pub use contract::{AttendanceContract, ContractBinding, ContractError, LocalLedger};

pub use provider::{JsonRpcProvider, Provider, ProviderError};

pub use types::{AttendanceStatus, EmployeeRecord, NewEmployee};
