//! Alerts
//!
//! Dispatch outcomes reach the user as one-line alerts.

use std::sync::Mutex;

/// Sink for user-facing alerts
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints alerts to stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        tracing::debug!(message, "Alert");
        println!("{}", message);
    }
}

/// Keeps alerts in memory, newest last
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts so far
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.alerts().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}
