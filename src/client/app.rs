//! Application Shell
//!
//! Owns everything a session needs: the context, the input bag, the last
//! looked-up employee and both count groups. Each public action is one user
//! gesture; its outcome is always alerted and also returned to the caller.

use super::context::ClientContext;
use super::display::DisplayGroup;
use super::dispatch;
use super::error::{ClientError, ClientResult, InputError};
use super::inputs::{InputBag, InputField};
use super::notify::Notifier;
use crate::config::DisplayConfig;
use crate::types::{AttendanceStatus, EmployeeRecord};
use std::sync::Arc;

pub struct App {
    ctx: ClientContext,
    inputs: InputBag,
    employee: Option<EmployeeRecord>,
    daily: DisplayGroup,
    range: DisplayGroup,
    notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(ctx: ClientContext, display: &DisplayConfig, notifier: Arc<dyn Notifier>) -> Self {
        let inputs = InputBag::new(ctx.clock.today());
        Self {
            ctx,
            inputs,
            employee: None,
            daily: DisplayGroup::new("daily", display.auto_hide()),
            range: DisplayGroup::new("range", display.auto_hide()),
            notifier,
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    pub fn inputs(&self) -> &InputBag {
        &self.inputs
    }

    /// Update one input field
    pub fn set_input(&mut self, field: InputField, value: &str) -> Result<(), InputError> {
        self.inputs.set(field, value)
    }

    /// Employee shown by the last successful lookup
    pub fn employee(&self) -> Option<&EmployeeRecord> {
        self.employee.as_ref()
    }

    pub fn daily(&self) -> &DisplayGroup {
        &self.daily
    }

    pub fn range(&self) -> &DisplayGroup {
        &self.range
    }

    /// Submit the add-employee form; clears it on success only
    pub async fn add_employee(&mut self) -> ClientResult<String> {
        let result = match self.inputs.new_employee() {
            Ok(employee) => dispatch::add_employee(&self.ctx, &employee).await,
            Err(e) => Err(e.into()),
        };

        let name = self.report(result)?;
        self.notifier.alert(&format!("{} added successfully", name));
        self.inputs.clear_employee_form();
        Ok(name)
    }

    /// Mark today's attendance for the current account
    pub async fn mark_attendance(&self, status: AttendanceStatus) -> ClientResult<AttendanceStatus> {
        let recorded = self.report(dispatch::update_attendance(&self.ctx, status).await)?;
        self.notifier.alert(&format!("Marked {}", recorded));
        Ok(recorded)
    }

    /// Look up the employee in the `getEmployee` field
    pub async fn lookup_employee(&mut self) -> ClientResult<EmployeeRecord> {
        let result = match self.inputs.lookup_address() {
            Ok(address) => dispatch::get_employee(&self.ctx, address).await,
            Err(e) => Err(e.into()),
        };

        match self.report(result) {
            Ok(record) => {
                self.employee = Some(record.clone());
                Ok(record)
            }
            Err(e) => {
                self.employee = None;
                Err(e)
            }
        }
    }

    /// Fetch today's count for `status` and show it in the daily group
    pub async fn show_daily_count(&self, status: AttendanceStatus) -> ClientResult<u64> {
        let count = self.report(dispatch::daily_count(&self.ctx, status).await)?;
        self.daily.show(status, count).await;
        Ok(count)
    }

    /// Count `status` days over the input range and show it in the range group
    pub async fn show_range_count(&self, status: AttendanceStatus) -> ClientResult<u64> {
        let result = match self.inputs.range_query() {
            Ok(query) => dispatch::range_count(&self.ctx, &query, status).await,
            Err(e) => Err(e.into()),
        };

        let count = self.report(result)?;
        self.range.show(status, count).await;
        Ok(count)
    }

    /// Alert and log a failure, passing the result through
    fn report<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            match e {
                ClientError::Input(_) => tracing::debug!(error = %e, "Input rejected"),
                _ => tracing::warn!(error = %e, "Contract call failed"),
            }
            self.notifier.alert(&e.to_string());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::bootstrap;
    use crate::client::notify::RecordingNotifier;
    use crate::clock::{Clock, FixedClock};
    use crate::config::Config;
    use chrono::NaiveDate;
    use std::time::Duration;

    const JANE: &str = "0x00000000000000000000000000000000000000aa";

    fn app() -> (App, Arc<RecordingNotifier>) {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        let config = Config::default();
        let ctx = bootstrap::local(&config, clock).unwrap();
        let notifier = Arc::new(RecordingNotifier::new());
        let app = App::new(ctx, &config.display, notifier.clone());
        (app, notifier)
    }

    fn fill_form(app: &mut App, address: &str) {
        app.set_input(InputField::Address, address).unwrap();
        app.set_input(InputField::Name, "Jane Doe").unwrap();
        app.set_input(InputField::Age, "28").unwrap();
        app.set_input(InputField::Number, "77").unwrap();
    }

    #[tokio::test]
    async fn test_add_employee_alerts_and_clears() {
        let (mut app, notifier) = app();
        fill_form(&mut app, JANE);

        let name = app.add_employee().await.unwrap();
        assert_eq!(name, "Jane Doe");
        assert_eq!(notifier.last().as_deref(), Some("Jane Doe added successfully"));
        assert!(app.inputs().address.is_empty());
        assert!(app.inputs().name.is_empty());
    }

    #[tokio::test]
    async fn test_failed_add_keeps_inputs() {
        let (mut app, notifier) = app();
        fill_form(&mut app, "0x0000000000000000000000000000000000000000");

        let err = app.add_employee().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid employee address");
        assert_eq!(notifier.last().as_deref(), Some("Invalid employee address"));
        assert_eq!(app.inputs().name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_contract() {
        let (mut app, notifier) = app();
        fill_form(&mut app, JANE);
        app.set_input(InputField::Age, "old").unwrap();

        let err = app.add_employee().await.unwrap_err();
        assert!(matches!(err, ClientError::Input(InputError::InvalidNumber { .. })));
        assert_eq!(notifier.alerts().len(), 1);

        app.set_input(InputField::GetEmployee, JANE).unwrap();
        assert!(app.lookup_employee().await.is_err());
        assert!(app.employee().is_none());
    }

    #[tokio::test]
    async fn test_mark_attendance_alert() {
        let (mut app, notifier) = app();
        let me = app.context().current_account.to_string();
        fill_form(&mut app, &me);
        app.add_employee().await.unwrap();

        let status = app.mark_attendance(AttendanceStatus::Absent).await.unwrap();
        assert_eq!(status, AttendanceStatus::Absent);
        assert_eq!(notifier.last().as_deref(), Some("Marked Absent"));
    }

    #[tokio::test]
    async fn test_mark_attendance_unregistered() {
        let (app, notifier) = app();
        assert!(app.mark_attendance(AttendanceStatus::Present).await.is_err());
        assert_eq!(notifier.last().as_deref(), Some("Employee does not exist"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_daily_count_shown_then_hidden() {
        let (mut app, _notifier) = app();
        let me = app.context().current_account.to_string();
        fill_form(&mut app, &me);
        app.add_employee().await.unwrap();
        app.mark_attendance(AttendanceStatus::Present).await.unwrap();

        assert_eq!(app.show_daily_count(AttendanceStatus::Present).await.unwrap(), 1);
        assert_eq!(
            app.daily().snapshot().await.visible_counts(),
            vec![(AttendanceStatus::Present, 1)]
        );
        assert!(app.range().snapshot().await.is_hidden());

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert!(app.daily().snapshot().await.is_hidden());
    }

    #[tokio::test]
    async fn test_range_count_failure_leaves_counters() {
        let (mut app, notifier) = app();
        app.set_input(InputField::GetMonthlyAttendance, JANE).unwrap();

        assert!(app.show_range_count(AttendanceStatus::Present).await.is_err());
        assert_eq!(notifier.last().as_deref(), Some("Employee does not exist"));
        assert_eq!(app.range().snapshot().await, Default::default());
    }
}
