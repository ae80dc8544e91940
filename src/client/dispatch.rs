//! Command Dispatchers
//!
//! Each dispatcher performs exactly one contract call and returns its result.
//! Inputs arrive already validated.

use super::context::ClientContext;
use super::error::{ClientError, ClientResult};
use super::inputs::RangeQuery;
use crate::abi::Address;
use crate::types::{AttendanceStatus, EmployeeRecord, NewEmployee};

/// Register an employee from the first account; returns the stored name
pub async fn add_employee(ctx: &ClientContext, employee: &NewEmployee) -> ClientResult<String> {
    let from = ctx.first_account()?;
    let today = ctx.today();

    tracing::info!(employee = %employee.address, day = today, "Adding employee");
    let name = ctx.contract.add_employee(from, employee, today).await?;
    Ok(name)
}

/// Mark today's attendance for the current account; returns the recorded status
pub async fn update_attendance(ctx: &ClientContext, status: AttendanceStatus) -> ClientResult<AttendanceStatus> {
    let account = ctx.current_account;
    let today = ctx.today();

    tracing::info!(account = %account, day = today, status = %status, "Updating attendance");
    let code = ctx
        .contract
        .update_attendance(account, account, today, status.code())
        .await?;

    AttendanceStatus::from_code(code).ok_or(ClientError::UnknownStatus(code))
}

/// Read one employee record
pub async fn get_employee(ctx: &ClientContext, employee: Address) -> ClientResult<EmployeeRecord> {
    tracing::debug!(employee = %employee, "Looking up employee");
    Ok(ctx.contract.get_employee(ctx.current_account, employee).await?)
}

/// Number of employees with `status` today
pub async fn daily_count(ctx: &ClientContext, status: AttendanceStatus) -> ClientResult<u64> {
    let today = ctx.today();
    let count = ctx
        .contract
        .get_daily_attendance(ctx.current_account, today, status.code())
        .await?;

    tracing::debug!(day = today, status = %status, count, "Daily count");
    Ok(count)
}

/// Number of days in the query range on which the employee had `status`
pub async fn range_count(ctx: &ClientContext, query: &RangeQuery, status: AttendanceStatus) -> ClientResult<u64> {
    let days = ctx
        .contract
        .get_attendance_by_date_range(
            ctx.current_account,
            query.employee,
            query.start_day(),
            query.end_day(),
        )
        .await?;

    let count = count_status(&days, status);
    tracing::debug!(employee = %query.employee, days = days.len(), status = %status, count, "Range count");
    Ok(count)
}

/// Entries numerically equal to the status code
pub fn count_status(days: &[u8], status: AttendanceStatus) -> u64 {
    days.iter().filter(|code| **code == status.code()).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::bootstrap;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn context() -> ClientContext {
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        bootstrap::local(&Config::default(), clock).unwrap()
    }

    fn employee(address: Address) -> NewEmployee {
        NewEmployee {
            address,
            name: "Jane Doe".into(),
            age: 28,
            number: 77,
        }
    }

    #[tokio::test]
    async fn test_add_and_get_employee() {
        let ctx = context();
        let jane = Address::from_low_u64(0xaa);

        assert_eq!(add_employee(&ctx, &employee(jane)).await.unwrap(), "Jane Doe");

        let record = get_employee(&ctx, jane).await.unwrap();
        assert_eq!(record.employee_number, 77);
        assert_eq!(record.date_of_joining, ctx.today());

        let err = add_employee(&ctx, &employee(jane)).await.unwrap_err();
        assert_eq!(err.to_string(), "Employee already exists");
    }

    #[tokio::test]
    async fn test_update_then_daily_count() {
        let ctx = context();
        add_employee(&ctx, &employee(ctx.current_account)).await.unwrap();

        let status = update_attendance(&ctx, AttendanceStatus::Leave).await.unwrap();
        assert_eq!(status, AttendanceStatus::Leave);
        assert_eq!(daily_count(&ctx, AttendanceStatus::Leave).await.unwrap(), 1);
        assert_eq!(daily_count(&ctx, AttendanceStatus::Present).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_range_count() {
        let ctx = context();
        add_employee(&ctx, &employee(ctx.current_account)).await.unwrap();
        update_attendance(&ctx, AttendanceStatus::Present).await.unwrap();

        let query = RangeQuery {
            employee: ctx.current_account,
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        assert_eq!(range_count(&ctx, &query, AttendanceStatus::Present).await.unwrap(), 1);
        assert_eq!(range_count(&ctx, &query, AttendanceStatus::Absent).await.unwrap(), 0);

        let stranger = RangeQuery {
            employee: Address::from_low_u64(0xbb),
            ..query
        };
        let err = range_count(&ctx, &stranger, AttendanceStatus::Present).await.unwrap_err();
        assert_eq!(err.to_string(), "Employee does not exist");
    }

    #[test]
    fn test_count_status() {
        let days = [1, 2, 0, 1, 3, 1];
        assert_eq!(count_status(&days, AttendanceStatus::Present), 3);
        assert_eq!(count_status(&days, AttendanceStatus::Absent), 1);
        assert_eq!(count_status(&days, AttendanceStatus::Leave), 1);
        assert_eq!(count_status(&[], AttendanceStatus::Leave), 0);
    }
}
