//! Attendance Contract
//!
//! The contract owns the attendance ledger and its rules. This module exposes
//! its method surface as a trait with two implementations:
//! - [`ContractBinding`]: ABI calls through a [`Provider`](crate::provider::Provider)
//! - [`LocalLedger`]: an in-process ledger enforcing the same rules

mod binding;
mod error;
mod ledger;

pub use binding::{ContractBinding, EVENT_EMPLOYEE_ADDED, EVENT_ATTENDANCE_UPDATED};
pub use error::{ContractError, ContractResult};
pub use ledger::{LocalLedger, local_accounts};

use crate::abi::Address;
use crate::types::{EmployeeRecord, NewEmployee};
use async_trait::async_trait;

/// Method surface of the attendance contract
///
/// Day arguments are day indices. Status arguments are raw codes so that
/// out-of-range values reach the contract and are rejected there.
#[async_trait]
pub trait AttendanceContract: Send + Sync {
    /// Register an employee; returns the stored name from `EmployeeAdded`
    async fn add_employee(
        &self,
        from: Address,
        employee: &NewEmployee,
        day: u64,
    ) -> ContractResult<String>;

    /// Record attendance; returns the status code from `EmployeeAttendanceUpdated`
    async fn update_attendance(
        &self,
        from: Address,
        employee: Address,
        day: u64,
        status: u8,
    ) -> ContractResult<u8>;

    /// Read one employee record
    async fn get_employee(&self, from: Address, employee: Address) -> ContractResult<EmployeeRecord>;

    /// Number of employees with `status` on `day`
    async fn get_daily_attendance(&self, from: Address, day: u64, status: u8) -> ContractResult<u64>;

    /// Per-day status codes for `employee` from `start` to `end` inclusive
    async fn get_attendance_by_date_range(
        &self,
        from: Address,
        employee: Address,
        start: u64,
        end: u64,
    ) -> ContractResult<Vec<u8>>;
}
