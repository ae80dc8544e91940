//! ABI binding for a deployed attendance contract
//!
//! Parameter and return types come from the artifact ABI; only method and
//! event names plus argument positions are fixed here.

use super::*;
use crate::abi::{Abi, AbiValue, Function};
use crate::provider::{CallRequest, Provider, TransactionReceipt};
use std::sync::Arc;

/// Event emitted by `addEmployee`
pub const EVENT_EMPLOYEE_ADDED: &str = "EmployeeAdded";
/// Event emitted by `updateAttendance`
pub const EVENT_ATTENDANCE_UPDATED: &str = "EmployeeAttendanceUpdated";

const NAME_INDEX: usize = 1;
const STATUS_INDEX: usize = 2;

/// Attendance contract reached through a provider
pub struct ContractBinding {
    provider: Arc<dyn Provider>,
    abi: Abi,
    address: Address,
}

impl ContractBinding {
    pub fn new(provider: Arc<dyn Provider>, abi: Abi, address: Address) -> Self {
        Self {
            provider,
            abi,
            address,
        }
    }

    async fn call(&self, from: Address, function: &Function, args: &[AbiValue]) -> ContractResult<Vec<AbiValue>> {
        if function.is_mutating() {
            return Err(ContractError::Mutability(function.signature()));
        }
        let request = CallRequest {
            from: Some(from),
            to: self.address,
            data: function.encode_input(args)?,
        };

        tracing::debug!(function = %function.signature(), "eth_call");
        let output = self.provider.call(&request).await?;
        Ok(function.decode_output(&output)?)
    }

    async fn transact(&self, from: Address, function: &Function, args: &[AbiValue]) -> ContractResult<TransactionReceipt> {
        if !function.is_mutating() {
            return Err(ContractError::Mutability(function.signature()));
        }
        let request = CallRequest {
            from: Some(from),
            to: self.address,
            data: function.encode_input(args)?,
        };

        tracing::debug!(function = %function.signature(), from = %from, "eth_sendTransaction");
        Ok(self.provider.send_transaction(&request).await?)
    }

    /// Decode the first log of `event_name` emitted by this contract
    fn event_values(&self, receipt: &TransactionReceipt, event_name: &str) -> ContractResult<Vec<AbiValue>> {
        let event = self.abi.event(event_name)?;

        let log = receipt
            .logs
            .iter()
            .find(|log| log.address == self.address && event.matches(&log.topics))
            .ok_or_else(|| ContractError::MissingEvent(event_name.to_string()))?;

        Ok(event.decode_log(&log.topics, &log.data)?)
    }
}

fn value_at(values: &[AbiValue], index: usize, what: &str) -> ContractResult<AbiValue> {
    values
        .get(index)
        .cloned()
        .ok_or_else(|| ContractError::UnexpectedOutput(format!("missing {}", what)))
}

fn status_code(value: &AbiValue) -> ContractResult<u8> {
    u8::try_from(value.as_uint()?)
        .map_err(|_| ContractError::UnexpectedOutput("status code exceeds u8".to_string()))
}

#[async_trait]
impl AttendanceContract for ContractBinding {
    async fn add_employee(&self, from: Address, employee: &NewEmployee, day: u64) -> ContractResult<String> {
        let function = self.abi.function("addEmployee")?;
        let args = [
            AbiValue::Address(employee.address),
            AbiValue::String(employee.name.clone()),
            AbiValue::Uint(employee.age.into()),
            AbiValue::Uint(employee.number.into()),
            AbiValue::Uint(day.into()),
        ];

        let receipt = self.transact(from, function, &args).await?;
        let values = self.event_values(&receipt, EVENT_EMPLOYEE_ADDED)?;
        let name = value_at(&values, NAME_INDEX, "employee name")?;
        Ok(name.as_str()?.to_string())
    }

    async fn update_attendance(&self, from: Address, employee: Address, day: u64, status: u8) -> ContractResult<u8> {
        let function = self.abi.function("updateAttendance")?;
        let args = [
            AbiValue::Address(employee),
            AbiValue::Uint(day.into()),
            AbiValue::Uint(status.into()),
        ];

        let receipt = self.transact(from, function, &args).await?;
        let values = self.event_values(&receipt, EVENT_ATTENDANCE_UPDATED)?;
        status_code(&value_at(&values, STATUS_INDEX, "attendance status")?)
    }

    async fn get_employee(&self, from: Address, employee: Address) -> ContractResult<EmployeeRecord> {
        let function = self.abi.function("getEmployee")?;
        let values = self.call(from, function, &[AbiValue::Address(employee)]).await?;

        if values.len() < 5 {
            return Err(ContractError::UnexpectedOutput(format!(
                "getEmployee returned {} values, expected 5",
                values.len()
            )));
        }

        Ok(EmployeeRecord {
            name: values[0].as_str()?.to_string(),
            age: values[1].as_u64()?,
            employee_number: values[2].as_u64()?,
            date_of_joining: values[3].as_u64()?,
            todays_attendance: status_code(&values[4])?,
        })
    }

    async fn get_daily_attendance(&self, from: Address, day: u64, status: u8) -> ContractResult<u64> {
        let function = self.abi.function("getDailyAttendance")?;
        let values = self
            .call(from, function, &[AbiValue::Uint(day.into()), AbiValue::Uint(status.into())])
            .await?;
        Ok(value_at(&values, 0, "attendance count")?.as_u64()?)
    }

    async fn get_attendance_by_date_range(
        &self,
        from: Address,
        employee: Address,
        start: u64,
        end: u64,
    ) -> ContractResult<Vec<u8>> {
        let function = self.abi.function("getAttendanceByDateRange")?;
        let args = [
            AbiValue::Address(employee),
            AbiValue::Uint(start.into()),
            AbiValue::Uint(end.into()),
        ];
        let values = self.call(from, function, &args).await?;
        let days = value_at(&values, 0, "attendance array")?;
        days.as_array()?.iter().map(status_code).collect()
    }
}
