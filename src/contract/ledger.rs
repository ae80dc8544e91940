//! In-process attendance ledger
//!
//! Enforces the same rules and rejection messages as the deployed contract,
//! so sessions can run without a node and dispatchers can be tested end to end.

use super::*;
use crate::abi::keccak256;
use crate::clock::Clock;
use crate::types::AttendanceStatus;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const INVALID_ADDRESS: &str = "Invalid employee address";
pub const EMPLOYEE_EXISTS: &str = "Employee already exists";
pub const EMPLOYEE_MISSING: &str = "Employee does not exist";
pub const INVALID_STATUS: &str = "Invalid attendance status";
pub const INVALID_RANGE: &str = "Invalid date range";

/// Longest range a single query may span
const MAX_RANGE_DAYS: u64 = 3_660;

/// Attendance ledger held in memory
pub struct LocalLedger {
    employees: RwLock<HashMap<Address, StoredEmployee>>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
struct StoredEmployee {
    name: String,
    age: u64,
    employee_number: u64,
    date_of_joining: u64,
    /// Status code per day index
    attendance: HashMap<u64, u8>,
}

impl LocalLedger {
    /// Create an empty ledger; `clock` decides what "today" means for lookups
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            employees: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of registered employees
    pub async fn employee_count(&self) -> usize {
        self.employees.read().await.len()
    }
}

fn rejected(message: &str) -> ContractError {
    ContractError::Rejected(message.to_string())
}

/// Deterministic accounts for local sessions
pub fn local_accounts(count: usize) -> Vec<Address> {
    (0..count)
        .map(|i| {
            let hash = keccak256(format!("attendance-local-account-{}", i).as_bytes());
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&hash[12..]);
            Address(bytes)
        })
        .collect()
}

#[async_trait]
impl AttendanceContract for LocalLedger {
    async fn add_employee(&self, from: Address, employee: &NewEmployee, day: u64) -> ContractResult<String> {
        if employee.address.is_zero() {
            return Err(rejected(INVALID_ADDRESS));
        }

        let mut employees = self.employees.write().await;
        if employees.contains_key(&employee.address) {
            return Err(rejected(EMPLOYEE_EXISTS));
        }

        employees.insert(
            employee.address,
            StoredEmployee {
                name: employee.name.clone(),
                age: employee.age,
                employee_number: employee.number,
                date_of_joining: day,
                attendance: HashMap::new(),
            },
        );

        tracing::debug!(employee = %employee.address, by = %from, "Employee added to local ledger");
        Ok(employee.name.clone())
    }

    async fn update_attendance(&self, from: Address, employee: Address, day: u64, status: u8) -> ContractResult<u8> {
        if employee.is_zero() {
            return Err(rejected(INVALID_ADDRESS));
        }
        if AttendanceStatus::from_code(status).is_none() {
            return Err(rejected(INVALID_STATUS));
        }

        let mut employees = self.employees.write().await;
        let stored = employees
            .get_mut(&employee)
            .ok_or_else(|| rejected(EMPLOYEE_MISSING))?;
        stored.attendance.insert(day, status);

        tracing::debug!(employee = %employee, by = %from, day, status, "Attendance updated in local ledger");
        Ok(status)
    }

    async fn get_employee(&self, _from: Address, employee: Address) -> ContractResult<EmployeeRecord> {
        let employees = self.employees.read().await;
        let stored = employees
            .get(&employee)
            .ok_or_else(|| rejected(EMPLOYEE_MISSING))?;
        let today = self.clock.today_index();

        Ok(EmployeeRecord {
            name: stored.name.clone(),
            age: stored.age,
            employee_number: stored.employee_number,
            date_of_joining: stored.date_of_joining,
            todays_attendance: stored.attendance.get(&today).copied().unwrap_or(0),
        })
    }

    async fn get_daily_attendance(&self, _from: Address, day: u64, status: u8) -> ContractResult<u64> {
        if AttendanceStatus::from_code(status).is_none() {
            return Err(rejected(INVALID_STATUS));
        }

        let employees = self.employees.read().await;
        let count = employees
            .values()
            .filter(|e| e.attendance.get(&day) == Some(&status))
            .count();
        Ok(count as u64)
    }

    async fn get_attendance_by_date_range(
        &self,
        _from: Address,
        employee: Address,
        start: u64,
        end: u64,
    ) -> ContractResult<Vec<u8>> {
        if start > end || end - start >= MAX_RANGE_DAYS {
            return Err(rejected(INVALID_RANGE));
        }

        let employees = self.employees.read().await;
        let stored = employees
            .get(&employee)
            .ok_or_else(|| rejected(EMPLOYEE_MISSING))?;

        Ok((start..=end)
            .map(|day| stored.attendance.get(&day).copied().unwrap_or(0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    const TODAY: u64 = 19_797;

    fn ledger() -> LocalLedger {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        LocalLedger::new(Arc::new(clock))
    }

    fn owner() -> Address {
        local_accounts(1)[0]
    }

    fn jane() -> NewEmployee {
        NewEmployee {
            address: Address::from_low_u64(0xaa),
            name: "Jane Doe".into(),
            age: 28,
            number: 77,
        }
    }

    #[tokio::test]
    async fn test_add_then_lookup() {
        let ledger = ledger();
        let name = ledger.add_employee(owner(), &jane(), TODAY - 7).await.unwrap();
        assert_eq!(name, "Jane Doe");

        let record = ledger.get_employee(owner(), jane().address).await.unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.age, 28);
        assert_eq!(record.employee_number, 77);
        assert_eq!(record.date_of_joining, TODAY - 7);
        assert_eq!(record.todays_attendance, 0);
    }

    #[tokio::test]
    async fn test_zero_address_rejected() {
        let ledger = ledger();
        let employee = NewEmployee {
            address: Address::ZERO,
            ..jane()
        };
        let err = ledger.add_employee(owner(), &employee, TODAY).await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_ADDRESS);
        assert_eq!(ledger.employee_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_rejected_and_first_kept() {
        let ledger = ledger();
        ledger.add_employee(owner(), &jane(), TODAY).await.unwrap();

        let imposter = NewEmployee {
            name: "Someone Else".into(),
            age: 99,
            ..jane()
        };
        let err = ledger.add_employee(owner(), &imposter, TODAY + 1).await.unwrap_err();
        assert_eq!(err.to_string(), EMPLOYEE_EXISTS);

        let record = ledger.get_employee(owner(), jane().address).await.unwrap();
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.age, 28);
        assert_eq!(record.date_of_joining, TODAY);
    }

    #[tokio::test]
    async fn test_update_attendance_reflected_today() {
        let ledger = ledger();
        ledger.add_employee(owner(), &jane(), TODAY).await.unwrap();

        let status = ledger
            .update_attendance(owner(), jane().address, TODAY, 2)
            .await
            .unwrap();
        assert_eq!(status, 2);

        let record = ledger.get_employee(owner(), jane().address).await.unwrap();
        assert_eq!(record.todays_attendance, 2);
    }

    #[tokio::test]
    async fn test_update_attendance_rejections() {
        let ledger = ledger();
        ledger.add_employee(owner(), &jane(), TODAY).await.unwrap();

        for code in [0u8, 4, 255] {
            let err = ledger
                .update_attendance(owner(), jane().address, TODAY, code)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), INVALID_STATUS);
        }

        let err = ledger
            .update_attendance(owner(), Address::ZERO, TODAY, 1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_ADDRESS);

        let err = ledger
            .update_attendance(owner(), Address::from_low_u64(0xbb), TODAY, 1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), EMPLOYEE_MISSING);
    }

    #[tokio::test]
    async fn test_daily_counts() {
        let ledger = ledger();
        for i in 1..=4u64 {
            let employee = NewEmployee {
                address: Address::from_low_u64(i),
                ..jane()
            };
            ledger.add_employee(owner(), &employee, TODAY).await.unwrap();
        }
        ledger.update_attendance(owner(), Address::from_low_u64(1), TODAY, 1).await.unwrap();
        ledger.update_attendance(owner(), Address::from_low_u64(2), TODAY, 1).await.unwrap();
        ledger.update_attendance(owner(), Address::from_low_u64(3), TODAY, 3).await.unwrap();
        ledger.update_attendance(owner(), Address::from_low_u64(4), TODAY - 1, 1).await.unwrap();

        assert_eq!(ledger.get_daily_attendance(owner(), TODAY, 1).await.unwrap(), 2);
        assert_eq!(ledger.get_daily_attendance(owner(), TODAY, 2).await.unwrap(), 0);
        assert_eq!(ledger.get_daily_attendance(owner(), TODAY, 3).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_range_query() {
        let ledger = ledger();
        ledger.add_employee(owner(), &jane(), TODAY - 10).await.unwrap();
        ledger.update_attendance(owner(), jane().address, TODAY - 2, 1).await.unwrap();
        ledger.update_attendance(owner(), jane().address, TODAY, 2).await.unwrap();

        let days = ledger
            .get_attendance_by_date_range(owner(), jane().address, TODAY - 3, TODAY)
            .await
            .unwrap();
        assert_eq!(days, vec![0, 1, 0, 2]);

        let err = ledger
            .get_attendance_by_date_range(owner(), jane().address, TODAY, TODAY - 1)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), INVALID_RANGE);
    }

    #[test]
    fn test_local_accounts_are_stable() {
        let a = local_accounts(3);
        let b = local_accounts(3);
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
        assert!(a.iter().all(|addr| !addr.is_zero()));
    }
}
