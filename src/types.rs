//! Core attendance types
//!
//! Defines the status enumeration, employee records and day-index helpers
//! shared by the contract bindings and the client.

use crate::abi::Address;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Attendance recorded for one employee on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AttendanceStatus {
    Present = 1,
    Absent = 2,
    Leave = 3,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Leave,
    ];

    /// Wire code used by the contract
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a contract code back to a status
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(AttendanceStatus::Present),
            2 => Some(AttendanceStatus::Absent),
            3 => Some(AttendanceStatus::Leave),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Leave => "Leave",
        }
    }

    /// Slot in per-status arrays
    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "1" => Ok(AttendanceStatus::Present),
            "absent" | "2" => Ok(AttendanceStatus::Absent),
            "leave" | "on-leave" | "3" => Ok(AttendanceStatus::Leave),
            other => Err(format!("unknown attendance status: {}", other)),
        }
    }
}

/// Human label for a raw status code as returned by the contract
pub fn status_label(code: u8) -> String {
    match AttendanceStatus::from_code(code) {
        Some(status) => status.label().to_string(),
        None if code == 0 => "Not marked".to_string(),
        None => format!("Unknown({})", code),
    }
}

/// Employee as stored by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub name: String,
    pub age: u64,
    pub employee_number: u64,
    /// Day index of joining
    pub date_of_joining: u64,
    /// Raw status code for the current day (0 when not marked)
    pub todays_attendance: u8,
}

impl EmployeeRecord {
    /// Calendar date of joining, if the day index is representable
    pub fn joining_date(&self) -> Option<NaiveDate> {
        date_from_day_index(self.date_of_joining)
    }

    pub fn todays_attendance_label(&self) -> String {
        status_label(self.todays_attendance)
    }
}

/// Employee submitted through the add-employee form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub address: Address,
    pub name: String,
    pub age: u64,
    pub number: u64,
}

/// Days since the Unix epoch; `None` before 1970-01-01
pub fn checked_day_index(date: NaiveDate) -> Option<u64> {
    u64::try_from(date.signed_duration_since(NaiveDate::default()).num_days()).ok()
}

/// Days since the Unix epoch for a calendar date
///
/// Dates before the epoch have no index and map to day 0; user input is
/// rejected before it gets here.
pub fn day_index(date: NaiveDate) -> u64 {
    checked_day_index(date).unwrap_or(0)
}

/// Calendar date for a day index (day index × 86 400 000 ms)
pub fn date_from_day_index(day: u64) -> Option<NaiveDate> {
    let millis = i64::try_from(day).ok()?.checked_mul(MS_PER_DAY)?;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}
