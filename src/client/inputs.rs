//! Input Store
//!
//! One bag of raw form values. Values stay as typed until a dispatcher needs
//! them; parsing and validation happen at that boundary.

use super::error::InputError;
use crate::abi::Address;
use crate::types::{checked_day_index, day_index, NewEmployee};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Date format accepted for `start_date` and `end_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Named input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Address,
    Name,
    Age,
    Number,
    GetEmployee,
    GetMonthlyAttendance,
    StartDate,
    EndDate,
}

impl InputField {
    pub const ALL: [InputField; 8] = [
        InputField::Address,
        InputField::Name,
        InputField::Age,
        InputField::Number,
        InputField::GetEmployee,
        InputField::GetMonthlyAttendance,
        InputField::StartDate,
        InputField::EndDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InputField::Address => "address",
            InputField::Name => "name",
            InputField::Age => "age",
            InputField::Number => "number",
            InputField::GetEmployee => "getEmployee",
            InputField::GetMonthlyAttendance => "getMonthlyAttendance",
            InputField::StartDate => "startDate",
            InputField::EndDate => "endDate",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        InputField::ALL
            .into_iter()
            .find(|field| field.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| InputError::UnknownField(s.to_string()))
    }
}

/// Parsed range-count query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    pub employee: Address,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RangeQuery {
    pub fn start_day(&self) -> u64 {
        day_index(self.start)
    }

    pub fn end_day(&self) -> u64 {
        day_index(self.end)
    }
}

/// Current value of every input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBag {
    pub address: String,
    pub name: String,
    pub age: String,
    pub number: String,
    pub get_employee: String,
    pub get_monthly_attendance: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl InputBag {
    /// Empty text fields, both dates set to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            address: String::new(),
            name: String::new(),
            age: String::new(),
            number: String::new(),
            get_employee: String::new(),
            get_monthly_attendance: String::new(),
            start_date: today,
            end_date: today,
        }
    }

    /// Overwrite one field
    pub fn set(&mut self, field: InputField, value: &str) -> Result<(), InputError> {
        match field {
            InputField::Address => self.address = value.to_string(),
            InputField::Name => self.name = value.to_string(),
            InputField::Age => self.age = value.to_string(),
            InputField::Number => self.number = value.to_string(),
            InputField::GetEmployee => self.get_employee = value.to_string(),
            InputField::GetMonthlyAttendance => self.get_monthly_attendance = value.to_string(),
            InputField::StartDate => self.start_date = parse_date(field.name(), value)?,
            InputField::EndDate => self.end_date = parse_date(field.name(), value)?,
        }
        Ok(())
    }

    /// Current value of one field as text
    pub fn get(&self, field: InputField) -> String {
        match field {
            InputField::Address => self.address.clone(),
            InputField::Name => self.name.clone(),
            InputField::Age => self.age.clone(),
            InputField::Number => self.number.clone(),
            InputField::GetEmployee => self.get_employee.clone(),
            InputField::GetMonthlyAttendance => self.get_monthly_attendance.clone(),
            InputField::StartDate => self.start_date.format(DATE_FORMAT).to_string(),
            InputField::EndDate => self.end_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Reset the add-employee form fields
    pub fn clear_employee_form(&mut self) {
        self.address.clear();
        self.name.clear();
        self.age.clear();
        self.number.clear();
    }

    /// Validate the add-employee form
    pub fn new_employee(&self) -> Result<NewEmployee, InputError> {
        let address = parse_address(InputField::Address.name(), &self.address)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(InputError::Missing(InputField::Name.name()));
        }

        Ok(NewEmployee {
            address,
            name: name.to_string(),
            age: parse_number(InputField::Age.name(), &self.age)?,
            number: parse_number(InputField::Number.name(), &self.number)?,
        })
    }

    /// Validate the employee lookup address
    pub fn lookup_address(&self) -> Result<Address, InputError> {
        parse_address(InputField::GetEmployee.name(), &self.get_employee)
    }

    /// Validate the range-count inputs
    pub fn range_query(&self) -> Result<RangeQuery, InputError> {
        let employee = parse_address(
            InputField::GetMonthlyAttendance.name(),
            &self.get_monthly_attendance,
        )?;

        if self.start_date > self.end_date {
            return Err(InputError::DateOrder {
                start: self.start_date.format(DATE_FORMAT).to_string(),
                end: self.end_date.format(DATE_FORMAT).to_string(),
            });
        }

        Ok(RangeQuery {
            employee,
            start: self.start_date,
            end: self.end_date,
        })
    }
}

pub fn parse_address(field: &'static str, value: &str) -> Result<Address, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InputError::Missing(field));
    }
    value.parse().map_err(|_| InputError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InputError::Missing(field));
    }
    value.parse().map_err(|_| InputError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Dates before 1970-01-01 have no day index and are rejected
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| checked_day_index(*date).is_some())
        .ok_or_else(|| InputError::InvalidDate {
            field,
            value: value.to_string(),
        })
}
