//! Text rendering of employee details and count groups

use super::display::DisplaySnapshot;
use crate::types::EmployeeRecord;

/// Joining dates render like `Mar 15 2024`
pub const JOINING_DATE_FORMAT: &str = "%b %d %Y";

/// Employee details, one labelled line per field
pub fn employee_details(record: &EmployeeRecord) -> Vec<String> {
    let joining = record
        .joining_date()
        .map(|d| d.format(JOINING_DATE_FORMAT).to_string())
        .unwrap_or_else(|| "Invalid Date".to_string());

    vec![
        format!("Employee Name : {}", record.name),
        format!("Employee Age : {}", record.age),
        format!("Employee Number : {}", record.employee_number),
        format!("Joining Date : {}", joining),
        format!("Today's Attendance : {}", record.todays_attendance_label()),
    ]
}

/// Visible counts of a group, e.g. `today: Present 3`; `None` when all hidden
pub fn visible_counts(label: &str, snapshot: &DisplaySnapshot) -> Option<String> {
    let counts = snapshot.visible_counts();
    if counts.is_empty() {
        return None;
    }

    let parts: Vec<String> = counts
        .iter()
        .map(|(status, count)| format!("{} {}", status, count))
        .collect();
    Some(format!("{}: {}", label, parts.join(", ")))
}
