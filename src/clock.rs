//! Clock abstraction
//!
//! "Now" is always a UTC calendar day; injecting it keeps dispatchers and the
//! local ledger deterministic under test.

use crate::types::day_index;
use chrono::{NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current UTC date
    fn today(&self) -> NaiveDate;

    /// Current day index
    fn today_index(&self) -> u64 {
        day_index(self.today())
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(clock.today_index(), 19_797);
    }
}
