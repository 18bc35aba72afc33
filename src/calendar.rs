//! Calendar-month keys and financial-year arithmetic

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemeError;

/// Default first month of the financial year (April)
pub const DEFAULT_FINANCIAL_YEAR_START_MONTH: u32 = 4;

/// A calendar month, rendered as `YYYY-MM`
///
/// Backed by the first day of the month so ordering and arithmetic
/// come straight from `NaiveDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    /// Build from year and 1-based month; `None` if the month is out of range
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First day of the month, used as the representative date for rate lookups
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Given day of this month, clamped to the month's length
    pub fn day(&self, day: u32) -> NaiveDate {
        let last = self.days_in_month();
        self.0 + Days::new(u64::from(day.clamp(1, last) - 1))
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.succ().0;
        (next - self.0).num_days() as u32
    }

    pub fn succ(&self) -> Self {
        Self(self.0 + Months::new(1))
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: MonthKey) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }

    /// Label of the financial year this month belongs to: the calendar year
    /// in which that financial year started
    pub fn financial_year(&self, start_month: u32) -> i32 {
        if self.month() >= start_month {
            self.year()
        } else {
            self.year() - 1
        }
    }

    /// Inclusive range of months from `self` through `end`; empty when `end < self`
    pub fn range_to(self, end: MonthKey) -> impl Iterator<Item = MonthKey> {
        std::iter::successors(Some(self), |m| Some(m.succ())).take_while(move |m| *m <= end)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = SchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| SchemeError::Parse(format!("invalid month '{trimmed}': {e}")))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = SchemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}
