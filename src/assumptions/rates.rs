//! Versioned interest-rate timeline

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemeError};

/// Anything that can answer "which annual rate applies on this date"
///
/// Rates are annual percentages (7.1 = 7.1% p.a.).
pub trait RateLookup {
    fn rate_on(&self, date: NaiveDate) -> Result<Decimal>;
}

/// A rate that takes effect on `effective_date` and holds until superseded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRateEntry {
    pub effective_date: NaiveDate,
    pub rate: Decimal,
}

impl InterestRateEntry {
    pub fn new(effective_date: NaiveDate, rate: Decimal) -> Self {
        Self { effective_date, rate }
    }
}

/// Chronologically ordered rate history
///
/// Entries sharing an effective date keep their insertion order, so the
/// later-inserted one wins on lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InterestRateHistory {
    entries: Vec<InterestRateEntry>,
}

impl InterestRateHistory {
    /// Build from entries in insertion order, rejecting negative rates
    pub fn new(mut entries: Vec<InterestRateEntry>) -> Result<Self> {
        if let Some(bad) = entries.iter().find(|e| e.rate < Decimal::ZERO) {
            return Err(SchemeError::NegativeAmount {
                field: format!("interest rate effective {}", bad.effective_date),
                value: bad.rate,
            });
        }
        // stable: equal dates stay in insertion order
        entries.sort_by_key(|e| e.effective_date);
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[InterestRateEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest date the history has a rate for
    pub fn first_effective_date(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.effective_date)
    }

    /// Latest entry with `effective_date <= date`
    pub fn resolve(&self, date: NaiveDate) -> Option<&InterestRateEntry> {
        let idx = self.entries.partition_point(|e| e.effective_date <= date);
        idx.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Whether every date from `date` onward resolves to a rate
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.resolve(date).is_some()
    }
}

impl RateLookup for InterestRateHistory {
    fn rate_on(&self, date: NaiveDate) -> Result<Decimal> {
        self.resolve(date)
            .map(|e| e.rate)
            .ok_or(SchemeError::ConfigurationIncomplete { date })
    }
}

/// A single rate applied to every date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRate(pub Decimal);

impl RateLookup for FlatRate {
    fn rate_on(&self, _date: NaiveDate) -> Result<Decimal> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history() -> InterestRateHistory {
        InterestRateHistory::new(vec![
            InterestRateEntry::new(date(2023, 10, 1), dec!(7.0)),
            InterestRateEntry::new(date(2023, 1, 1), dec!(7.1)),
            InterestRateEntry::new(date(2024, 4, 1), dec!(7.2)),
        ])
        .unwrap()
    }

    #[test]
    fn test_entries_sorted() {
        let rates = history();
        let dates: Vec<NaiveDate> = rates.entries().iter().map(|e| e.effective_date).collect();
        assert_eq!(dates, vec![date(2023, 1, 1), date(2023, 10, 1), date(2024, 4, 1)]);
    }

    #[test]
    fn test_resolve_latest_effective() {
        let rates = history();
        assert_eq!(rates.rate_on(date(2023, 9, 30)).unwrap(), dec!(7.1));
        assert_eq!(rates.rate_on(date(2023, 10, 1)).unwrap(), dec!(7.0));
        assert_eq!(rates.rate_on(date(2024, 3, 31)).unwrap(), dec!(7.0));
        assert_eq!(rates.rate_on(date(2030, 1, 1)).unwrap(), dec!(7.2));
    }

    #[test]
    fn test_resolve_before_history_fails() {
        let rates = history();
        assert!(!rates.covers(date(2022, 12, 31)));
        assert!(matches!(
            rates.rate_on(date(2022, 12, 31)),
            Err(SchemeError::ConfigurationIncomplete { .. })
        ));
        assert!(InterestRateHistory::default().rate_on(date(2023, 1, 1)).is_err());
    }

    #[test]
    fn test_same_day_later_insert_wins() {
        let rates = InterestRateHistory::new(vec![
            InterestRateEntry::new(date(2023, 4, 1), dec!(7.1)),
            InterestRateEntry::new(date(2023, 4, 1), dec!(7.3)),
            InterestRateEntry::new(date(2023, 1, 1), dec!(6.9)),
        ])
        .unwrap();
        assert_eq!(rates.rate_on(date(2023, 4, 1)).unwrap(), dec!(7.3));
        assert_eq!(rates.rate_on(date(2023, 3, 1)).unwrap(), dec!(6.9));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = InterestRateHistory::new(vec![InterestRateEntry::new(date(2023, 1, 1), dec!(-0.5))]);
        assert!(matches!(result, Err(SchemeError::NegativeAmount { .. })));
    }

    #[test]
    fn test_flat_rate() {
        assert_eq!(FlatRate(dec!(7.1)).rate_on(date(1990, 1, 1)).unwrap(), dec!(7.1));
    }
}
