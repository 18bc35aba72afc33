//! Load rate history from CSV (`effective_date,rate`)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{InterestRateEntry, InterestRateHistory};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct RateRecord {
    effective_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    rate: Decimal,
}

/// Load rate history from a CSV file
pub fn load_rate_history<P: AsRef<Path>>(path: P) -> Result<InterestRateHistory> {
    let file = File::open(path)?;
    load_rate_history_from_reader(file)
}

/// Load rate history from any reader; file order is the insertion order
pub fn load_rate_history_from_reader<R: Read>(reader: R) -> Result<InterestRateHistory> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let record: RateRecord = result?;
        entries.push(InterestRateEntry::new(record.effective_date, record.rate));
    }

    log::debug!("Loaded {} interest rate entries", entries.len());
    InterestRateHistory::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::RateLookup;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_rates() {
        let csv = "effective_date,rate\n2023-10-01,7.0\n2023-04-01,7.1\n";
        let history = load_rate_history_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(history.entries().len(), 2);
        let sept = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        assert_eq!(history.rate_on(sept).unwrap(), dec!(7.1));
    }

    #[test]
    fn test_load_rates_missing_column() {
        let csv = "effective_date\n2023-10-01\n";
        assert!(load_rate_history_from_reader(csv.as_bytes()).is_err());
    }
}
