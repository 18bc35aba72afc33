//! Load scheme configuration (JSON) and deposit history (CSV)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{DepositEntry, SchemeConfig};
use crate::error::Result;

/// One line of a deposit history file: `date,amount`
#[derive(Debug, Deserialize)]
struct DepositRecord {
    date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

/// Load and validate a scheme configuration from a JSON file
pub fn load_scheme<P: AsRef<Path>>(path: P) -> Result<SchemeConfig> {
    let file = File::open(path.as_ref())?;
    let config: SchemeConfig = serde_json::from_reader(BufReader::new(file))?;
    config.validate()?;
    log::debug!("Loaded scheme starting {} from {}", config.start_date, path.as_ref().display());
    Ok(config)
}

/// Load deposit history from a CSV file with a `date,amount` header
pub fn load_deposits<P: AsRef<Path>>(path: P, scheme: &SchemeConfig) -> Result<Vec<DepositEntry>> {
    let file = File::open(path)?;
    load_deposits_from_reader(file, scheme)
}

/// Load deposit history from any reader, sorted by date
pub fn load_deposits_from_reader<R: Read>(reader: R, scheme: &SchemeConfig) -> Result<Vec<DepositEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut deposits = Vec::new();
    for result in rdr.deserialize() {
        let record: DepositRecord = result?;
        deposits.push(DepositEntry::for_scheme(scheme, record.date, record.amount)?);
    }
    deposits.sort_by_key(|d| d.date());

    log::debug!("Loaded {} deposits", deposits.len());
    Ok(deposits)
}
