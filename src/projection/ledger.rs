//! Monthly ledger rows and CSV output

use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use super::schedule::{ContributionSource, MonthStatus};
use crate::calendar::MonthKey;
use crate::error::Result;

/// One month of computed scheme state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyLedgerRow {
    pub month: MonthKey,
    pub financial_year: i32,
    pub contribution: Decimal,
    pub source: ContributionSource,
    pub status: MonthStatus,
    /// Annual rate (percent) in force on the first day of the month
    pub interest_rate: Decimal,
    pub interest_credited: Decimal,
    pub cumulative_interest: Decimal,
    /// Closing balance: previous balance + contribution + interest
    pub balance: Decimal,
    /// Some part of the contribution fell within the annual limit
    pub counts_toward_limit: bool,
    /// Financial-year contributions including this month
    pub year_to_date_contributions: Decimal,
    /// Part of this month's contribution above the annual limit
    pub limit_overage: Decimal,
    pub is_eligible_for_interest: bool,
}

impl MonthlyLedgerRow {
    pub fn is_over_limit(&self) -> bool {
        self.limit_overage > Decimal::ZERO
    }
}

/// Write ledger rows as CSV with a header line
pub fn write_ledger_csv<W: Write>(writer: W, rows: &[MonthlyLedgerRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
