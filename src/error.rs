//! Error type shared by validation, loading and projection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    /// The rate history has no entry effective on or before the requested date
    #[error("no interest rate is effective on {date}; the rate history must start on or before it")]
    ConfigurationIncomplete { date: NaiveDate },

    #[error("maturity date {maturity} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, maturity: NaiveDate },

    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: String, value: Decimal },

    #[error("interest calculation day must be within 1..=31 (got {0})")]
    InvalidCutoffDay(u32),

    #[error("recurring deposit day must be within 1..=31 (got {0})")]
    InvalidDepositDay(u32),

    /// Contributions and rates could grow the balance past what `Decimal` can hold
    #[error("balance could reach {bound:e} within {months} months, beyond the supported range")]
    ProjectionOutOfRange { months: i32, bound: f64 },

    #[error("financial year start month must be within 1..=12 (got {0})")]
    InvalidFinancialYearStart(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SchemeError>;
