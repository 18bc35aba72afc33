//! Savings Projection - Deterministic ledger engine for long-horizon savings schemes
//!
//! This library provides:
//! - Month-indexed contribution schedules from deposit history, recurring rules, skips and pauses
//! - Versioned interest-rate resolution
//! - Monthly interest accrual with annual contribution-limit tracking
//! - Summary aggregation and forward projection to maturity

pub mod calendar;
pub mod error;
pub mod scheme;
pub mod assumptions;
pub mod projection;

// Re-export commonly used types
pub use calendar::MonthKey;
pub use error::{SchemeError, Result};
pub use scheme::{SchemeConfig, DepositEntry, RecurringRule, Frequency};
pub use assumptions::{InterestRateHistory, InterestRateEntry, RateLookup, FlatRate};
pub use projection::{
    ProjectionEngine, ProjectionConfig, Projection, MonthlyLedgerRow, CalculationResult, SchemeInput,
};
