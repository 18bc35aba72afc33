//! Projection engine: schedule, accrual walk and summary

mod state;
mod engine;
mod ledger;
mod schedule;
mod summary;

// ============================================================================
// Money Handling
// ============================================================================
// Balances, contributions and interest are `Decimal`. Interest is rounded once
// per month; the balance bound keeps every month's arithmetic inside the range
// `Decimal` can represent, and is checked before the walk starts.

/// Decimal places money is rounded to (minor units)
pub const MONEY_DP: u32 = 2;

/// Largest balance a projection may reach over the scheme term
pub const MAX_PROJECTED_BALANCE: f64 = 1e24;

pub use state::{AccrualState, EnginePhase};
pub use engine::{
    ProjectionEngine, ProjectionConfig, LateDepositTreatment, Projection, SchemeInput,
    monthly_interest,
};
pub use ledger::{MonthlyLedgerRow, write_ledger_csv};
pub use schedule::{ScheduleBuilder, ContributionIntent, ContributionSource, MonthStatus};
pub use summary::CalculationResult;
