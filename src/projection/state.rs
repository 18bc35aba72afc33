//! Running accrual state carried from one month to the next

use rust_decimal::Decimal;

use crate::calendar::MonthKey;
use crate::scheme::SchemeConfig;

/// Lifecycle phase of a scheme relative to a given month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Before the start month; not modelled
    PreStart,
    Accruing,
    /// After the maturity month; balance frozen
    Matured,
}

impl EnginePhase {
    pub fn of(scheme: &SchemeConfig, month: MonthKey) -> Self {
        if month < scheme.start_date {
            EnginePhase::PreStart
        } else if month > scheme.maturity_month() {
            EnginePhase::Matured
        } else {
            EnginePhase::Accruing
        }
    }
}

/// Values the next month's row is derived from
///
/// Equivalent to the previous ledger row's closing figures; the opening
/// state of a scheme is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccrualState {
    pub balance: Decimal,
    pub cumulative_interest: Decimal,
    /// Financial year the year-to-date figure belongs to
    pub financial_year: Option<i32>,
    pub year_to_date_contributions: Decimal,
}

impl AccrualState {
    /// Contributions already made in `financial_year` before the current month
    pub fn contributions_before(&self, financial_year: i32) -> Decimal {
        if self.financial_year == Some(financial_year) {
            self.year_to_date_contributions
        } else {
            Decimal::ZERO
        }
    }
}
