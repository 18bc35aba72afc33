//! Accrual engine: walks the contribution schedule month by month

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::ledger::MonthlyLedgerRow;
use super::schedule::{ContributionIntent, MonthStatus, ScheduleBuilder};
use super::state::{AccrualState, EnginePhase};
use super::summary::CalculationResult;
use super::{MAX_PROJECTED_BALANCE, MONEY_DP};
use crate::assumptions::{FlatRate, InterestRateHistory, RateLookup};
use crate::calendar::MonthKey;
use crate::error::{Result, SchemeError};
use crate::scheme::{DepositEntry, SchemeConfig};

/// Interest treatment for a month containing a deposit made after the cutoff day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateDepositTreatment {
    /// The whole month earns no interest
    #[default]
    ForfeitMonth,
    /// Interest is credited on the balance before the month's contribution
    ExcludeLateDeposits,
}

/// Policy switches for the accrual walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub late_deposits: LateDepositTreatment,

    /// Whether a skipped month still earns interest on the held balance
    /// Default: true
    #[serde(default = "default_true")]
    pub skipped_months_accrue: bool,
}

fn default_true() -> bool { true }

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            late_deposits: LateDepositTreatment::ForfeitMonth,
            skipped_months_accrue: true,
        }
    }
}

/// Ledger plus its summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub ledger: Vec<MonthlyLedgerRow>,
    pub summary: CalculationResult,
}

/// One scheme to project in a batch
#[derive(Debug, Clone)]
pub struct SchemeInput {
    pub scheme: SchemeConfig,
    pub deposits: Vec<DepositEntry>,
    pub evaluation_date: NaiveDate,
}

/// Projection engine for savings schemes sharing one rate history
pub struct ProjectionEngine {
    rates: InterestRateHistory,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(rates: InterestRateHistory, config: ProjectionConfig) -> Self {
        Self { rates, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn rates(&self) -> &InterestRateHistory {
        &self.rates
    }

    /// Check everything the walk relies on before any month is computed
    pub fn validate(&self, scheme: &SchemeConfig, deposits: &[DepositEntry]) -> Result<()> {
        scheme.validate()?;
        // sorted history: covering the first month covers every later one
        self.rates.rate_on(scheme.start_date.first_day())?;
        self.check_balance_bound(scheme, deposits)
    }

    /// Reject schemes whose balance could outgrow `Decimal`
    ///
    /// Every contribution compounding at the highest rate in the history for the
    /// whole term bounds any balance the walk or the forward projection reaches.
    fn check_balance_bound(&self, scheme: &SchemeConfig, deposits: &[DepositEntry]) -> Result<()> {
        let months = scheme.start_date.months_until(scheme.maturity_month()) + 1;

        let recurring = scheme
            .active_recurring()
            .and_then(|rule| rule.amount.to_f64())
            .unwrap_or(0.0);
        let manual: f64 = deposits.iter().filter_map(|d| d.amount().to_f64()).sum();
        let max_rate = self
            .rates
            .entries()
            .iter()
            .filter_map(|e| e.rate.to_f64())
            .fold(0.0_f64, f64::max);

        let contributions = recurring * f64::from(months) + manual;
        let bound = contributions * (1.0 + max_rate / 1200.0).powi(months);

        if !(bound <= MAX_PROJECTED_BALANCE) {
            return Err(SchemeError::ProjectionOutOfRange { months, bound });
        }
        Ok(())
    }

    /// Project a scheme as of `evaluation_date`
    ///
    /// Produces the ledger from the start month through the earlier of the
    /// maturity month and the evaluation month, then continues the walk to
    /// maturity at the last known rate for the projected maturity value.
    pub fn project_scheme(
        &self,
        scheme: &SchemeConfig,
        deposits: &[DepositEntry],
        evaluation_date: NaiveDate,
    ) -> Result<Projection> {
        self.validate(scheme, deposits)?;

        let evaluation_month = MonthKey::of(evaluation_date);
        let builder = ScheduleBuilder::new(scheme, deposits);
        let intents = builder.build(evaluation_month);

        let (ledger, closing) = self.walk(scheme, &intents, AccrualState::default(), &self.rates)?;

        let projected_maturity_value = self.project_to_maturity(scheme, &ledger, closing, evaluation_month)?;
        let summary = CalculationResult::from_ledger(scheme, &ledger, evaluation_month, projected_maturity_value);

        log::info!(
            "Projected scheme {}..{} as of {}: {} months, value {}, maturity value {}",
            scheme.start_date,
            scheme.maturity_month(),
            evaluation_date,
            ledger.len(),
            summary.current_value,
            summary.projected_maturity_value,
        );

        Ok(Projection { ledger, summary })
    }

    /// Project many schemes in parallel; results keep the input order
    pub fn project_batch(&self, inputs: &[SchemeInput]) -> Vec<Result<Projection>> {
        inputs
            .par_iter()
            .map(|input| self.project_scheme(&input.scheme, &input.deposits, input.evaluation_date))
            .collect()
    }

    /// Continue from the evaluation month to maturity with no manual deposits
    /// and the last known rate held constant
    fn project_to_maturity(
        &self,
        scheme: &SchemeConfig,
        ledger: &[MonthlyLedgerRow],
        closing: AccrualState,
        evaluation_month: MonthKey,
    ) -> Result<Decimal> {
        let maturity = scheme.maturity_month();
        if evaluation_month >= maturity {
            return Ok(closing.balance);
        }

        let last_known_rate = match ledger.last() {
            Some(row) => row.interest_rate,
            None => self.rates.rate_on(scheme.start_date.first_day())?,
        };

        let intents = ScheduleBuilder::new(scheme, &[]).build_range(evaluation_month.succ(), maturity);
        let (_, terminal) = self.walk(scheme, &intents, closing, &FlatRate(last_known_rate))?;
        Ok(terminal.balance)
    }

    /// Apply each intent in order, deriving every row from the previous state
    fn walk(
        &self,
        scheme: &SchemeConfig,
        intents: &[ContributionIntent],
        opening: AccrualState,
        rates: &dyn RateLookup,
    ) -> Result<(Vec<MonthlyLedgerRow>, AccrualState)> {
        let mut rows = Vec::with_capacity(intents.len());
        let mut state = opening;

        for intent in intents {
            match EnginePhase::of(scheme, intent.month) {
                EnginePhase::PreStart => continue,
                EnginePhase::Matured => break,
                EnginePhase::Accruing => {}
            }

            let rate = rates.rate_on(intent.month.first_day())?;
            let (row, next) = self.accrue_month(scheme, intent, rate, state);
            rows.push(row);
            state = next;
        }

        Ok((rows, state))
    }

    /// One `Accruing` transition
    fn accrue_month(
        &self,
        scheme: &SchemeConfig,
        intent: &ContributionIntent,
        rate: Decimal,
        prev: AccrualState,
    ) -> (MonthlyLedgerRow, AccrualState) {
        let with_contribution = prev.balance + intent.amount;

        let interest_base = if intent.status == MonthStatus::Skipped && !self.config.skipped_months_accrue {
            Decimal::ZERO
        } else if intent.is_eligible_for_interest {
            with_contribution
        } else {
            match self.config.late_deposits {
                LateDepositTreatment::ForfeitMonth => Decimal::ZERO,
                LateDepositTreatment::ExcludeLateDeposits => prev.balance,
            }
        };
        let interest = monthly_interest(interest_base, rate);

        let financial_year = scheme.financial_year_of(intent.month);
        let before = prev.contributions_before(financial_year);
        let year_to_date = before + intent.amount;
        let limit_overage = over_limit(year_to_date, scheme.annual_limit) - over_limit(before, scheme.annual_limit);

        if limit_overage > Decimal::ZERO {
            log::warn!(
                "{}: contributions for FY{} reach {} against a limit of {} (over by {})",
                intent.month,
                financial_year,
                year_to_date,
                scheme.annual_limit,
                limit_overage,
            );
        }

        let next = AccrualState {
            balance: with_contribution + interest,
            cumulative_interest: prev.cumulative_interest + interest,
            financial_year: Some(financial_year),
            year_to_date_contributions: year_to_date,
        };

        log::debug!(
            "{} {:?}: +{} interest {} @ {}% -> {}",
            intent.month,
            intent.status,
            intent.amount,
            interest,
            rate,
            next.balance,
        );

        let row = MonthlyLedgerRow {
            month: intent.month,
            financial_year,
            contribution: intent.amount,
            source: intent.source,
            status: intent.status,
            interest_rate: rate,
            interest_credited: interest,
            cumulative_interest: next.cumulative_interest,
            balance: next.balance,
            counts_toward_limit: intent.amount > Decimal::ZERO && limit_overage < intent.amount,
            year_to_date_contributions: year_to_date,
            limit_overage,
            is_eligible_for_interest: intent.is_eligible_for_interest,
        };

        (row, next)
    }
}

/// One month of interest at an annual percentage rate, rounded half-up to the minor unit
pub fn monthly_interest(balance: Decimal, annual_rate_percent: Decimal) -> Decimal {
    // rate is a percentage, credited monthly
    (balance * annual_rate_percent / Decimal::from(1200_u32))
        .round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn over_limit(total: Decimal, limit: Decimal) -> Decimal {
    (total - limit).max(Decimal::ZERO)
}
