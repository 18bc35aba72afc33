//! Scheme configuration snapshot supplied by the caller

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::calendar::{MonthKey, DEFAULT_FINANCIAL_YEAR_START_MONTH};
use crate::error::{Result, SchemeError};

/// How often the recurring rule produces a contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    /// Manual deposits only, the recurring rule never fires
    Irregular,
}

impl Frequency {
    /// Months between two recurring contributions, `None` for irregular schemes
    pub fn interval_months(&self) -> Option<i32> {
        match self {
            Frequency::Monthly => Some(1),
            Frequency::Quarterly => Some(3),
            Frequency::Yearly => Some(12),
            Frequency::Irregular => None,
        }
    }

    /// Whether a recurring contribution falls due in `month`, counting from `first`
    pub fn is_due(&self, first: MonthKey, month: MonthKey) -> bool {
        let offset = first.months_until(month);
        match self.interval_months() {
            Some(interval) => offset >= 0 && offset % interval == 0,
            None => false,
        }
    }
}

/// Standing instruction that generates automatic contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    /// Amount contributed each time the rule fires
    pub amount: Decimal,

    #[serde(default)]
    pub enabled: bool,

    /// First month the rule may fire
    pub start_month: MonthKey,

    /// Day of month the automatic deposit lands on (clamped to month length)
    /// Default: 1
    #[serde(default = "default_deposit_day")]
    pub deposit_day: u32,
}

fn default_deposit_day() -> u32 { 1 }
fn default_cutoff_day() -> u32 { 5 }
fn default_fy_start() -> u32 { DEFAULT_FINANCIAL_YEAR_START_MONTH }

/// Immutable configuration of a single savings scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// First month of the scheme
    pub start_date: MonthKey,

    /// Last date of the scheme; its month is the final ledger month
    pub maturity_date: NaiveDate,

    /// Contribution ceiling per financial year
    pub annual_limit: Decimal,

    #[serde(default)]
    pub frequency: Frequency,

    /// Deposits on or before this day of the month earn that month's interest
    /// Default: 5
    #[serde(default = "default_cutoff_day")]
    pub interest_calculation_date: u32,

    #[serde(default)]
    pub recurring: Option<RecurringRule>,

    #[serde(default)]
    pub skipped_months: BTreeSet<MonthKey>,

    /// No automatic contributions from this month onward
    #[serde(default)]
    pub paused_since: Option<MonthKey>,

    /// First month of the financial year (1 = January). Default: 4 (April)
    #[serde(default = "default_fy_start")]
    pub financial_year_start_month: u32,
}

impl SchemeConfig {
    /// Minimal monthly scheme with no recurring rule and the default cutoff
    pub fn new(start_date: MonthKey, maturity_date: NaiveDate, annual_limit: Decimal) -> Self {
        Self {
            start_date,
            maturity_date,
            annual_limit,
            frequency: Frequency::Monthly,
            interest_calculation_date: default_cutoff_day(),
            recurring: None,
            skipped_months: BTreeSet::new(),
            paused_since: None,
            financial_year_start_month: DEFAULT_FINANCIAL_YEAR_START_MONTH,
        }
    }

    pub fn maturity_month(&self) -> MonthKey {
        MonthKey::of(self.maturity_date)
    }

    /// Financial-year label of `month` under this scheme's calendar
    pub fn financial_year_of(&self, month: MonthKey) -> i32 {
        month.financial_year(self.financial_year_start_month)
    }

    /// Whether a deposit made on `date` meets the interest cutoff of its month
    pub fn is_before_cutoff(&self, date: NaiveDate) -> bool {
        date.day() <= self.interest_calculation_date
    }

    /// Recurring rule, if it is switched on
    pub fn active_recurring(&self) -> Option<&RecurringRule> {
        self.recurring.as_ref().filter(|rule| rule.enabled)
    }

    /// Reject configurations that cannot be simulated
    pub fn validate(&self) -> Result<()> {
        if self.maturity_date < self.start_date.first_day() {
            return Err(SchemeError::InvalidDateRange {
                start: self.start_date.first_day(),
                maturity: self.maturity_date,
            });
        }
        if !(1..=31).contains(&self.interest_calculation_date) {
            return Err(SchemeError::InvalidCutoffDay(self.interest_calculation_date));
        }
        if !(1..=12).contains(&self.financial_year_start_month) {
            return Err(SchemeError::InvalidFinancialYearStart(self.financial_year_start_month));
        }
        if self.annual_limit < Decimal::ZERO {
            return Err(SchemeError::NegativeAmount {
                field: "annual_limit".to_string(),
                value: self.annual_limit,
            });
        }
        if let Some(rule) = &self.recurring {
            if rule.amount < Decimal::ZERO {
                return Err(SchemeError::NegativeAmount {
                    field: "recurring.amount".to_string(),
                    value: rule.amount,
                });
            }
            if !(1..=31).contains(&rule.deposit_day) {
                return Err(SchemeError::InvalidDepositDay(rule.deposit_day));
            }
        }
        Ok(())
    }
}
