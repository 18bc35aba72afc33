//! Individual contributions recorded against a scheme

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::SchemeConfig;
use crate::calendar::MonthKey;
use crate::error::{Result, SchemeError};

/// A single manual contribution
///
/// Month key and interest eligibility are derived once at construction
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositEntry {
    date: NaiveDate,
    amount: Decimal,
    month: MonthKey,
    is_eligible_for_interest: bool,
}

impl DepositEntry {
    /// Record a deposit; eligible iff made on or before `cutoff_day` of its month
    pub fn new(date: NaiveDate, amount: Decimal, cutoff_day: u32) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(SchemeError::NegativeAmount {
                field: format!("deposit on {date}"),
                value: amount,
            });
        }
        Ok(Self {
            date,
            amount,
            month: MonthKey::of(date),
            is_eligible_for_interest: date.day() <= cutoff_day,
        })
    }

    /// Record a deposit using the scheme's interest calculation day
    pub fn for_scheme(scheme: &SchemeConfig, date: NaiveDate, amount: Decimal) -> Result<Self> {
        Self::new(date, amount, scheme.interest_calculation_date)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn is_eligible_for_interest(&self) -> bool {
        self.is_eligible_for_interest
    }
}
