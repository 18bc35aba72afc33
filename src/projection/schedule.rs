//! Month-indexed contribution schedule
//!
//! Merges the manual deposit history with the recurring rule, skipped months
//! and pause into one intent per calendar month. Precedence per month:
//! 1. manual deposits for the month
//! 2. skipped month
//! 3. paused (month >= `paused_since`)
//! 4. recurring rule, when enabled, started and due under the scheme frequency
//! 5. nothing

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::MonthKey;
use crate::scheme::{DepositEntry, SchemeConfig};

/// Where a month's contribution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionSource {
    Manual,
    Recurring,
    None,
}

/// Ledger status of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthStatus {
    Contributed,
    Skipped,
    Paused,
}

/// What the scheme intends to contribute in one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionIntent {
    pub month: MonthKey,
    pub amount: Decimal,
    pub source: ContributionSource,
    pub status: MonthStatus,
    /// False if any deposit of the month landed after the cutoff day
    pub is_eligible_for_interest: bool,
}

/// Manual deposits of one month, aggregated
#[derive(Debug, Clone, Copy)]
struct MonthDeposits {
    total: Decimal,
    all_eligible: bool,
}

/// Builds contribution intents for a scheme and its deposit history
pub struct ScheduleBuilder<'a> {
    scheme: &'a SchemeConfig,
    manual: BTreeMap<MonthKey, MonthDeposits>,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(scheme: &'a SchemeConfig, deposits: &[DepositEntry]) -> Self {
        let mut manual: BTreeMap<MonthKey, MonthDeposits> = BTreeMap::new();
        for deposit in deposits {
            let slot = manual.entry(deposit.month()).or_insert(MonthDeposits {
                total: Decimal::ZERO,
                all_eligible: true,
            });
            slot.total += deposit.amount();
            // one late deposit taints the whole month
            slot.all_eligible &= deposit.is_eligible_for_interest();
        }
        for (month, deposits) in &manual {
            if *month < scheme.start_date || *month > scheme.maturity_month() {
                log::debug!("Ignoring {} deposited in {} outside the scheme term", deposits.total, month);
            }
        }
        Self { scheme, manual }
    }

    /// Intents from the scheme start through `min(maturity, evaluation_month)`
    pub fn build(&self, evaluation_month: MonthKey) -> Vec<ContributionIntent> {
        let last = evaluation_month.min(self.scheme.maturity_month());
        self.build_range(self.scheme.start_date, last)
    }

    /// Intents for `first..=last`, clipped to the scheme's start and maturity
    pub fn build_range(&self, first: MonthKey, last: MonthKey) -> Vec<ContributionIntent> {
        let first = first.max(self.scheme.start_date);
        let last = last.min(self.scheme.maturity_month());

        first.range_to(last).map(|month| self.intent_for(month)).collect()
    }

    fn intent_for(&self, month: MonthKey) -> ContributionIntent {
        if let Some(deposits) = self.manual.get(&month) {
            return ContributionIntent {
                month,
                amount: deposits.total,
                source: ContributionSource::Manual,
                status: MonthStatus::Contributed,
                is_eligible_for_interest: deposits.all_eligible,
            };
        }

        if self.scheme.skipped_months.contains(&month) {
            return idle(month, MonthStatus::Skipped);
        }

        if self.scheme.paused_since.is_some_and(|since| month >= since) {
            return idle(month, MonthStatus::Paused);
        }

        if let Some(rule) = self.scheme.active_recurring() {
            if month >= rule.start_month && self.scheme.frequency.is_due(rule.start_month, month) {
                return ContributionIntent {
                    month,
                    amount: rule.amount,
                    source: ContributionSource::Recurring,
                    status: MonthStatus::Contributed,
                    is_eligible_for_interest: self.scheme.is_before_cutoff(month.day(rule.deposit_day)),
                };
            }
        }

        idle(month, MonthStatus::Contributed)
    }
}

/// A month with no contribution; the held balance still accrues
fn idle(month: MonthKey, status: MonthStatus) -> ContributionIntent {
    ContributionIntent {
        month,
        amount: Decimal::ZERO,
        source: ContributionSource::None,
        status,
        is_eligible_for_interest: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{Frequency, RecurringRule};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheme() -> SchemeConfig {
        let mut config = SchemeConfig::new(month("2023-04"), date(2038, 3, 31), dec!(150000));
        config.recurring = Some(RecurringRule {
            amount: dec!(12500),
            enabled: true,
            start_month: month("2023-04"),
            deposit_day: 1,
        });
        config
    }

    #[test]
    fn test_one_intent_per_month() {
        let config = scheme();
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2024-03"));

        assert_eq!(intents.len(), 12);
        assert!(intents.windows(2).all(|w| w[0].month < w[1].month));
        assert!(intents.iter().all(|i| i.amount == dec!(12500) && i.source == ContributionSource::Recurring));
    }

    #[test]
    fn test_manual_beats_skip_and_recurring() {
        let mut config = scheme();
        config.skipped_months.insert(month("2023-05"));
        let deposits = vec![
            DepositEntry::for_scheme(&config, date(2023, 5, 2), dec!(1000)).unwrap(),
            DepositEntry::for_scheme(&config, date(2023, 5, 20), dec!(500)).unwrap(),
        ];
        let intents = ScheduleBuilder::new(&config, &deposits).build(month("2023-06"));

        let may = &intents[1];
        assert_eq!(may.amount, dec!(1500));
        assert_eq!(may.source, ContributionSource::Manual);
        assert_eq!(may.status, MonthStatus::Contributed);
        // the 20th is after the cutoff
        assert!(!may.is_eligible_for_interest);
        assert_eq!(intents[2].source, ContributionSource::Recurring);
    }

    #[test]
    fn test_skip_beats_pause() {
        let mut config = scheme();
        config.skipped_months.insert(month("2023-09"));
        config.paused_since = Some(month("2023-08"));
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2023-10"));

        let statuses: Vec<MonthStatus> = intents.iter().map(|i| i.status).collect();
        assert_eq!(statuses[4], MonthStatus::Paused);
        assert_eq!(statuses[5], MonthStatus::Skipped);
        assert_eq!(statuses[6], MonthStatus::Paused);
        assert!(intents[4..].iter().all(|i| i.amount.is_zero()));
    }

    #[test]
    fn test_recurring_start_month() {
        let mut config = scheme();
        config.recurring.as_mut().unwrap().start_month = month("2023-06");
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2023-07"));

        assert_eq!(intents[0].source, ContributionSource::None);
        assert_eq!(intents[0].status, MonthStatus::Contributed);
        assert_eq!(intents[2].amount, dec!(12500));
    }

    #[test]
    fn test_disabled_and_irregular_rules() {
        let mut config = scheme();
        config.frequency = Frequency::Irregular;
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2023-12"));
        assert!(intents.iter().all(|i| i.amount.is_zero()));

        let mut config = scheme();
        config.recurring.as_mut().unwrap().enabled = false;
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2023-12"));
        assert!(intents.iter().all(|i| i.source == ContributionSource::None));
    }

    #[test]
    fn test_quarterly_rule() {
        let mut config = scheme();
        config.frequency = Frequency::Quarterly;
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2024-03"));
        let paying: Vec<String> = intents
            .iter()
            .filter(|i| !i.amount.is_zero())
            .map(|i| i.month.to_string())
            .collect();
        assert_eq!(paying, vec!["2023-04", "2023-07", "2023-10", "2024-01"]);
    }

    #[test]
    fn test_late_recurring_day_is_ineligible() {
        let mut config = scheme();
        config.recurring.as_mut().unwrap().deposit_day = 10;
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2023-04"));
        assert!(!intents[0].is_eligible_for_interest);
    }

    #[test]
    fn test_maturity_truncates_and_start_after_evaluation() {
        let mut config = scheme();
        config.maturity_date = date(2023, 9, 15);
        let intents = ScheduleBuilder::new(&config, &[]).build(month("2025-01"));
        assert_eq!(intents.last().unwrap().month, month("2023-09"));

        let config = scheme();
        assert!(ScheduleBuilder::new(&config, &[]).build(month("2023-03")).is_empty());
    }
}
