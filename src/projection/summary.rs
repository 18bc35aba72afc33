//! Reduce a ledger into headline figures

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::MONEY_DP;
use super::ledger::MonthlyLedgerRow;
use super::schedule::{ContributionSource, MonthStatus};
use crate::calendar::MonthKey;
use crate::scheme::SchemeConfig;

/// Headline figures for one scheme as of an evaluation month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub total_invested: Decimal,
    pub total_recurring_contributions: Decimal,
    pub total_interest: Decimal,
    /// Closing balance of the last ledger month
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    /// Profit/loss as a percentage of the amount invested; 0 when nothing was invested
    pub profit_loss_percentage: Decimal,
    pub projected_maturity_value: Decimal,
    pub years_to_maturity: f64,
    pub months_skipped: u32,
    pub months_paused: u32,
    pub months_over_limit: u32,
    /// Contributions in the financial year containing the evaluation month
    pub annual_limit_used: Decimal,
    pub annual_limit_remaining: Decimal,
}

impl CalculationResult {
    pub fn from_ledger(
        scheme: &SchemeConfig,
        ledger: &[MonthlyLedgerRow],
        evaluation_month: MonthKey,
        projected_maturity_value: Decimal,
    ) -> Self {
        let total_invested: Decimal = ledger.iter().map(|r| r.contribution).sum();
        let total_recurring_contributions: Decimal = ledger
            .iter()
            .filter(|r| r.source == ContributionSource::Recurring)
            .map(|r| r.contribution)
            .sum();

        let (current_value, total_interest) = ledger
            .last()
            .map(|r| (r.balance, r.cumulative_interest))
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));

        let profit_loss = current_value - total_invested;
        let profit_loss_percentage = if total_invested.is_zero() {
            Decimal::ZERO
        } else {
            (profit_loss / total_invested * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
        };

        let current_year = scheme.financial_year_of(evaluation_month);
        let annual_limit_used: Decimal = ledger
            .iter()
            .filter(|r| r.financial_year == current_year)
            .map(|r| r.contribution)
            .sum();
        let annual_limit_remaining = (scheme.annual_limit - annual_limit_used).max(Decimal::ZERO);

        let months_to_maturity = evaluation_month.months_until(scheme.maturity_month()).max(0);

        Self {
            total_invested,
            total_recurring_contributions,
            total_interest,
            current_value,
            profit_loss,
            profit_loss_percentage,
            projected_maturity_value,
            years_to_maturity: f64::from(months_to_maturity) / 12.0,
            months_skipped: count_status(ledger, MonthStatus::Skipped),
            months_paused: count_status(ledger, MonthStatus::Paused),
            months_over_limit: ledger.iter().filter(|r| r.is_over_limit()).count() as u32,
            annual_limit_used,
            annual_limit_remaining,
        }
    }
}

fn count_status(ledger: &[MonthlyLedgerRow], status: MonthStatus) -> u32 {
    ledger.iter().filter(|r| r.status == status).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn row(m: &str, contribution: Decimal, source: ContributionSource, status: MonthStatus, balance: Decimal) -> MonthlyLedgerRow {
        let key = month(m);
        MonthlyLedgerRow {
            month: key,
            financial_year: key.financial_year(4),
            contribution,
            source,
            status,
            interest_rate: dec!(7.1),
            interest_credited: dec!(0),
            cumulative_interest: balance - dec!(1000),
            balance,
            counts_toward_limit: contribution > Decimal::ZERO,
            year_to_date_contributions: dec!(0),
            limit_overage: dec!(0),
            is_eligible_for_interest: true,
        }
    }

    fn scheme() -> SchemeConfig {
        SchemeConfig::new(month("2023-04"), NaiveDate::from_ymd_opt(2038, 3, 31).unwrap(), dec!(1500))
    }

    #[test]
    fn test_totals_and_counts() {
        let ledger = vec![
            row("2024-02", dec!(500), ContributionSource::Manual, MonthStatus::Contributed, dec!(500)),
            row("2024-03", dec!(0), ContributionSource::None, MonthStatus::Skipped, dec!(503)),
            row("2024-04", dec!(500), ContributionSource::Recurring, MonthStatus::Contributed, dec!(1006)),
            row("2024-05", dec!(0), ContributionSource::None, MonthStatus::Paused, dec!(1100)),
        ];
        let result = CalculationResult::from_ledger(&scheme(), &ledger, month("2024-05"), dec!(5000));

        assert_eq!(result.total_invested, dec!(1000));
        assert_eq!(result.total_recurring_contributions, dec!(500));
        assert_eq!(result.current_value, dec!(1100));
        assert_eq!(result.total_interest, dec!(100));
        assert_eq!(result.profit_loss, dec!(100));
        assert_eq!(result.profit_loss_percentage, dec!(10.00));
        assert_eq!(result.months_skipped, 1);
        assert_eq!(result.months_paused, 1);
        // only FY2024 (April onward) counts toward this year's limit
        assert_eq!(result.annual_limit_used, dec!(500));
        assert_eq!(result.annual_limit_remaining, dec!(1000));
        assert_eq!(result.projected_maturity_value, dec!(5000));
        // 2024-05 to 2038-03 is 166 months
        assert_relative_eq!(result.years_to_maturity, 166.0 / 12.0);
    }

    #[test]
    fn test_empty_ledger_guards_division() {
        let result = CalculationResult::from_ledger(&scheme(), &[], month("2023-01"), Decimal::ZERO);
        assert_eq!(result.total_invested, Decimal::ZERO);
        assert_eq!(result.profit_loss_percentage, Decimal::ZERO);
        assert_eq!(result.annual_limit_remaining, dec!(1500));
    }

    #[test]
    fn test_remaining_floored_at_zero() {
        let ledger = vec![row("2023-04", dec!(2000), ContributionSource::Manual, MonthStatus::Contributed, dec!(2000))];
        let result = CalculationResult::from_ledger(&scheme(), &ledger, month("2023-04"), dec!(2000));
        assert_eq!(result.annual_limit_used, dec!(2000));
        assert_eq!(result.annual_limit_remaining, Decimal::ZERO);
    }

    #[test]
    fn test_years_to_maturity_after_maturity() {
        let result = CalculationResult::from_ledger(&scheme(), &[], month("2040-01"), Decimal::ZERO);
        assert_relative_eq!(result.years_to_maturity, 0.0);
    }
}
