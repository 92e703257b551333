use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DebtConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::{project_payoff, PayoffProjection};
use crate::snapshot::replay_ledger;

/// payoff at the minimum payment next to payoff at a chosen monthly amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentComparison {
    pub monthly_payment: Money,
    pub baseline: PayoffProjection,
    pub scenario: PayoffProjection,
    /// negative when the chosen amount costs more interest
    pub interest_saved: Money,
    pub periods_saved: i64,
}

/// project payoff twice from the replayed state at `as_of`
pub fn compare_payment(
    config: &DebtConfig,
    as_of: DateTime<Utc>,
    monthly_payment: Money,
) -> Result<PaymentComparison> {
    let replay = replay_ledger(config, as_of)?;

    let baseline = project_payoff(config, replay.state, as_of, None)?;
    let scenario = project_payoff(config, replay.state, as_of, Some(monthly_payment))?;

    let interest_saved = baseline.total_interest_remaining - scenario.total_interest_remaining;
    let periods_saved = baseline.payments_remaining as i64 - scenario.payments_remaining as i64;

    tracing::debug!(
        monthly_payment = %monthly_payment,
        interest_saved = %interest_saved,
        periods_saved,
        "payment scenario compared"
    );

    Ok(PaymentComparison {
        monthly_payment,
        baseline,
        scenario,
        interest_saved,
        periods_saved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat_config, harewood_config};
    use crate::time::date_end_exclusive;
    use chrono::NaiveDate;
    use serde_json::json;

    fn end_of(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        date_end_exclusive(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    #[test]
    fn test_larger_payment_saves_interest_and_periods() {
        let config = harewood_config();
        let comparison = compare_payment(&config, end_of(2025, 11, 20), Money::from_major(10_000)).unwrap();

        assert_eq!(comparison.baseline.payments_remaining, 136);
        assert!(comparison.scenario.converged);
        assert!(comparison.scenario.payments_remaining < 136);
        assert!(comparison.interest_saved.is_positive());
        assert_eq!(
            comparison.periods_saved,
            136 - comparison.scenario.payments_remaining as i64
        );
    }

    #[test]
    fn test_same_payment_saves_nothing() {
        let config = flat_config(10_000, "1000", 0, json!([]));
        let minimum = config.agreement.minimum_monthly_payment;
        let comparison = compare_payment(&config, end_of(2025, 1, 20), minimum).unwrap();

        assert_eq!(comparison.baseline, comparison.scenario);
        assert!(comparison.interest_saved.is_zero());
        assert_eq!(comparison.periods_saved, 0);
    }

    #[test]
    fn test_smaller_payment_reports_negative_savings() {
        let config = flat_config(10_000, "1000", 0, json!([]));
        let comparison = compare_payment(&config, end_of(2025, 1, 20), Money::from_major(500)).unwrap();

        assert!(comparison.interest_saved.is_negative());
        assert!(comparison.periods_saved < 0);
    }

    #[test]
    fn test_non_converging_scenario_is_flagged() {
        let config = harewood_config();
        let comparison = compare_payment(&config, end_of(2025, 11, 20), Money::from_major(1_000)).unwrap();

        assert!(comparison.baseline.converged);
        assert!(!comparison.scenario.converged);
    }
}
