/// what if - compare payoff at the minimum against larger monthly payments
use debt_ledger_rs::time::date_end_exclusive;
use debt_ledger_rs::{compare_payment, DebtConfig, Money};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
  "schemaVersion": 1,
  "property": { "label": "28 Harewood Drive", "registrationDate": "2025-09-17" },
  "agreement": {
    "principal": 333000,
    "interestMarginBelowRepo": 0.025,
    "graceMonths": 5,
    "minimumMonthlyPayment": 3149.17
  },
  "repoRateTimeline": [
    { "effectiveFrom": "2025-09-01", "repoRate": 0.07 },
    { "effectiveFrom": "2025-11-20T15:00:00+02:00", "repoRate": 0.0675 }
  ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = DebtConfig::from_json_str(CONFIG)?;
    let as_of = date_end_exclusive(NaiveDate::from_ymd_opt(2026, 1, 31).ok_or("bad date")?)?;

    println!("=== what if ===\n");
    for amount in [2_000, 3_500, 5_000, 10_000] {
        let cmp = compare_payment(&config, as_of, Money::from_major(amount))?;
        match cmp.scenario.payoff_date.filter(|_| cmp.scenario.converged) {
            Some(payoff) => println!(
                "{:>9}/month: paid off {} after {} payments, interest saved {}, {} periods sooner",
                cmp.monthly_payment,
                payoff,
                cmp.scenario.payments_remaining,
                cmp.interest_saved,
                cmp.periods_saved
            ),
            None => println!(
                "{:>9}/month: never paid off, payment does not cover interest",
                cmp.monthly_payment
            ),
        }
    }

    Ok(())
}
