/// snapshot - replay a payment history and print the standing as json
use chrono::{TimeZone, Utc};
use debt_ledger_rs::{snapshot, DebtConfig, SafeTimeProvider, SnapshotOptions, TimeSource};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
  "schemaVersion": 1,
  "property": {
    "label": "28 Harewood Drive",
    "erf": "Erf 10520, East London",
    "registrationDate": "2025-09-17"
  },
  "parties": {
    "debtorDisplayName": "Tristan",
    "creditorDisplayName": "Martin"
  },
  "agreement": {
    "principal": 333000,
    "interestMarginBelowRepo": 0.025,
    "graceMonths": 5,
    "minimumMonthlyPayment": 3149.17
  },
  "repoRateTimeline": [
    { "effectiveFrom": "2025-09-01T00:00:00+02:00", "repoRate": 0.07 },
    { "effectiveFrom": "2025-11-20T15:00:00+02:00", "repoRate": 0.0675 }
  ],
  "payments": [
    { "paidAt": "2026-02-27", "amount": 3149.17, "note": "february" },
    { "paidAt": "2026-03-31", "amount": 3149.17 }
  ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DebtConfig::from_json_str(CONFIG)?;

    // pin the clock so the output is reproducible
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 4, 30, 20, 0, 0).unwrap(),
    ));

    let options = SnapshotOptions::new().upcoming_periods(6);
    let snap = snapshot(&config, &options, &time)?;

    println!("=== {} as of {} ===\n", snap.property.label, snap.as_of.format("%Y-%m-%d %H:%M"));
    println!("outstanding:     {}", snap.totals.outstanding_balance);
    println!("arrears:         {}", snap.status.arrears);
    if let Some(due) = snap.status.first_overdue_due_date {
        println!("first overdue:   {}", due);
    }
    println!("interest rate:   {}", snap.current_interest_rate);
    println!("\n{}", snap.to_json_pretty()?);

    Ok(())
}
