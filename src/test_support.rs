use serde_json::{json, Value};

use crate::config::{validate_config, DebtConfig};

/// the worked example: 333000 registered 2025-09-17, repo 7% then 6.75%
pub fn harewood_json() -> Value {
    json!({
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
            {"effectiveFrom": "2025-09-01T00:00:00+02:00", "repoRate": 0.07},
            {"effectiveFrom": "2025-11-20T15:00:00+02:00", "repoRate": 0.0675}
        ],
        "payments": []
    })
}

pub fn harewood_config() -> DebtConfig {
    validate_config(&harewood_json()).unwrap()
}

pub fn harewood_with_payments(payments: Value) -> DebtConfig {
    let mut raw = harewood_json();
    raw["payments"] = payments;
    validate_config(&raw).unwrap()
}

/// small round-number loan with a single flat rate
pub fn flat_config(principal: i64, minimum: &str, grace_months: u32, payments: Value) -> DebtConfig {
    let raw = json!({
        "schemaVersion": 1,
        "property": {"label": "flat", "registrationDate": "2025-01-15"},
        "agreement": {
            "principal": principal,
            "interestMarginBelowRepo": 0.0,
            "graceMonths": grace_months,
            "minimumMonthlyPayment": minimum.parse::<f64>().unwrap()
        },
        "repoRateTimeline": [
            {"effectiveFrom": "2025-01-01", "repoRate": 0.1}
        ],
        "payments": payments
    });
    validate_config(&raw).unwrap()
}
