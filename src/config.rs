use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{DebtError, Result};
use crate::interest::{AccrualEngine, RateTimeline};
use crate::payments::DueDateSchedule;
use crate::time::{self, DayBound};
use crate::types::{Agreement, Parties, Payment, Property, RateChange};

/// the only schema version this engine understands
pub const SUPPORTED_SCHEMA_VERSION: u64 = 1;

/// periods shown in the upcoming schedule unless overridden
pub const DEFAULT_UPCOMING_PERIODS: u32 = 12;

/// largest principal, instalment or payment magnitude accepted, in whole currency units
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// largest reference rate or margin magnitude accepted (10 is 1000%)
pub const MAX_RATE: i64 = 10;

/// validated, immutable debt configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtConfig {
    pub property: Property,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parties: Option<Parties>,
    pub agreement: Agreement,
    #[serde(rename = "repoRateTimeline")]
    pub rate_timeline: RateTimeline,
    /// input order; the ledger sorts on replay
    pub payments: Vec<Payment>,
}

impl DebtConfig {
    /// parse and validate raw json text
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        validate_config(&value)
    }

    /// validate an already-parsed json value
    pub fn from_value(raw: &Value) -> Result<Self> {
        validate_config(raw)
    }

    /// start of registration day, where interest begins
    pub fn registration_start(&self) -> Result<DateTime<Utc>> {
        time::date_start(self.property.registration_date)
    }

    pub fn due_dates(&self) -> DueDateSchedule {
        DueDateSchedule::new(self.property.registration_date, self.agreement.grace_months)
    }

    pub fn first_payment_due_date(&self) -> Result<NaiveDate> {
        self.due_dates().first_due_date()
    }

    pub fn accrual_engine(&self) -> AccrualEngine<'_> {
        AccrualEngine::new(&self.rate_timeline, self.agreement.margin_below_reference)
    }
}

/// normalize untyped input into a [`DebtConfig`], failing on the first invalid field
pub fn validate_config(raw: &Value) -> Result<DebtConfig> {
    let root = raw
        .as_object()
        .ok_or_else(|| DebtError::schema("$", "debt config must be an object"))?;

    let version_ok = root
        .get("schemaVersion")
        .and_then(Value::as_f64)
        .map(|v| v == SUPPORTED_SCHEMA_VERSION as f64)
        .unwrap_or(false);
    if !version_ok {
        return Err(DebtError::schema(
            "schemaVersion",
            format!("must be {}", SUPPORTED_SCHEMA_VERSION),
        ));
    }

    let property = parse_property(root.get("property"))?;
    let parties = root.get("parties").and_then(Value::as_object).map(parse_parties);
    let agreement = parse_agreement(root.get("agreement"))?;
    let rate_timeline = parse_timeline(root.get("repoRateTimeline"))?;
    let payments = parse_payments(root.get("payments"))?;

    Ok(DebtConfig {
        property,
        parties,
        agreement,
        rate_timeline,
        payments,
    })
}

fn parse_property(value: Option<&Value>) -> Result<Property> {
    let obj = object(value, "property")?;
    let label = string_field(obj, "property", "label")?;
    let registration_raw = string_field(obj, "property", "registrationDate")?;

    if !time::is_date_only(&registration_raw) {
        return Err(DebtError::schema(
            "property.registrationDate",
            format!("must be YYYY-MM-DD, got {}", registration_raw),
        ));
    }
    let registration_date = time::parse_date_only(&registration_raw)
        .ok_or_else(|| DebtError::timestamp("property.registrationDate", registration_raw.clone()))?;

    Ok(Property {
        label,
        erf: optional_string(obj, "erf"),
        registration_date,
    })
}

fn parse_parties(obj: &Map<String, Value>) -> Parties {
    Parties {
        debtor_display_name: optional_string(obj, "debtorDisplayName"),
        creditor_display_name: optional_string(obj, "creditorDisplayName"),
    }
}

fn parse_agreement(value: Option<&Value>) -> Result<Agreement> {
    let obj = object(value, "agreement")?;

    let principal = amount_field(obj, "agreement", "principal")?;
    let margin = rate_field(obj, "agreement", "interestMarginBelowRepo")?;
    let grace = number_field(obj, "agreement", "graceMonths")?;
    let minimum = amount_field(obj, "agreement", "minimumMonthlyPayment")?;

    let grace_months = (if grace.fract().is_zero() { grace.to_u32() } else { None })
        .ok_or_else(|| DebtError::schema("agreement.graceMonths", "must be a non-negative integer"))?;

    let principal = Money::from_decimal(principal);
    if principal.is_negative() {
        return Err(DebtError::schema("agreement.principal", "must not be negative"));
    }
    let minimum_monthly_payment = Money::from_decimal(minimum);
    if minimum_monthly_payment.is_negative() {
        return Err(DebtError::schema("agreement.minimumMonthlyPayment", "must not be negative"));
    }

    Ok(Agreement {
        principal,
        margin_below_reference: Rate::from_decimal(margin),
        grace_months,
        minimum_monthly_payment,
    })
}

fn parse_timeline(value: Option<&Value>) -> Result<RateTimeline> {
    let entries = value
        .and_then(Value::as_array)
        .ok_or_else(|| DebtError::schema("repoRateTimeline", "must be an array"))?;
    if entries.is_empty() {
        return Err(DebtError::EmptyTimeline);
    }

    let mut changes = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let path = format!("repoRateTimeline[{}]", i);
        let obj = object(Some(entry), &path)?;
        let effective_raw = string_field(obj, &path, "effectiveFrom")?;
        let rate = rate_field(obj, &path, "repoRate")?;
        let effective_from =
            time::parse_instant(&format!("{}.effectiveFrom", path), &effective_raw, DayBound::Start)?;
        changes.push(RateChange {
            effective_from,
            rate: Rate::from_decimal(rate),
        });
    }

    RateTimeline::new(changes)
}

fn parse_payments(value: Option<&Value>) -> Result<Vec<Payment>> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(DebtError::schema("payments", "must be an array")),
    };

    let mut payments = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let path = format!("payments[{}]", i);
        let obj = object(Some(entry), &path)?;
        let paid_raw = string_field(obj, &path, "paidAt")?;
        let amount = amount_field(obj, &path, "amount")?;
        let paid_at = time::parse_instant(&format!("{}.paidAt", path), &paid_raw, DayBound::EndExclusive)?;
        payments.push(Payment {
            paid_at,
            amount: Money::from_decimal(amount),
            note: optional_string(obj, "note"),
        });
    }

    Ok(payments)
}

fn object<'v>(value: Option<&'v Value>, path: &str) -> Result<&'v Map<String, Value>> {
    value
        .and_then(Value::as_object)
        .ok_or_else(|| DebtError::schema(path, "must be an object"))
}

fn string_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| DebtError::schema(format!("{}.{}", path, key), "must be a string"))
}

fn number_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Decimal> {
    obj.get(key)
        .and_then(|v| match v {
            Value::Number(n) => decimal_from_number(n),
            _ => None,
        })
        .ok_or_else(|| DebtError::schema(format!("{}.{}", path, key), "must be a number"))
}

fn bounded_field(obj: &Map<String, Value>, path: &str, key: &str, limit: i64) -> Result<Decimal> {
    let value = number_field(obj, path, key)?;
    if value.abs() > Decimal::from(limit) {
        return Err(DebtError::schema(
            format!("{}.{}", path, key),
            format!("magnitude must not exceed {}", limit),
        ));
    }
    Ok(value)
}

fn amount_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Decimal> {
    bounded_field(obj, path, key, MAX_AMOUNT)
}

fn rate_field(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Decimal> {
    bounded_field(obj, path, key, MAX_RATE)
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// exact decimal from the json literal, so 3149.17 stays 3149.17
fn decimal_from_number(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// per-call knobs for a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOptions {
    /// bare dates count the whole day; `None` reads the clock
    pub as_of: Option<String>,
    pub upcoming_periods: u32,
    /// what-if amount used instead of the minimum payment for future periods
    pub payment_override: Option<Money>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            as_of: None,
            upcoming_periods: DEFAULT_UPCOMING_PERIODS,
            payment_override: None,
        }
    }
}

impl SnapshotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_of(mut self, as_of: impl Into<String>) -> Self {
        self.as_of = Some(as_of.into());
        self
    }

    pub fn upcoming_periods(mut self, periods: u32) -> Self {
        self.upcoming_periods = periods;
        self
    }

    pub fn payment_override(mut self, amount: Money) -> Self {
        self.payment_override = Some(amount);
        self
    }

    /// resolve the as-of instant, falling back to the provider's clock
    pub fn resolve_as_of(&self, time_provider: &SafeTimeProvider) -> Result<DateTime<Utc>> {
        match &self.as_of {
            Some(raw) => time::parse_instant("asOf", raw, DayBound::EndExclusive),
            None => Ok(time_provider.now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harewood_json;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_valid_config_is_normalized() {
        let config = validate_config(&harewood_json()).unwrap();

        assert_eq!(config.property.label, "28 Harewood Drive");
        assert_eq!(config.property.erf.as_deref(), Some("Erf 10520, East London"));
        assert_eq!(
            config.property.registration_date,
            NaiveDate::from_ymd_opt(2025, 9, 17).unwrap()
        );
        assert_eq!(config.agreement.principal, Money::from_major(333_000));
        assert_eq!(config.agreement.margin_below_reference.as_decimal(), dec!(0.025));
        assert_eq!(config.agreement.grace_months, 5);
        assert_eq!(
            config.agreement.minimum_monthly_payment,
            Money::from_str_exact("3149.17").unwrap()
        );
        assert_eq!(config.rate_timeline.entries().len(), 2);
        assert!(config.payments.is_empty());
        assert_eq!(
            config.parties.unwrap().debtor_display_name.as_deref(),
            Some("Tristan")
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut raw = harewood_json();
        raw["somethingNew"] = json!({"nested": true});
        raw["agreement"]["extra"] = json!("ignored");
        assert!(validate_config(&raw).is_ok());
    }

    #[test]
    fn test_wrong_schema_version() {
        let mut raw = harewood_json();
        raw["schemaVersion"] = json!(2);
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "schemaVersion"),
            other => panic!("unexpected: {:?}", other),
        }

        raw.as_object_mut().unwrap().remove("schemaVersion");
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));
    }

    #[test]
    fn test_non_object_root() {
        assert!(matches!(validate_config(&json!([1, 2])), Err(DebtError::Schema { .. })));
    }

    #[test]
    fn test_registration_date_shape() {
        let mut raw = harewood_json();
        raw["property"]["registrationDate"] = json!("17/09/2025");
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "property.registrationDate"),
            other => panic!("unexpected: {:?}", other),
        }

        raw["property"]["registrationDate"] = json!("2025-02-30");
        assert!(matches!(validate_config(&raw), Err(DebtError::TimestampParse { .. })));
    }

    #[test]
    fn test_agreement_fields_must_be_numeric() {
        let mut raw = harewood_json();
        raw["agreement"]["principal"] = json!("333000");
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "agreement.principal"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_grace_months_must_be_whole() {
        let mut raw = harewood_json();
        raw["agreement"]["graceMonths"] = json!(2.5);
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));

        raw["agreement"]["graceMonths"] = json!(-1);
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));

        raw["agreement"]["graceMonths"] = json!(3.0);
        assert_eq!(validate_config(&raw).unwrap().agreement.grace_months, 3);
    }

    #[test]
    fn test_out_of_range_magnitudes_rejected() {
        let mut raw = harewood_json();
        raw["agreement"]["principal"] = json!(5e28);
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "agreement.principal"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut raw = harewood_json();
        raw["agreement"]["minimumMonthlyPayment"] = json!(1e16);
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));

        let mut raw = harewood_json();
        raw["repoRateTimeline"][0]["repoRate"] = json!(1_000_000);
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "repoRateTimeline[0].repoRate"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut raw = harewood_json();
        raw["payments"] = json!([{"paidAt": "2026-02-27", "amount": -1e20}]);
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "payments[0].amount"),
            other => panic!("unexpected: {:?}", other),
        }

        let mut raw = harewood_json();
        raw["agreement"]["principal"] = json!(MAX_AMOUNT);
        raw["agreement"]["interestMarginBelowRepo"] = json!(-MAX_RATE);
        assert_eq!(
            validate_config(&raw).unwrap().agreement.principal,
            Money::from_major(MAX_AMOUNT)
        );
    }

    #[test]
    fn test_timeline_errors() {
        let mut raw = harewood_json();
        raw["repoRateTimeline"] = json!([]);
        assert!(matches!(validate_config(&raw), Err(DebtError::EmptyTimeline)));

        raw.as_object_mut().unwrap().remove("repoRateTimeline");
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));

        let mut raw = harewood_json();
        raw["repoRateTimeline"][1]["effectiveFrom"] = json!("not a date");
        match validate_config(&raw) {
            Err(DebtError::TimestampParse { field, value }) => {
                assert_eq!(field, "repoRateTimeline[1].effectiveFrom");
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let mut raw = harewood_json();
        raw["repoRateTimeline"][0]["repoRate"] = json!(null);
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));
    }

    #[test]
    fn test_payment_parsing() {
        let mut raw = harewood_json();
        raw["payments"] = json!([
            {"paidAt": "2026-02-27", "amount": 3149.17, "note": "feb"},
            {"paidAt": "2026-01-10T09:30:00+02:00", "amount": 0, "note": 12}
        ]);
        let config = validate_config(&raw).unwrap();

        assert_eq!(config.payments.len(), 2);
        assert_eq!(config.payments[0].paid_at, Utc.with_ymd_and_hms(2026, 2, 27, 22, 0, 0).unwrap());
        assert_eq!(config.payments[0].note.as_deref(), Some("feb"));
        assert_eq!(config.payments[1].note, None);
        assert!(config.payments[1].amount.is_zero());

        raw["payments"] = json!([{"paidAt": "2026-02-27"}]);
        match validate_config(&raw) {
            Err(DebtError::Schema { field, .. }) => assert_eq!(field, "payments[0].amount"),
            other => panic!("unexpected: {:?}", other),
        }

        raw["payments"] = json!({"paidAt": "2026-02-27", "amount": 5});
        assert!(matches!(validate_config(&raw), Err(DebtError::Schema { .. })));

        raw["payments"] = json!(null);
        assert!(validate_config(&raw).unwrap().payments.is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = harewood_json();
        let before = raw.clone();
        let _ = validate_config(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_from_json_str_reports_malformed_text() {
        assert!(matches!(DebtConfig::from_json_str("{not json"), Err(DebtError::Json(_))));
        let text = harewood_json().to_string();
        assert!(DebtConfig::from_json_str(&text).is_ok());
    }

    #[test]
    fn test_first_payment_due_date() {
        let config = validate_config(&harewood_json()).unwrap();
        assert_eq!(
            config.first_payment_due_date().unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_options_resolve_as_of() {
        let pinned = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(pinned));

        assert_eq!(SnapshotOptions::new().resolve_as_of(&time).unwrap(), pinned);

        let opts = SnapshotOptions::new().as_of("2026-02-28");
        assert_eq!(
            opts.resolve_as_of(&time).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 28, 22, 0, 0).unwrap()
        );
        assert_eq!(opts.upcoming_periods, DEFAULT_UPCOMING_PERIODS);
    }
}
