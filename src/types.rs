use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// the secured property the loan is registered against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erf: Option<String>,
    pub registration_date: NaiveDate,
}

/// display names for the two parties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debtor_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creditor_display_name: Option<String>,
}

/// contractual terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub principal: Money,
    #[serde(rename = "interestMarginBelowRepo")]
    pub margin_below_reference: Rate,
    pub grace_months: u32,
    pub minimum_monthly_payment: Money,
}

/// reference rate in force from an instant onwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateChange {
    pub effective_from: DateTime<Utc>,
    #[serde(rename = "repoRate")]
    pub rate: Rate,
}

/// historical payment as received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub paid_at: DateTime<Utc>,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// split of a single payment across the balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentApplication {
    pub to_interest: Money,
    pub to_principal: Money,
    /// amount beyond the full outstanding balance, not carried forward
    pub unapplied: Money,
}

impl PaymentApplication {
    pub fn total_applied(&self) -> Money {
        self.to_interest + self.to_principal
    }
}

/// one simulated due-date period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub due_date: NaiveDate,
    pub payment_amount: Money,
    pub interest_charged: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub starting_balance: Money,
    pub ending_balance: Money,
}
