use serde::Serialize;

use crate::decimal::Money;
use crate::types::PaymentApplication;

/// balances after a payment has been allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallOutcome {
    pub principal_outstanding: Money,
    pub accrued_interest_unpaid: Money,
    pub application: PaymentApplication,
}

/// allocate a payment to accrued interest first, then principal
///
/// Whatever exceeds the combined balance comes back as `unapplied` and is never
/// credited forward. Non-positive amounts allocate nothing and come back whole as
/// `unapplied`, so `to_interest + to_principal + unapplied == payment` always holds.
pub fn apply_payment(
    principal_outstanding: Money,
    accrued_interest_unpaid: Money,
    payment: Money,
) -> WaterfallOutcome {
    let mut remaining = payment.non_negative();

    let to_interest = accrued_interest_unpaid.non_negative().min(remaining);
    remaining -= to_interest;

    let to_principal = principal_outstanding.non_negative().min(remaining);

    let application = PaymentApplication {
        to_interest,
        to_principal,
        unapplied: payment - to_interest - to_principal,
    };

    WaterfallOutcome {
        principal_outstanding: principal_outstanding - to_principal,
        accrued_interest_unpaid: accrued_interest_unpaid - to_interest,
        application,
    }
}
