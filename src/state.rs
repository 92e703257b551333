use serde::Serialize;

use crate::decimal::Money;
use crate::payments::apply_payment;
use crate::types::PaymentApplication;

/// running balances of a single replay or projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    pub principal_outstanding: Money,
    pub accrued_interest_unpaid: Money,
}

impl LedgerState {
    pub fn new(principal: Money) -> Self {
        Self {
            principal_outstanding: principal,
            accrued_interest_unpaid: Money::ZERO,
        }
    }

    /// principal plus unpaid interest
    pub fn outstanding(&self) -> Money {
        self.principal_outstanding + self.accrued_interest_unpaid
    }

    pub fn is_settled(&self) -> bool {
        !self.outstanding().is_positive()
    }

    /// add an already-rounded interest charge
    pub fn charge_interest(&mut self, amount: Money) {
        self.accrued_interest_unpaid += amount;
    }

    /// run a payment through the waterfall and keep the resulting balances
    pub fn apply(&mut self, amount: Money) -> PaymentApplication {
        let outcome = apply_payment(self.principal_outstanding, self.accrued_interest_unpaid, amount);
        self.principal_outstanding = outcome.principal_outstanding;
        self.accrued_interest_unpaid = outcome.accrued_interest_unpaid;
        outcome.application
    }
}
