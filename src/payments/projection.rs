use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::DebtConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::interest::AccrualEngine;
use crate::payments::due_dates::{DueDateSchedule, MAX_INSTALLMENTS};
use crate::state::LedgerState;
use crate::time;
use crate::types::ScheduleEntry;

/// walks forward one due date at a time from a ledger state
///
/// Each period charges interest on the outstanding principal up to the end of the due
/// day, rounded once, then pays the configured amount capped at what is owed.
pub struct PeriodStepper<'a> {
    engine: AccrualEngine<'a>,
    due_dates: DueDateSchedule,
    planned_payment: Money,
    state: LedgerState,
    cursor: DateTime<Utc>,
    next_installment: Option<u32>,
}

impl<'a> PeriodStepper<'a> {
    pub fn new(
        config: &'a DebtConfig,
        state: LedgerState,
        from: DateTime<Utc>,
        payment_override: Option<Money>,
    ) -> Result<Self> {
        let due_dates = config.due_dates();
        let next_installment = due_dates.next_installment(from)?;
        let planned_payment = payment_override
            .unwrap_or(config.agreement.minimum_monthly_payment)
            .non_negative();

        Ok(Self {
            engine: config.accrual_engine(),
            due_dates,
            planned_payment,
            state,
            cursor: from,
            next_installment,
        })
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    /// simulate the next period; `None` once no installment is left to step to
    pub fn step(&mut self) -> Result<Option<ScheduleEntry>> {
        let installment = match self.next_installment {
            Some(installment) => installment,
            None => return Ok(None),
        };
        let due_date = self.due_dates.due_date(installment)?;
        let cutoff = time::date_end_exclusive(due_date)?;

        let interest_charged =
            self.engine
                .interest_charge(self.state.principal_outstanding, self.cursor, cutoff)?;
        self.state.charge_interest(interest_charged);

        let starting_balance = self.state.outstanding();
        let payment_amount = self.planned_payment.min(starting_balance).non_negative();
        let applied = self.state.apply(payment_amount);

        self.cursor = cutoff;
        self.next_installment = installment.checked_add(1);

        Ok(Some(ScheduleEntry {
            due_date,
            payment_amount,
            interest_charged,
            interest_portion: applied.to_interest,
            principal_portion: applied.to_principal,
            starting_balance,
            ending_balance: self.state.outstanding(),
        }))
    }
}

/// next `periods` due dates from `state` as of `from`, ending early at payoff
pub fn upcoming_schedule(
    config: &DebtConfig,
    state: LedgerState,
    from: DateTime<Utc>,
    periods: u32,
    payment_override: Option<Money>,
) -> Result<Vec<ScheduleEntry>> {
    let mut schedule = Vec::new();
    if state.is_settled() {
        return Ok(schedule);
    }

    let mut stepper = PeriodStepper::new(config, state, from, payment_override)?;
    for _ in 0..periods.min(MAX_INSTALLMENTS) {
        let entry = match stepper.step()? {
            Some(entry) => entry,
            None => break,
        };
        let paid_off = !entry.ending_balance.is_positive();
        schedule.push(entry);
        if paid_off {
            break;
        }
    }

    Ok(schedule)
}

/// outcome of stepping to payoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffProjection {
    /// due date of the final simulated period; only a payoff when `converged`
    pub payoff_date: Option<NaiveDate>,
    pub payments_remaining: u32,
    pub total_interest_remaining: Money,
    pub total_payments_remaining: Money,
    /// false when the balance was still owing after [`MAX_INSTALLMENTS`] periods
    pub converged: bool,
}

impl PayoffProjection {
    fn settled() -> Self {
        Self {
            payoff_date: None,
            payments_remaining: 0,
            total_interest_remaining: Money::ZERO,
            total_payments_remaining: Money::ZERO,
            converged: true,
        }
    }
}

/// step until the balance is cleared or the installment bound is hit
pub fn project_payoff(
    config: &DebtConfig,
    state: LedgerState,
    from: DateTime<Utc>,
    payment_override: Option<Money>,
) -> Result<PayoffProjection> {
    if state.is_settled() {
        return Ok(PayoffProjection::settled());
    }

    let mut projection = PayoffProjection {
        converged: false,
        ..PayoffProjection::settled()
    };

    let mut stepper = PeriodStepper::new(config, state, from, payment_override)?;
    for _ in 0..MAX_INSTALLMENTS {
        let entry = match stepper.step()? {
            Some(entry) => entry,
            None => break,
        };
        projection.total_interest_remaining += entry.interest_charged;
        projection.total_payments_remaining += entry.payment_amount;
        projection.payments_remaining += 1;
        projection.payoff_date = Some(entry.due_date);

        if !entry.ending_balance.is_positive() {
            projection.converged = true;
            break;
        }
    }

    if projection.converged {
        tracing::debug!(
            payoff_date = ?projection.payoff_date,
            payments = projection.payments_remaining,
            interest = %projection.total_interest_remaining,
            "payoff projected"
        );
    } else {
        tracing::warn!(
            periods = projection.payments_remaining,
            balance = %stepper.state().outstanding(),
            "payoff projection did not converge"
        );
    }

    Ok(projection)
}
