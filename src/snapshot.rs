use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::Serialize;

use crate::config::{DebtConfig, SnapshotOptions};
use crate::decimal::{Money, Rate};
use crate::errors::{DebtError, Result};
use crate::events::{EventStore, LedgerEvent};
use crate::interest::RateTimeline;
use crate::payments::{project_payoff, upcoming_schedule, PayoffProjection};
use crate::state::LedgerState;
use crate::types::{Agreement, Parties, Property, ScheduleEntry};

/// fixed statements of how the figures are produced
pub const ASSUMPTIONS: [&str; 4] = [
    "Interest accrues daily using ACT/365, based on the repo rate timeline provided.",
    "Payments are applied to accrued interest first, then capital.",
    "Due dates are treated as the last calendar day of each month, with the first instalment due after the grace period.",
    "Future projections assume the last known repo rate continues until you add a new change in the JSON.",
];

/// balances and running totals after replaying history up to an instant
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerReplay {
    pub as_of: DateTime<Utc>,
    pub state: LedgerState,
    pub total_interest_accrued: Money,
    pub total_interest_paid: Money,
    pub total_principal_paid: Money,
    pub actual_paid_to_date: Money,
    pub unapplied_payments: Money,
    pub events: Vec<LedgerEvent>,
}

/// replay every payment made by `as_of`, oldest first
///
/// Interest up to each payment's instant is charged, rounded once, before the payment
/// is applied. Non-positive amounts are skipped and replay stops once the loan is settled.
pub fn replay_ledger(config: &DebtConfig, as_of: DateTime<Utc>) -> Result<LedgerReplay> {
    let registration_start = config.registration_start()?;
    if as_of < registration_start {
        return Err(DebtError::InvalidAsOf {
            as_of,
            registration: config.property.registration_date,
        });
    }

    let engine = config.accrual_engine();
    let mut payments: Vec<_> = config.payments.iter().collect();
    payments.sort_by_key(|payment| payment.paid_at);

    let mut state = LedgerState::new(config.agreement.principal);
    let mut events = EventStore::new();
    let mut cursor = registration_start;
    let mut total_interest_accrued = Money::ZERO;
    let mut total_interest_paid = Money::ZERO;
    let mut total_principal_paid = Money::ZERO;
    let mut actual_paid_to_date = Money::ZERO;

    for payment in payments {
        if payment.paid_at > as_of {
            break;
        }
        if !payment.amount.is_positive() {
            tracing::warn!(paid_at = %payment.paid_at, amount = %payment.amount, "skipping non-positive payment");
            events.emit(LedgerEvent::PaymentSkipped {
                paid_at: payment.paid_at,
                amount: payment.amount,
            });
            continue;
        }

        let interest = engine.interest_charge(state.principal_outstanding, cursor, payment.paid_at)?;
        state.charge_interest(interest);
        total_interest_accrued += interest;
        events.emit(LedgerEvent::InterestCharged {
            from: cursor,
            to: payment.paid_at,
            amount: interest,
        });

        let applied = state.apply(payment.amount);
        total_interest_paid += applied.to_interest;
        total_principal_paid += applied.to_principal;
        actual_paid_to_date += payment.amount;

        tracing::debug!(
            paid_at = %payment.paid_at,
            amount = %payment.amount,
            to_interest = %applied.to_interest,
            to_principal = %applied.to_principal,
            balance = %state.outstanding(),
            "payment replayed"
        );
        events.emit(LedgerEvent::PaymentApplied {
            paid_at: payment.paid_at,
            amount: payment.amount,
            to_interest: applied.to_interest,
            to_principal: applied.to_principal,
            balance_after: state.outstanding(),
        });

        if applied.unapplied.is_positive() {
            tracing::warn!(
                paid_at = %payment.paid_at,
                remainder = %applied.unapplied,
                "payment exceeds outstanding balance; remainder discarded"
            );
            events.emit(LedgerEvent::PaymentRemainderDiscarded {
                paid_at: payment.paid_at,
                remainder: applied.unapplied,
            });
        }

        // a payment dated before the cursor must not rewind it
        cursor = cursor.max(payment.paid_at);

        if state.is_settled() {
            events.emit(LedgerEvent::Settled { at: payment.paid_at });
            break;
        }
    }

    let trailing = engine.interest_charge(state.principal_outstanding, cursor, as_of)?;
    state.charge_interest(trailing);
    total_interest_accrued += trailing;
    events.emit(LedgerEvent::InterestCharged {
        from: cursor,
        to: as_of,
        amount: trailing,
    });

    let unapplied_payments = events.discarded_total();

    Ok(LedgerReplay {
        as_of,
        state,
        total_interest_accrued,
        total_interest_paid,
        total_principal_paid,
        actual_paid_to_date,
        unapplied_payments,
        events: events.take_events(),
    })
}

/// expected versus actual payments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub expected_paid_to_date: Money,
    pub actual_paid_to_date: Money,
    pub arrears: Money,
    pub ahead_by: Money,
    pub first_overdue_due_date: Option<NaiveDate>,
}

/// compare payments received with the minimum due on every due date ended by `as_of`
pub fn payment_status(
    config: &DebtConfig,
    as_of: DateTime<Utc>,
    actual_paid_to_date: Money,
) -> Result<PaymentStatus> {
    let minimum = config.agreement.minimum_monthly_payment;
    let due = config.due_dates().due_by(as_of)?;
    let expected_paid_to_date = minimum * due.len() as u32;

    let first_overdue_due_date = if actual_paid_to_date >= expected_paid_to_date {
        None
    } else {
        let mut remaining = actual_paid_to_date;
        let mut overdue = None;
        for due_date in due {
            if remaining >= minimum {
                remaining -= minimum;
            } else {
                overdue = Some(due_date);
                break;
            }
        }
        overdue
    };

    Ok(PaymentStatus {
        expected_paid_to_date,
        actual_paid_to_date,
        arrears: (expected_paid_to_date - actual_paid_to_date).non_negative(),
        ahead_by: (actual_paid_to_date - expected_paid_to_date).non_negative(),
        first_overdue_due_date,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementView {
    #[serde(flatten)]
    pub terms: Agreement,
    pub first_payment_due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub principal_original: Money,
    pub principal_remaining: Money,
    pub accrued_interest_unpaid: Money,
    pub total_interest_accrued: Money,
    pub total_interest_paid: Money,
    pub total_principal_paid: Money,
    pub total_paid: Money,
    pub outstanding_balance: Money,
    /// overpayment beyond the balance, received but never credited
    pub unapplied_payments: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPayment {
    pub due_date: Option<NaiveDate>,
    pub amount_due: Option<Money>,
    pub minimum_amount: Option<Money>,
    pub interest_charged_to_due_date: Option<Money>,
}

/// full standing of the loan as of one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub as_of: DateTime<Utc>,
    pub property: Property,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parties: Option<Parties>,
    pub agreement: AgreementView,
    pub current_reference_rate: Rate,
    pub current_interest_rate: Rate,
    pub totals: Totals,
    pub status: PaymentStatus,
    pub next_payment: NextPayment,
    pub projection: PayoffProjection,
    pub upcoming_schedule: Vec<ScheduleEntry>,
    #[serde(rename = "repoRateTimeline")]
    pub rate_timeline: RateTimeline,
    pub assumptions: Vec<String>,
}

impl Snapshot {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// snapshot with `as_of` resolved from the options or the provider's clock
pub fn snapshot(
    config: &DebtConfig,
    options: &SnapshotOptions,
    time_provider: &SafeTimeProvider,
) -> Result<Snapshot> {
    let as_of = options.resolve_as_of(time_provider)?;
    snapshot_at(config, as_of, options)
}

/// snapshot against the system clock
pub fn snapshot_now(config: &DebtConfig, options: &SnapshotOptions) -> Result<Snapshot> {
    let time = SafeTimeProvider::new(TimeSource::System);
    snapshot(config, options, &time)
}

/// replay to `as_of`, then project forward from the replayed balances
pub fn snapshot_at(
    config: &DebtConfig,
    as_of: DateTime<Utc>,
    options: &SnapshotOptions,
) -> Result<Snapshot> {
    let replay = replay_ledger(config, as_of)?;
    let state = replay.state;

    let current_reference_rate = config.rate_timeline.rate_at(as_of)?;
    let current_interest_rate =
        current_reference_rate.less_margin(config.agreement.margin_below_reference);

    let status = payment_status(config, as_of, replay.actual_paid_to_date)?;

    let upcoming = upcoming_schedule(
        config,
        state,
        as_of,
        options.upcoming_periods,
        options.payment_override,
    )?;
    let projection = project_payoff(config, state, as_of, options.payment_override)?;

    let next_payment = upcoming
        .first()
        .map(|entry| NextPayment {
            due_date: Some(entry.due_date),
            amount_due: Some(entry.payment_amount),
            minimum_amount: Some(config.agreement.minimum_monthly_payment),
            interest_charged_to_due_date: Some(entry.interest_charged),
        })
        .unwrap_or_default();

    tracing::info!(
        as_of = %as_of,
        outstanding = %state.outstanding(),
        arrears = %status.arrears,
        "snapshot built"
    );

    Ok(Snapshot {
        as_of,
        property: config.property.clone(),
        parties: config.parties.clone(),
        agreement: AgreementView {
            terms: config.agreement.clone(),
            first_payment_due_date: config.first_payment_due_date()?,
        },
        current_reference_rate,
        current_interest_rate,
        totals: Totals {
            principal_original: config.agreement.principal,
            principal_remaining: state.principal_outstanding,
            accrued_interest_unpaid: state.accrued_interest_unpaid,
            total_interest_accrued: replay.total_interest_accrued,
            total_interest_paid: replay.total_interest_paid,
            total_principal_paid: replay.total_principal_paid,
            total_paid: replay.actual_paid_to_date,
            outstanding_balance: state.outstanding(),
            unapplied_payments: replay.unapplied_payments,
        },
        status,
        next_payment,
        projection,
        upcoming_schedule: upcoming,
        rate_timeline: config.rate_timeline.clone(),
        assumptions: ASSUMPTIONS.iter().map(|s| s.to_string()).collect(),
    })
}
