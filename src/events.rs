use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decimal::Money;

/// everything a ledger replay did, in the order it did it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LedgerEvent {
    InterestCharged {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        amount: Money,
    },
    PaymentApplied {
        paid_at: DateTime<Utc>,
        amount: Money,
        to_interest: Money,
        to_principal: Money,
        balance_after: Money,
    },
    /// zero or negative amounts are ignored by the ledger
    PaymentSkipped {
        paid_at: DateTime<Utc>,
        amount: Money,
    },
    /// part of a payment beyond the whole outstanding balance
    PaymentRemainderDiscarded {
        paid_at: DateTime<Utc>,
        remainder: Money,
    },
    Settled {
        at: DateTime<Utc>,
    },
}

/// event store for collecting events during a replay
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<LedgerEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// total of all discarded payment remainders
    pub fn discarded_total(&self) -> Money {
        self.events
            .iter()
            .filter_map(|event| match event {
                LedgerEvent::PaymentRemainderDiscarded { remainder, .. } => Some(*remainder),
                _ => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_store_collects_in_order() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut store = EventStore::new();
        store.emit(LedgerEvent::PaymentRemainderDiscarded {
            paid_at: at,
            remainder: Money::from_major(10),
        });
        store.emit(LedgerEvent::Settled { at });
        store.emit(LedgerEvent::PaymentRemainderDiscarded {
            paid_at: at,
            remainder: Money::from_cents(250),
        });

        assert_eq!(store.events().len(), 3);
        assert_eq!(store.discarded_total(), Money::from_cents(1250));

        let taken = store.take_events();
        assert_eq!(taken.len(), 3);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_value(LedgerEvent::Settled { at }).unwrap();
        assert_eq!(json["type"], "settled");
    }
}
