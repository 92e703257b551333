pub mod access;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod payments;
pub mod scenario;
pub mod snapshot;
pub mod state;
pub mod time;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// re-export key types
pub use access::{Authenticator, CredentialTable, Role};
pub use config::{validate_config, DebtConfig, SnapshotOptions};
pub use decimal::{Money, Rate};
pub use errors::{DebtError, Result};
pub use events::{EventStore, LedgerEvent};
pub use interest::{interest_accrued, AccrualEngine, RateTimeline};
pub use payments::{
    apply_payment, project_payoff, upcoming_schedule, DueDateSchedule, PayoffProjection,
    MAX_INSTALLMENTS,
};
pub use scenario::{compare_payment, PaymentComparison};
pub use snapshot::{
    payment_status, replay_ledger, snapshot, snapshot_at, snapshot_now, LedgerReplay,
    PaymentStatus, Snapshot,
};
pub use state::LedgerState;
pub use types::{
    Agreement, Parties, Payment, PaymentApplication, Property, RateChange, ScheduleEntry,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
