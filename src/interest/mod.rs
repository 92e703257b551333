pub mod accrual;
pub mod timeline;

pub use accrual::{interest_accrued, AccrualEngine, AccrualSegment, YEAR_BASIS_DAYS};
pub use timeline::RateTimeline;
