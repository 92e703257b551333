pub mod due_dates;
pub mod projection;
pub mod waterfall;

pub use due_dates::{last_day_of_month, DueDateSchedule, MAX_INSTALLMENTS};
pub use projection::{project_payoff, upcoming_schedule, PayoffProjection, PeriodStepper};
pub use waterfall::{apply_payment, WaterfallOutcome};
