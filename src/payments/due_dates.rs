use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::errors::{DebtError, Result};
use crate::time;

/// hard bound on installments any loop will walk (fifty years of months)
pub const MAX_INSTALLMENTS: u32 = 600;

/// month-end due dates counted from the registration month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateSchedule {
    registration_date: NaiveDate,
    grace_months: u32,
}

impl DueDateSchedule {
    pub fn new(registration_date: NaiveDate, grace_months: u32) -> Self {
        Self {
            registration_date,
            grace_months,
        }
    }

    /// last calendar day of the installment's month
    ///
    /// The registration month is the first grace month, so installment 1 falls in the
    /// month `grace_months` after registration (September + 5 grace months is February).
    pub fn due_date(&self, installment: u32) -> Result<NaiveDate> {
        let months = self.registration_date.month0() as i64
            + self.grace_months as i64
            + installment as i64
            - 1;
        let year = self.registration_date.year() as i64 + months.div_euclid(12);
        let month = months.rem_euclid(12) as u32 + 1;

        i32::try_from(year)
            .ok()
            .and_then(|y| last_day_of_month(y, month))
            .ok_or_else(|| DebtError::InvalidDate {
                message: format!("installment {} falls outside the calendar", installment),
            })
    }

    pub fn first_due_date(&self) -> Result<NaiveDate> {
        self.due_date(1)
    }

    /// instant an installment stops being "not yet due": the end of its due day
    pub fn cutoff(&self, installment: u32) -> Result<DateTime<Utc>> {
        time::date_end_exclusive(self.due_date(installment)?)
    }

    /// installments whose due day has fully ended by `as_of`, in order
    pub fn due_by(&self, as_of: DateTime<Utc>) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::new();
        for installment in 1..=MAX_INSTALLMENTS {
            let due = self.due_date(installment)?;
            if time::date_end_exclusive(due)? > as_of {
                break;
            }
            dates.push(due);
        }
        Ok(dates)
    }

    /// first installment still open at `as_of`, if any within the bound
    pub fn next_installment(&self, as_of: DateTime<Utc>) -> Result<Option<u32>> {
        for installment in 1..=MAX_INSTALLMENTS {
            if self.cutoff(installment)? > as_of {
                return Ok(Some(installment));
            }
        }
        Ok(None)
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
