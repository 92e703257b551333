use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{DebtError, Result};
use crate::interest::timeline::RateTimeline;

/// ACT/365 year basis
pub const YEAR_BASIS_DAYS: i64 = 365;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// one constant-rate slice of an accrual range
#[derive(Debug, Clone, PartialEq)]
pub struct AccrualSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub annual_rate: Rate,
    /// fractional days
    pub days: Decimal,
    /// unrounded interest for the slice
    pub interest: Decimal,
}

/// simple-interest accrual against a variable reference rate
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine<'a> {
    timeline: &'a RateTimeline,
    margin_below_reference: Rate,
}

impl<'a> AccrualEngine<'a> {
    pub fn new(timeline: &'a RateTimeline, margin_below_reference: Rate) -> Self {
        Self {
            timeline,
            margin_below_reference,
        }
    }

    /// agreement rate in force at `at`
    pub fn effective_rate_at(&self, at: DateTime<Utc>) -> Result<Rate> {
        Ok(self.timeline.rate_at(at)?.less_margin(self.margin_below_reference))
    }

    /// split `[start, end)` at every rate change strictly inside it
    pub fn segments(
        &self,
        principal: Money,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AccrualSegment>> {
        let mut segments = Vec::new();
        if end <= start {
            return Ok(segments);
        }

        let mut cursor = start;
        let mut rate = self.effective_rate_at(start)?;
        for change in self.timeline.changes_between(start, end) {
            segments.push(segment(principal, cursor, change.effective_from, rate)?);
            cursor = change.effective_from;
            rate = change.rate.less_margin(self.margin_below_reference);
        }
        segments.push(segment(principal, cursor, end, rate)?);

        Ok(segments)
    }

    /// unrounded interest on a constant principal over `[start, end)`
    pub fn interest_accrued(
        &self,
        principal: Money,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal> {
        let segments = self.segments(principal, start, end)?;
        for s in &segments {
            tracing::trace!(
                start = %s.start,
                end = %s.end,
                rate = %s.annual_rate,
                days = %s.days,
                "accrual segment"
            );
        }
        segments
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.interest))
            .ok_or_else(|| DebtError::Overflow {
                operation: format!("interest total from {} to {}", start, end),
            })
    }

    /// interest over `[start, end)` rounded once to cents
    pub fn interest_charge(
        &self,
        principal: Money,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Money> {
        Ok(Money::from_decimal(self.interest_accrued(principal, start, end)?))
    }
}

fn segment(
    principal: Money,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rate: Rate,
) -> Result<AccrualSegment> {
    let days = Decimal::from((end - start).num_milliseconds()) / Decimal::from(MILLIS_PER_DAY);
    let interest = principal
        .as_decimal()
        .checked_mul(rate.as_decimal())
        .and_then(|v| v.checked_mul(days))
        .and_then(|v| v.checked_div(Decimal::from(YEAR_BASIS_DAYS)))
        .ok_or_else(|| DebtError::Overflow {
            operation: format!("interest on {} at {} over {} days", principal, rate, days),
        })?;
    Ok(AccrualSegment {
        start,
        end,
        annual_rate: rate,
        days,
        interest,
    })
}

/// unrounded interest over `[start, end)`; zero when the range is empty
pub fn interest_accrued(
    timeline: &RateTimeline,
    principal: Money,
    margin_below_reference: Rate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Decimal> {
    AccrualEngine::new(timeline, margin_below_reference).interest_accrued(principal, start, end)
}
