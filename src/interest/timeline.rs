use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decimal::Rate;
use crate::errors::{DebtError, Result};
use crate::types::RateChange;

/// effective-dated reference rates, sorted once on construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RateTimeline {
    entries: Vec<RateChange>,
}

impl RateTimeline {
    /// stable sort, so entries sharing an instant keep input order and the last one wins
    pub fn new(mut entries: Vec<RateChange>) -> Result<Self> {
        if entries.is_empty() {
            return Err(DebtError::EmptyTimeline);
        }
        entries.sort_by_key(|entry| entry.effective_from);
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RateChange] {
        &self.entries
    }

    /// first instant with a defined rate
    pub fn earliest(&self) -> DateTime<Utc> {
        self.entries[0].effective_from
    }

    /// reference rate in force at `at`
    pub fn rate_at(&self, at: DateTime<Utc>) -> Result<Rate> {
        let idx = self.entries.partition_point(|entry| entry.effective_from <= at);
        if idx == 0 {
            return Err(DebtError::NoRateDefined { at });
        }
        Ok(self.entries[idx - 1].rate)
    }

    /// changes taking effect strictly inside `(start, end)`, in order
    pub fn changes_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &RateChange> {
        let from = self.entries.partition_point(|entry| entry.effective_from <= start);
        self.entries[from..]
            .iter()
            .take_while(move |entry| entry.effective_from < end)
    }
}
