use std::fmt;

use chrono::NaiveDate;
use tracing::debug;

use bankrecon_recon::model::{ExternalBatch, InternalRecord};

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for InvalidWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "end date {} is before start date {}", self.end, self.start)
    }
}

impl std::error::Error for InvalidWindow {}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidWindow> {
        if end < start {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Internal records whose timestamp falls on a day inside the window,
    /// judged in the timestamp's own offset.
    pub fn filter_internal(&self, records: Vec<InternalRecord>) -> Vec<InternalRecord> {
        let before = records.len();
        let kept: Vec<_> = records.into_iter().filter(|r| self.contains(r.date())).collect();
        debug!(before, after = kept.len(), "filtered system transactions");
        kept
    }

    /// Same for every batch. Batches left empty are kept.
    pub fn filter_batches(&self, batches: Vec<ExternalBatch>) -> Vec<ExternalBatch> {
        batches
            .into_iter()
            .map(|mut b| {
                let before = b.len();
                b.retain(|r| self.contains(r.date()));
                debug!(bank = %b.source_name(), before, after = b.len(), "filtered bank statement");
                b
            })
            .collect()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
