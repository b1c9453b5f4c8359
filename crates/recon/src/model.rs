use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Direction of an internal ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }

    /// Apply the sign convention: debits are non-positive, credits are
    /// non-negative. Only a magnitude of the wrong sign is negated.
    pub fn signed(&self, magnitude_minor: i64) -> i64 {
        match self {
            Self::Debit if magnitude_minor > 0 => -magnitude_minor,
            Self::Credit if magnitude_minor < 0 => magnitude_minor.saturating_neg(),
            _ => magnitude_minor,
        }
    }
}

impl FromStr for Direction {
    type Err = ReconError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(Self::Debit),
            "CREDIT" => Ok(Self::Credit),
            _ => Err(ReconError::UnknownTransactionType { value: s.to_string() }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the internal system of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalRecord {
    identifier: String,
    magnitude_minor: i64,
    direction: Direction,
    timestamp: DateTime<FixedOffset>,
}

impl InternalRecord {
    pub fn new(
        identifier: impl Into<String>,
        magnitude_minor: i64,
        direction: Direction,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<Self, ReconError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ReconError::malformed("", "empty transaction identifier"));
        }
        Ok(Self { identifier, magnitude_minor, direction, timestamp })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Amount as originally stored, before the sign convention.
    pub fn magnitude_minor(&self) -> i64 {
        self.magnitude_minor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Calendar date of the timestamp, in the timestamp's own offset.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// The only amount compared against the bank side.
    pub fn canonical_minor(&self) -> i64 {
        self.direction.signed(self.magnitude_minor)
    }
}

/// One row of an external bank statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRecord {
    identifier: String,
    signed_amount_minor: i64,
    date: NaiveDate,
    source_name: String,
}

impl ExternalRecord {
    pub fn new(
        identifier: impl Into<String>,
        signed_amount_minor: i64,
        date: NaiveDate,
        source_name: impl Into<String>,
    ) -> Result<Self, ReconError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ReconError::malformed("", "empty bank identifier"));
        }
        Ok(Self { identifier, signed_amount_minor, date, source_name: source_name.into() })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn signed_amount_minor(&self) -> i64 {
        self.signed_amount_minor
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// All rows of one statement feed, in read order. Every record carries the
/// batch's source name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalBatch {
    source_name: String,
    records: Vec<ExternalRecord>,
}

impl ExternalBatch {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self { source_name: source_name.into(), records: Vec::new() }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn records(&self) -> &[ExternalRecord] {
        &self.records
    }

    /// Append a row stamped with this batch's source name.
    pub fn push(
        &mut self,
        identifier: impl Into<String>,
        signed_amount_minor: i64,
        date: NaiveDate,
    ) -> Result<(), ReconError> {
        let record =
            ExternalRecord::new(identifier, signed_amount_minor, date, self.source_name.as_str())?;
        self.records.push(record);
        Ok(())
    }

    /// Append an already-built record. Its source name must be this batch's.
    pub fn push_record(&mut self, record: ExternalRecord) -> Result<(), ReconError> {
        if record.source_name != self.source_name {
            return Err(ReconError::malformed(
                record.identifier.as_str(),
                format!(
                    "record from '{}' pushed into batch '{}'",
                    record.source_name, self.source_name
                ),
            ));
        }
        self.records.push(record);
        Ok(())
    }

    /// Keep only the records matching `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&ExternalRecord) -> bool) {
        self.records.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Internal record with no bank counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFromExternal {
    #[serde(rename = "trxID")]
    pub identifier: String,
    #[serde(rename = "amountMinor")]
    pub magnitude_minor: i64,
    #[serde(rename = "type")]
    pub direction: Direction,
}

/// Bank record with no internal counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFromInternal {
    #[serde(rename = "unique_identifier")]
    pub identifier: String,
    #[serde(rename = "amountMinor")]
    pub signed_amount_minor: i64,
    #[serde(rename = "bank")]
    pub source_name: String,
}

/// Identifier present on both sides with differing signed amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    #[serde(rename = "id")]
    pub identifier: String,
    #[serde(rename = "systemAmountMinor")]
    pub system_signed_minor: i64,
    #[serde(rename = "bankAmountMinor")]
    pub external_signed_minor: i64,
    #[serde(rename = "absDiffMinor")]
    pub abs_diff_minor: i64,
    #[serde(rename = "bank")]
    pub source_name: String,
}

/// Outcome for a single identifier. Every identifier from either side gets
/// exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Matched { identifier: String },
    MatchedWithDiscrepancy(Discrepancy),
    MissingFromExternal(MissingFromExternal),
    MissingFromInternal(MissingFromInternal),
}

impl Classification {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Matched { identifier } => identifier,
            Self::MatchedWithDiscrepancy(d) => &d.identifier,
            Self::MissingFromExternal(m) => &m.identifier,
            Self::MissingFromInternal(m) => &m.identifier,
        }
    }
}

/// Identifier seen more than once while building an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    pub identifier: String,
    /// Distinct labels in encounter order; the first-seen label leads.
    pub labels: Vec<String>,
    /// Total occurrences, first one included.
    pub occurrences: usize,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Final result of one reconciliation run. Field names are the JSON report
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_processed: usize,
    pub total_matched: usize,
    pub total_unmatched: usize,
    #[serde(rename = "totalAmountDiscrepancyMinor")]
    pub total_amount_discrepancy_minor: i64,
    pub system_missing_in_bank: Vec<MissingFromExternal>,
    pub bank_missing_in_system: BTreeMap<String, Vec<MissingFromInternal>>,
    pub matched_with_discrepancies: Vec<Discrepancy>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Summary {
    /// True when every identifier matched with no amount drift.
    pub fn is_clean(&self) -> bool {
        self.total_unmatched == 0 && self.matched_with_discrepancies.is_empty()
    }
}
