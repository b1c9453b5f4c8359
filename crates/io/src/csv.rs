//! Statement CSV loading.
//!
//! ## System file (header names exact, any column order)
//!
//! | Column            | Example                     | Notes                           |
//! |-------------------|-----------------------------|---------------------------------|
//! | `trxID`           | `TRX-0001`                  | Join key                        |
//! | `amount`          | `1,250.00`                  | Decimal string, see `money`     |
//! | `type`            | `DEBIT` / `credit`          | Case-insensitive                |
//! | `transactionTime` | `2024-02-01T10:00:00+07:00` | Also `YYYY-MM-DD HH:MM:SS` (UTC) or `YYYY-MM-DD` |
//!
//! ## Bank file
//!
//! | Column              | Example      | Notes                           |
//! |---------------------|--------------|---------------------------------|
//! | `unique_identifier` | `TRX-0001`   | Join key                        |
//! | `amount`            | `-1250.00`   | Already signed                  |
//! | `date`              | `2024-02-01` | Date only                       |
//!
//! Every row is validated while loading; the first bad row aborts the file.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

use bankrecon_recon::model::{Direction, ExternalBatch, InternalRecord};
use bankrecon_recon::{money, ReconError};

use crate::error::LoadError;

pub const SYSTEM_COLUMNS: [&str; 4] = ["trxID", "amount", "type", "transactionTime"];
pub const BANK_COLUMNS: [&str; 3] = ["unique_identifier", "amount", "date"];

/// Batch name used when a file stem is empty.
pub const DEFAULT_SOURCE_NAME: &str = "bank";

/// Read the internal ledger export.
pub fn read_system_transactions(path: &Path) -> Result<Vec<InternalRecord>, LoadError> {
    let content = read_file_as_utf8(path)?;
    parse_system_transactions(path, &content)
}

/// Read one bank statement into a batch named `source_name`.
pub fn read_bank_statement(path: &Path, source_name: &str) -> Result<ExternalBatch, LoadError> {
    let content = read_file_as_utf8(path)?;
    parse_bank_statement(path, &content, source_name)
}

/// Batch name derived from a statement path: the file name without its
/// extension (`statements/bank_bca.csv` → `bank_bca`).
pub fn source_name_from_path(path: &Path) -> String {
    match path.file_stem().map(|s| s.to_string_lossy()) {
        Some(stem) if !stem.is_empty() => stem.into_owned(),
        _ => DEFAULT_SOURCE_NAME.to_string(),
    }
}

/// Read file and convert to UTF-8 if needed (bank exports are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| LoadError::io(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) if s.starts_with('\u{feff}') => Ok(s['\u{feff}'.len_utf8()..].to_string()),
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse system CSV text. `path` is only used in error messages.
pub fn parse_system_transactions(
    path: &Path,
    content: &str,
) -> Result<Vec<InternalRecord>, LoadError> {
    let mut table = Table::open(path, content, &SYSTEM_COLUMNS)?;
    let mut out = Vec::new();

    while let Some(row) = table.next_row()? {
        let identifier = row.field(0)?.to_string();
        let amount = row.field(1)?;
        let direction = row.field(2)?;
        let time = row.field(3)?;

        let magnitude = money::normalize(amount).map_err(|e| row.reject(&identifier, e))?;
        let direction: Direction = direction.parse().map_err(|e| row.reject(&identifier, e))?;
        let timestamp = parse_timestamp(time).ok_or_else(|| LoadError::TimestampParse {
            path: path.to_path_buf(),
            row: row.line,
            identifier: identifier.clone(),
            value: time.to_string(),
        })?;

        let record = InternalRecord::new(identifier.as_str(), magnitude, direction, timestamp)
            .map_err(|e| row.reject(&identifier, e))?;
        out.push(record);
    }

    debug!(path = %path.display(), rows = out.len(), "loaded system transactions");
    Ok(out)
}

/// Parse bank CSV text into a batch named `source_name`.
pub fn parse_bank_statement(
    path: &Path,
    content: &str,
    source_name: &str,
) -> Result<ExternalBatch, LoadError> {
    let mut table = Table::open(path, content, &BANK_COLUMNS)?;
    let mut batch = ExternalBatch::new(source_name);

    while let Some(row) = table.next_row()? {
        let identifier = row.field(0)?.to_string();
        let amount = row.field(1)?;
        let date_str = row.field(2)?;

        let amount_minor = money::normalize(amount).map_err(|e| row.reject(&identifier, e))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            LoadError::DateParse {
                path: path.to_path_buf(),
                row: row.line,
                identifier: identifier.clone(),
                value: date_str.to_string(),
            }
        })?;

        batch
            .push(identifier.as_str(), amount_minor, date)
            .map_err(|e| row.reject(&identifier, e))?;
    }

    debug!(path = %path.display(), bank = source_name, rows = batch.len(), "loaded bank statement");
    Ok(batch)
}

/// Accepts RFC 3339 (offset kept), `YYYY-MM-DD HH:MM:SS` (read as UTC) and
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset())
}

// ---------------------------------------------------------------------------
// Header-mapped reader
// ---------------------------------------------------------------------------

struct Table<'a> {
    path: &'a Path,
    reader: csv::Reader<&'a [u8]>,
    /// Position of each requested column in the file.
    columns: Vec<(usize, &'static str)>,
    record: csv::StringRecord,
}

struct Row<'r> {
    path: &'r Path,
    line: usize,
    record: &'r csv::StringRecord,
    columns: &'r [(usize, &'static str)],
}

impl<'a> Table<'a> {
    fn open(path: &'a Path, content: &'a str, required: &[&'static str]) -> Result<Self, LoadError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(|e| LoadError::io(path, e))?.clone();
        let columns = required
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h == *name)
                    .map(|i| (i, *name))
                    .ok_or_else(|| LoadError::MissingColumn {
                        path: path.to_path_buf(),
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { path, reader, columns, record: ::csv::StringRecord::new() })
    }

    fn next_row(&mut self) -> Result<Option<Row<'_>>, LoadError> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|e| LoadError::io(self.path, e))?;
        if !more {
            return Ok(None);
        }
        let line = self.record.position().map(|p| p.line() as usize).unwrap_or(0);
        Ok(Some(Row { path: self.path, line, record: &self.record, columns: &self.columns }))
    }
}

impl Row<'_> {
    /// The `n`th required column. A short row is a malformed record.
    fn field(&self, n: usize) -> Result<&str, LoadError> {
        let (idx, name) = self.columns[n];
        self.record.get(idx).ok_or_else(|| {
            let id = self.record.get(self.columns[0].0).unwrap_or("").to_string();
            self.reject(&id, ReconError::malformed(id.as_str(), format!("missing field '{name}'")))
        })
    }

    fn reject(&self, identifier: &str, source: ReconError) -> LoadError {
        LoadError::Record {
            path: self.path.to_path_buf(),
            row: self.line,
            identifier: identifier.to_string(),
            source,
        }
    }
}
