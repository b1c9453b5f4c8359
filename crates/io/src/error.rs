use std::fmt;
use std::path::{Path, PathBuf};

use bankrecon_recon::ReconError;

/// Failure while reading a statement file. Any of these aborts the run.
#[derive(Debug)]
pub enum LoadError {
    /// File open/read or CSV framing error.
    Io { path: PathBuf, message: String },
    /// Header row lacks a required column.
    MissingColumn { path: PathBuf, column: String },
    /// A row failed amount/direction/record validation.
    Record { path: PathBuf, row: usize, identifier: String, source: ReconError },
    /// `transactionTime` matched none of the accepted layouts.
    TimestampParse { path: PathBuf, row: usize, identifier: String, value: String },
    /// Bank `date` is not `YYYY-MM-DD`.
    DateParse { path: PathBuf, row: usize, identifier: String, value: String },
}

impl LoadError {
    pub(crate) fn io(path: &Path, message: impl fmt::Display) -> Self {
        Self::Io { path: path.to_path_buf(), message: message.to_string() }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::MissingColumn { path, .. }
            | Self::Record { path, .. }
            | Self::TimestampParse { path, .. }
            | Self::DateParse { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::MissingColumn { path, column } => {
                write!(f, "{}: missing column: {column}", path.display())
            }
            Self::Record { path, row, identifier, source } => {
                write!(f, "{}: row {row} (id={identifier}): {source}", path.display())
            }
            Self::TimestampParse { path, row, identifier, value } => write!(
                f,
                "{}: row {row} (id={identifier}): cannot parse timestamp '{value}'",
                path.display()
            ),
            Self::DateParse { path, row, identifier, value } => write!(
                f,
                "{}: row {row} (id={identifier}): cannot parse date '{value}'",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Record { source, .. } => Some(source),
            _ => None,
        }
    }
}
