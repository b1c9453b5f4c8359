use std::fmt;

/// Record-level validation failures.
///
/// Any of these aborts construction of the offending record; the matcher
/// only ever sees records that made it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Amount text that does not normalize to a minor-unit integer.
    InvalidAmountFormat { value: String },
    /// Direction outside {DEBIT, CREDIT}.
    UnknownTransactionType { value: String },
    /// Structurally invalid record (missing or empty required field).
    MalformedRecord { identifier: String, reason: String },
}

impl ReconError {
    pub(crate) fn amount(value: &str) -> Self {
        Self::InvalidAmountFormat { value: value.to_string() }
    }

    pub fn malformed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { identifier: identifier.into(), reason: reason.into() }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmountFormat { value } => {
                write!(f, "invalid amount format: '{value}'")
            }
            Self::UnknownTransactionType { value } => {
                write!(f, "unknown transaction type: '{value}'")
            }
            Self::MalformedRecord { identifier, reason } => {
                if identifier.is_empty() {
                    write!(f, "malformed record: {reason}")
                } else {
                    write!(f, "malformed record '{identifier}': {reason}")
                }
            }
        }
    }
}

impl std::error::Error for ReconError {}
