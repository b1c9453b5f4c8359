//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | Usage error (bad args, bad dates, missing input) |
//! | 3    | Input CSV could not be read or parsed            |
//! | 4    | Invalid job file                                 |
//! | 5    | Output file could not be written                 |
//! | 6    | Differences found while `--strict` is set        |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options, end before start.
pub const EXIT_USAGE: u8 = 2;

/// A system or bank CSV failed to load. Nothing was reconciled.
pub const EXIT_INPUT: u8 = 3;

/// Job file unreadable, malformed or invalid.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Report file could not be written.
pub const EXIT_OUTPUT: u8 = 5;

/// Strict mode: unmatched identifiers or amount differences present.
/// The report is still emitted before exiting.
pub const EXIT_DIFFERENCES: u8 = 6;
