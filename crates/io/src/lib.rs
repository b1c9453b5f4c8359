// Input/output around the reconciliation engine:
// statement CSV loading, date-window filtering, report rendering.

pub mod csv;
pub mod error;
pub mod filter;
pub mod report;

pub use error::LoadError;
pub use filter::DateWindow;
