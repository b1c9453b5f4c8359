//! `bankrecon-recon`: ledger-to-bank reconciliation engine.
//!
//! Pure engine crate: receives already-validated records, returns a
//! deterministic [`Summary`]. No CLI or IO dependencies.

pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod money;
pub mod sign;
pub mod summary;

pub use engine::reconcile;
pub use error::ReconError;
pub use index::{Keyed, RecordIndex};
pub use model::{
    Classification, Direction, Discrepancy, DuplicateRecord, ExternalBatch, ExternalRecord,
    InternalRecord, MissingFromExternal, MissingFromInternal, Summary,
};
pub use summary::SummaryBuilder;
