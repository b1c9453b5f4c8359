use tracing::{debug, info};

use crate::index::RecordIndex;
use crate::matcher::match_by_identifier;
use crate::model::{ExternalBatch, InternalRecord, Summary};
use crate::summary::{bank_duplicate_note, system_duplicate_note, SummaryBuilder};

/// Reconcile validated internal records against one or more bank batches.
///
/// Pure: no IO, no clock, no shared state. Identical inputs in identical
/// order always produce an identical [`Summary`].
pub fn reconcile(internal: &[InternalRecord], batches: &[ExternalBatch]) -> Summary {
    let system_index = RecordIndex::build(internal);
    let bank_index = RecordIndex::build(batches.iter().flat_map(|b| b.records().iter()));

    debug!(
        system_rows = system_index.processed(),
        system_ids = system_index.len(),
        bank_rows = bank_index.processed(),
        bank_ids = bank_index.len(),
        batches = batches.len(),
        "indexes built"
    );

    let mut builder = SummaryBuilder::new(system_index.processed() + bank_index.processed());
    builder.extend(match_by_identifier(&system_index, &bank_index));

    let bank_dups = bank_index.duplicates();
    if let Some(note) = bank_duplicate_note(&bank_dups) {
        debug!(count = bank_dups.len(), "duplicate bank identifiers");
        builder.note(note);
    }
    let system_dups = system_index.duplicates();
    if let Some(note) = system_duplicate_note(&system_dups) {
        debug!(count = system_dups.len(), "duplicate system identifiers");
        builder.note(note);
    }

    let summary = builder.build();
    info!(
        processed = summary.total_processed,
        matched = summary.total_matched,
        unmatched = summary.total_unmatched,
        discrepancy_minor = summary.total_amount_discrepancy_minor,
        "reconciliation complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;
    use chrono::{DateTime, NaiveDate};

    fn sys(id: &str, magnitude: i64, direction: Direction) -> InternalRecord {
        let ts = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        InternalRecord::new(id, magnitude, direction, ts).unwrap()
    }

    fn batch(name: &str, rows: &[(&str, i64)]) -> ExternalBatch {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut b = ExternalBatch::new(name);
        for (id, amount) in rows {
            b.push(*id, *amount, date).unwrap();
        }
        b
    }

    #[test]
    fn sign_handling_and_grouping() {
        let system = vec![
            sys("SAME-1", 10000, Direction::Credit),
            sys("SAME-2", 25000, Direction::Debit),
        ];
        let banks = vec![
            batch("bank_a", &[("SAME-1", 10000), ("ONLY-A", 12345)]),
            batch("bank_b", &[("SAME-2", -25000), ("ONLY-B", -1)]),
        ];
        let s = reconcile(&system, &banks);

        assert_eq!(s.total_processed, 6);
        assert_eq!(s.total_matched, 2);
        assert_eq!(s.total_unmatched, 2);
        assert_eq!(s.total_amount_discrepancy_minor, 0);
        assert!(s.system_missing_in_bank.is_empty());
        assert_eq!(s.bank_missing_in_system["bank_a"].len(), 1);
        assert_eq!(s.bank_missing_in_system["bank_b"].len(), 1);
        assert!(s.notes.is_empty());
    }

    #[test]
    fn duplicates_across_batches() {
        let system = vec![sys("X", 100, Direction::Credit)];
        let banks = vec![batch("bank_a", &[("X", 100)]), batch("bank_b", &[("X", 999)])];
        let s = reconcile(&system, &banks);

        assert_eq!(s.total_processed, 3);
        assert_eq!(s.total_matched, 1);
        // First-seen value (bank_a) is the one compared.
        assert!(s.matched_with_discrepancies.is_empty());
        assert_eq!(s.notes, vec!["duplicate bank IDs detected: X in banks=[bank_a bank_b]"]);
    }

    #[test]
    fn duplicate_system_ids_are_noted() {
        let system = vec![sys("S", 100, Direction::Credit), sys("S", 200, Direction::Credit)];
        let s = reconcile(&system, &[batch("bank_a", &[("S", 100)])]);
        assert_eq!(s.total_processed, 3);
        assert_eq!(s.total_matched, 1);
        assert!(s.matched_with_discrepancies.is_empty());
        assert_eq!(s.notes, vec!["duplicate system IDs detected: S (2 occurrences)"]);
    }

    #[test]
    fn empty_inputs() {
        let s = reconcile(&[], &[]);
        assert_eq!(s.total_processed, 0);
        assert!(s.is_clean());
    }
}
