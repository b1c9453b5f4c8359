use std::collections::BTreeMap;

use crate::model::{
    Classification, Discrepancy, DuplicateRecord, MissingFromExternal, MissingFromInternal,
    Summary,
};

/// Accumulates classifications into a [`Summary`].
///
/// Lists are sorted in [`SummaryBuilder::build`], so push order does not
/// affect the result.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    total_processed: usize,
    matched: usize,
    discrepancies: Vec<Discrepancy>,
    missing_external: Vec<MissingFromExternal>,
    missing_internal: BTreeMap<String, Vec<MissingFromInternal>>,
    notes: Vec<String>,
}

impl SummaryBuilder {
    pub fn new(total_processed: usize) -> Self {
        Self { total_processed, ..Self::default() }
    }

    pub fn push(&mut self, classification: Classification) {
        match classification {
            Classification::Matched { .. } => self.matched += 1,
            Classification::MatchedWithDiscrepancy(d) => {
                self.matched += 1;
                self.discrepancies.push(d);
            }
            Classification::MissingFromExternal(m) => self.missing_external.push(m),
            Classification::MissingFromInternal(m) => {
                self.missing_internal.entry(m.source_name.clone()).or_default().push(m);
            }
        }
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn build(mut self) -> Summary {
        self.missing_external.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        for group in self.missing_internal.values_mut() {
            group.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        }
        self.discrepancies.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let total_unmatched = self.missing_external.len()
            + self.missing_internal.values().map(Vec::len).sum::<usize>();
        let total_amount_discrepancy_minor = self
            .discrepancies
            .iter()
            .fold(0i64, |acc, d| acc.saturating_add(d.abs_diff_minor));

        Summary {
            total_processed: self.total_processed,
            total_matched: self.matched,
            total_unmatched,
            total_amount_discrepancy_minor,
            system_missing_in_bank: self.missing_external,
            bank_missing_in_system: self.missing_internal,
            matched_with_discrepancies: self.discrepancies,
            notes: self.notes,
        }
    }
}

impl Extend<Classification> for SummaryBuilder {
    fn extend<T: IntoIterator<Item = Classification>>(&mut self, iter: T) {
        for c in iter {
            self.push(c);
        }
    }
}

/// One consolidated note for identifiers repeated across bank feeds.
pub fn bank_duplicate_note(duplicates: &[DuplicateRecord]) -> Option<String> {
    if duplicates.is_empty() {
        return None;
    }
    let mut sorted: Vec<&DuplicateRecord> = duplicates.iter().collect();
    sorted.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    let parts: Vec<String> = sorted
        .iter()
        .map(|d| format!("{} in banks=[{}]", d.identifier, d.labels.join(" ")))
        .collect();
    Some(format!("duplicate bank IDs detected: {}", parts.join("; ")))
}

/// Note for identifiers repeated inside the internal ledger.
pub fn system_duplicate_note(duplicates: &[DuplicateRecord]) -> Option<String> {
    if duplicates.is_empty() {
        return None;
    }
    let mut sorted: Vec<&DuplicateRecord> = duplicates.iter().collect();
    sorted.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    let parts: Vec<String> = sorted
        .iter()
        .map(|d| format!("{} ({} occurrences)", d.identifier, d.occurrences))
        .collect();
    Some(format!("duplicate system IDs detected: {}", parts.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn missing_bank(id: &str, source: &str) -> Classification {
        Classification::MissingFromInternal(MissingFromInternal {
            identifier: id.into(),
            signed_amount_minor: 1,
            source_name: source.into(),
        })
    }

    fn diff(id: &str, abs: i64) -> Classification {
        Classification::MatchedWithDiscrepancy(Discrepancy {
            identifier: id.into(),
            system_signed_minor: 0,
            external_signed_minor: abs,
            abs_diff_minor: abs,
            source_name: "bank_a".into(),
        })
    }

    #[test]
    fn counts_and_totals() {
        let mut b = SummaryBuilder::new(9);
        b.push(Classification::Matched { identifier: "m".into() });
        b.push(diff("d2", 30));
        b.push(diff("d1", 20));
        b.push(Classification::MissingFromExternal(MissingFromExternal {
            identifier: "s".into(),
            magnitude_minor: 5,
            direction: Direction::Credit,
        }));
        b.push(missing_bank("x", "bank_b"));
        b.push(missing_bank("y", "bank_a"));
        let s = b.build();

        assert_eq!(s.total_processed, 9);
        assert_eq!(s.total_matched, 3);
        assert_eq!(s.total_unmatched, 3);
        assert_eq!(s.total_amount_discrepancy_minor, 50);
        assert_eq!(s.matched_with_discrepancies[0].identifier, "d1");
        let banks: Vec<&String> = s.bank_missing_in_system.keys().collect();
        assert_eq!(banks, vec!["bank_a", "bank_b"]);
        assert!(!s.is_clean());
    }

    #[test]
    fn push_order_does_not_matter() {
        let items = vec![missing_bank("b", "s"), missing_bank("a", "s"), diff("z", 1), diff("k", 2)];
        let mut forward = SummaryBuilder::new(4);
        forward.extend(items.clone());
        let mut backward = SummaryBuilder::new(4);
        backward.extend(items.into_iter().rev());
        assert_eq!(forward.build(), backward.build());
    }

    #[test]
    fn bank_note_format() {
        let dups = vec![
            DuplicateRecord {
                identifier: "DUP-200".into(),
                labels: vec!["bank_bni".into()],
                occurrences: 2,
            },
            DuplicateRecord {
                identifier: "DUP-100".into(),
                labels: vec!["bank_bca".into(), "bank_bni".into()],
                occurrences: 2,
            },
        ];
        assert_eq!(
            bank_duplicate_note(&dups).unwrap(),
            "duplicate bank IDs detected: DUP-100 in banks=[bank_bca bank_bni]; DUP-200 in banks=[bank_bni]"
        );
        assert!(bank_duplicate_note(&[]).is_none());
    }

    #[test]
    fn system_note_format() {
        let dups = vec![DuplicateRecord {
            identifier: "S1".into(),
            labels: vec!["system".into()],
            occurrences: 3,
        }];
        assert_eq!(
            system_duplicate_note(&dups).unwrap(),
            "duplicate system IDs detected: S1 (3 occurrences)"
        );
    }

    #[test]
    fn empty_builder_is_clean() {
        let s = SummaryBuilder::new(0).build();
        assert!(s.is_clean());
        assert!(s.notes.is_empty());
    }
}
