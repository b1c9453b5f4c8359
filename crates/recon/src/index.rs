use std::collections::{BTreeMap, HashMap};

use crate::model::{DuplicateRecord, ExternalRecord, InternalRecord};

/// A record that can be indexed by identifier.
pub trait Keyed {
    /// Join key.
    fn key(&self) -> &str;
    /// Tag recorded against duplicates (e.g. the statement feed name).
    fn label(&self) -> &str;
}

impl Keyed for InternalRecord {
    fn key(&self) -> &str {
        self.identifier()
    }

    fn label(&self) -> &str {
        "system"
    }
}

impl Keyed for ExternalRecord {
    fn key(&self) -> &str {
        self.identifier()
    }

    fn label(&self) -> &str {
        self.source_name()
    }
}

/// Identifier → first-seen record, plus every repeat sighting.
///
/// "First" is input iteration order, so callers must present records in a
/// stable order (file read order, batch order) for reproducible results.
#[derive(Debug)]
pub struct RecordIndex<'a, R> {
    entries: HashMap<&'a str, &'a R>,
    duplicates: BTreeMap<&'a str, (Vec<&'a str>, usize)>,
    processed: usize,
}

impl<'a, R: Keyed> RecordIndex<'a, R> {
    /// Fold all records through one accumulator. Works the same for a single
    /// batch or for several batches chained together.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a R>,
    {
        let mut index = Self {
            entries: HashMap::new(),
            duplicates: BTreeMap::new(),
            processed: 0,
        };
        for record in records {
            index.insert(record);
        }
        index
    }

    fn insert(&mut self, record: &'a R) {
        self.processed += 1;
        let key = record.key();
        let Some(existing) = self.entries.get(key).copied() else {
            self.entries.insert(key, record);
            return;
        };

        let (labels, occurrences) = self
            .duplicates
            .entry(key)
            .or_insert_with(|| (vec![existing.label()], 1));
        *occurrences += 1;
        if !labels.contains(&record.label()) {
            labels.push(record.label());
        }
    }

    /// Retained (first-seen) record for `key`.
    pub fn get(&self, key: &str) -> Option<&'a R> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Retained identifiers in ascending order.
    pub fn sorted_keys(&self) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Distinct identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every record folded in, duplicates included.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Duplicate identifiers, ascending.
    pub fn duplicates(&self) -> Vec<DuplicateRecord> {
        self.duplicates
            .iter()
            .map(|(id, (labels, occurrences))| DuplicateRecord {
                identifier: id.to_string(),
                labels: labels.iter().map(|l| l.to_string()).collect(),
                occurrences: *occurrences,
            })
            .collect()
    }
}
