use chrono::NaiveDate;
use indexmap::IndexMap;

use super::record::{Fingerprint, Record, RecordId};

/// What a mutation did to the collection. Every mutating operation returns one
/// so the caller can recompute derived views explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(RecordId),
    Edited(RecordId),
    Removed(RecordId),
    /// The whole collection was swapped (load, reload, archive)
    Replaced,
    /// Nothing changed
    None,
}

impl Change {
    pub fn is_none(&self) -> bool {
        matches!(self, Change::None)
    }
}

/// All records of one list, in arrival order, keyed by identity
#[derive(Debug, Default)]
pub struct Collection {
    records: IndexMap<RecordId, Record>,
}

impl Collection {
    pub fn new() -> Self {
        Collection::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut collection = Collection::new();
        collection.records = records.into_iter().map(|r| (r.id(), r)).collect();
        collection
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// Record at a position in arrival order
    pub fn get_index(&self, index: usize) -> Option<&Record> {
        self.records.get_index(index).map(|(_, r)| r)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.get_index_of(&id)
    }

    /// First record whose current serialized form has this fingerprint
    pub fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Option<&Record> {
        self.iter().find(|r| &r.fingerprint() == fingerprint)
    }

    pub fn push(&mut self, record: Record) -> Change {
        let id = record.id();
        self.records.insert(id, record);
        Change::Added(id)
    }

    /// Remove a record, keeping the order of the rest
    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        self.records.shift_remove(&id)
    }

    /// Swap in a whole new set of records at once
    pub fn replace_all(&mut self, records: Vec<Record>) -> Change {
        *self = Collection::from_records(records);
        Change::Replaced
    }

    /// Remove and return every completed record, in arrival order
    pub fn take_completed(&mut self) -> Vec<Record> {
        let (done, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_values()
            .partition(|r| r.is_completed());
        self.records = keep.into_iter().map(|r| (r.id(), r)).collect();
        done
    }

    /// Sorted and filtered view used by the list: visible records by importance
    pub fn projection(&self, today: NaiveDate) -> Vec<&Record> {
        let all: Vec<&Record> = self.iter().collect();
        filter_hidden(sort_by_importance(all, today), today)
    }
}

/// Order records by importance with four chained stable sorts. The last pass
/// is the primary key: completion, then priority, then overdue, then first
/// context. Records equal on every key keep their relative order.
pub fn sort_by_importance(mut records: Vec<&Record>, today: NaiveDate) -> Vec<&Record> {
    // First context, missing first
    records.sort_by(|a, b| a.first_context().cmp(&b.first_context()));
    // Overdue first
    records.sort_by_key(|r| !r.is_overdue(today));
    // Priority letter, missing last
    records.sort_by_key(|r| (r.priority.is_none(), r.priority));
    // Active before completed
    records.sort_by_key(|r| r.is_completed());
    records
}

/// Order-preserving subsequence of visible records
pub fn filter_hidden(records: Vec<&Record>, today: NaiveDate) -> Vec<&Record> {
    records.into_iter().filter(|r| r.is_visible(today)).collect()
}
