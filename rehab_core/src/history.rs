//! Append-only session history.

use crate::store::ProgressStore;
use crate::types::SessionRecord;
use crate::Result;

/// Completed sessions in the order they were finished
///
/// There is no way to remove, reorder or edit a record once appended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<SessionRecord>,
}

impl History {
    /// Wrap records loaded from storage, keeping their order
    pub fn from_records(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }

    /// Load from the persistence surface
    pub fn load<S: ProgressStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self::from_records(store.load_history()?))
    }

    /// Append in memory, then re-persist the full sequence
    ///
    /// The record stays in memory even when the save fails; the next
    /// successful save writes it out.
    pub fn append<S: ProgressStore + ?Sized>(
        &mut self,
        record: SessionRecord,
        store: &mut S,
    ) -> Result<()> {
        self.records.push(record);
        store.save_history(&self.records)
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&SessionRecord> {
        self.records.last()
    }

    /// The most recent `n` records, oldest first
    pub fn recent(&self, n: usize) -> &[SessionRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }
}
