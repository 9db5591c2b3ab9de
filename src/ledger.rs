//! In-memory ledger
//!
//! Append-only store of committed entries. Lives for the process only.

use crate::models::{EntryDraft, FinanceRecord, RecordId};
use tracing::info;

/// Ordered, append-only collection of finance records
#[derive(Debug)]
pub struct Ledger {
    records: Vec<FinanceRecord>,
    next_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Commit a draft and return its newly assigned identity
    pub fn append(&mut self, draft: EntryDraft) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;

        self.records.push(FinanceRecord::from_draft(id, draft));

        info!(record_id = id.0, total_records = self.records.len(), "Entry committed");
        id
    }

    /// All records, in insertion order
    pub fn all(&self) -> &[FinanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All-time revenue across every record
    pub fn total_revenue(&self) -> u128 {
        self.records.iter().map(|r| u128::from(r.revenue)).sum()
    }

    /// All-time cost across every record
    pub fn total_cost(&self) -> u128 {
        self.records.iter().map(|r| u128::from(r.cost)).sum()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
