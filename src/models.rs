//! Core data models for the bookkeeping assistant

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock timestamp used for every ledger entry.
pub type Timestamp = NaiveDateTime;

/// Largest amount accepted for a single revenue or cost value
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

//
// ================= Identity =================
//

/// Ledger-assigned record identity. Monotonically increasing from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//
// ================= Entries =================
//

/// An extracted entry waiting for confirmation. Has no identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub revenue: u64,
    pub cost: u64,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// A committed ledger entry. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub id: RecordId,
    pub revenue: u64,
    pub cost: u64,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl FinanceRecord {
    pub(crate) fn from_draft(id: RecordId, draft: EntryDraft) -> Self {
        Self {
            id,
            revenue: draft.revenue,
            cost: draft.cost,
            note: draft.note,
            created_at: draft.created_at,
        }
    }

    pub fn profit(&self) -> i128 {
        i128::from(self.revenue) - i128::from(self.cost)
    }
}

impl fmt::Display for EntryDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "revenue: {}, cost: {}, date: {}",
            self.revenue,
            self.cost,
            self.created_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        if let Some(note) = &self.note {
            write!(f, ", note: {}", note)?;
        }
        Ok(())
    }
}
