use std::{io, path::PathBuf};

use dosattrib_fs::EntryKind;
use dosattrib_record::AttributeRecord;

/// What happened to the new record of a reported entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Nothing to write; the entry is reported for its current state only.
    Unchanged,
    Updated,
    /// Would have been written, but the walk is a dry run.
    NotUpdated,
    /// Encoding or writing the new record failed.
    Failed(String),
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Unchanged => "unchanged",
            UpdateStatus::Updated => "updated",
            UpdateStatus::NotUpdated => "not updated",
            UpdateStatus::Failed(_) => "update failed",
        }
    }
}

/// One reported entry.
#[derive(Debug, Clone)]
pub struct EntryReport {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub old: AttributeRecord,
    /// Set when a new record was computed for writing.
    pub new: Option<AttributeRecord>,
    /// Raw attribute as read; empty when the entry had none.
    pub old_blob: Vec<u8>,
    /// Encoded new record; empty when nothing was encoded.
    pub new_blob: Vec<u8>,
    pub status: UpdateStatus,
}

/// Receives reported entries as the walk produces them.
pub trait Reporter {
    fn report(&mut self, entry: &EntryReport) -> io::Result<()>;
}

/// Collects reports in memory.
impl Reporter for Vec<EntryReport> {
    fn report(&mut self, entry: &EntryReport) -> io::Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}

/// Counters for a finished walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Entries handed over by the tree walk, inaccessible ones included.
    pub visited: usize,
    pub reported: usize,
    pub updated: usize,
    /// Entries whose attribute could not be read, encoded or written, plus
    /// inaccessible entries that stopped the walk.
    pub failed: usize,
    /// Blobs that could not be decoded.
    pub corrupt: usize,
    /// The walk stopped before visiting every entry.
    pub aborted: bool,
}

impl WalkSummary {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.aborted
    }
}
