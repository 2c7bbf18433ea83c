use chrono::{DateTime, Utc};

use crate::types::MigrationStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpReport {
    pub applied: Vec<i32>,
    /// Pending versions without an up script.
    pub skipped: Vec<i32>,
}

impl UpReport {
    pub fn count(&self) -> usize {
        self.applied.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownOutcome {
    NothingToRollback,
    RolledBack { version: i32, name: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetMode {
    /// Skip applied versions without a down script and keep going.
    #[default]
    BestEffort,
    /// Refuse to start if any applied version lacks a down script.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub nothing_applied: bool,
    pub rolled_back: Vec<i32>,
    /// Versions left marked as applied because they have no down script.
    pub skipped: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub version: i32,
    pub name: String,
    pub status: MigrationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub entries: Vec<StatusEntry>,
    /// Versions in the ledger with no matching migration file.
    pub orphaned: Vec<(i32, DateTime<Utc>)>,
}

impl StatusReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn applied(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_applied()).count()
    }

    pub fn pending(&self) -> usize {
        self.total() - self.applied()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {} | Applied: {} | Pending: {}",
            self.total(),
            self.applied(),
            self.pending()
        )
    }
}
