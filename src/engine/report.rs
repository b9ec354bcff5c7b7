//! Per-tick outcome summary.

use crate::locks::LockEntry;

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// First tick since start: only the timestamp sample was taken.
    pub cold_start: bool,

    /// Replacement locks written for stale interval locks.
    pub reconciled: Vec<LockEntry>,

    /// Claimed occurrences whose callback was invoked.
    pub fired: Vec<LockEntry>,

    /// Interval locks written for the next occurrence.
    pub rearmed: Vec<LockEntry>,

    /// Due locks that were already gone when this tick tried to claim them.
    pub claimed_elsewhere: usize,

    /// Claimed occurrences with no registered callback.
    pub unknown_ufids: Vec<String>,

    /// Lock writes (re-arm or reconcile) that failed and were swallowed.
    pub create_failures: usize,

    /// Deletes that failed for a reason other than a lost claim.
    pub delete_failures: usize,
}

impl TickReport {
    pub(crate) fn cold() -> Self {
        Self {
            cold_start: true,
            ..Self::default()
        }
    }

    /// Number of fired occurrences for `ufid`.
    pub fn fired_count(&self, ufid: &str) -> usize {
        self.fired.iter().filter(|entry| entry.ufid == ufid).count()
    }
}
