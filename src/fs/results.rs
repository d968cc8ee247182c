//! Result types
//!
//! Values returned by recovery.

use std::fmt;

/// Whether the tree reflects the journal or is being rebuilt from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    Live,
    Recovering,
}

/// What replaying a single entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// The entry changed the tree
    Applied,
    /// Its precondition did not hold, e.g. the file was already gone
    Skipped,
    /// The action carries no replay semantics
    Ignored,
}

/// Summary of one full replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub applied: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub failed: usize,
}

impl RecoveryReport {
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.ignored + self.failed
    }

    pub(crate) fn record(&mut self, outcome: ReplayOutcome) {
        match outcome {
            ReplayOutcome::Applied => self.applied += 1,
            ReplayOutcome::Skipped => self.skipped += 1,
            ReplayOutcome::Ignored => self.ignored += 1,
        }
    }
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries replayed: {} applied, {} skipped, {} ignored, {} failed",
            self.total(),
            self.applied,
            self.skipped,
            self.ignored,
            self.failed
        )
    }
}
