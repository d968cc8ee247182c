//! File system façade
//!
//! The operation surface consumed by front ends: permission checks, tree
//! mutation and journaling for every verb, plus crash recovery.

pub mod facade;
pub mod recovery;
pub mod results;

pub use facade::FileSystem;
pub use results::{RecoveryReport, RecoveryState, ReplayOutcome};
