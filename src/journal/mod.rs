//! Write-ahead journal
//!
//! The ordered log of accepted operations and the durable stores it is
//! persisted to. The journal is the source of truth; the tree is rebuilt
//! from it during recovery.

pub mod entry;
pub mod sequence;
pub mod store;

pub use entry::{Action, JournalEntry};
pub use sequence::Journal;
pub use store::{FileStore, JournalStore, MemoryStore};
