//! In-memory journal sequence backed by a durable store

use log::{info, warn};

use super::entry::JournalEntry;
use super::store::{JournalStore, MemoryStore};
use crate::error::FsError;

/// Ordered, append-only sequence of journal entries.
///
/// Every entry reaches the durable store before it is added to the
/// in-memory sequence, so the two never disagree about accepted entries.
pub struct Journal {
    entries: Vec<JournalEntry>,
    store: Box<dyn JournalStore>,
}

impl Journal {
    pub fn new(store: Box<dyn JournalStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn append(&mut self, entry: JournalEntry) -> Result<(), FsError> {
        self.store.append(&entry)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Rewrites the durable store from the in-memory sequence.
    pub fn persist_all(&mut self) -> Result<usize, FsError> {
        self.store.rewrite(&self.entries)?;
        info!(
            "Persisted {} journal entries to {}",
            self.entries.len(),
            self.store.describe()
        );
        Ok(self.entries.len())
    }

    /// Replaces the in-memory sequence with the durable store's records.
    ///
    /// Without a durable store the sequence is left untouched and
    /// `JournalUnavailable` is returned.
    pub fn load_all(&mut self) -> Result<usize, FsError> {
        match self.store.load()? {
            Some(entries) => {
                self.entries = entries;
                Ok(self.entries.len())
            }
            None => {
                warn!("No journal found at {}", self.store.describe());
                Err(FsError::JournalUnavailable(self.store.describe()))
            }
        }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn location(&self) -> String {
        self.store.describe()
    }
}
