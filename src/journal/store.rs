//! Durable journal stores
//!
//! Records are encoded as JSON, one per line, in append order.

use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::entry::JournalEntry;
use crate::error::FsError;

/// Where journal records are persisted.
pub trait JournalStore: Send {
    /// Durably appends one record. Must not return before the record is stored.
    fn append(&mut self, entry: &JournalEntry) -> Result<(), FsError>;

    /// Replaces the whole store with `entries`.
    fn rewrite(&mut self, entries: &[JournalEntry]) -> Result<(), FsError>;

    /// Reads every record in order. `Ok(None)` means no store exists yet.
    fn load(&self) -> Result<Option<Vec<JournalEntry>>, FsError>;

    /// Human-readable location, for logs and errors.
    fn describe(&self) -> String;
}

fn encode(entry: &JournalEntry) -> Result<String, FsError> {
    serde_json::to_string(entry).map_err(|source| FsError::Codec { line: 0, source })
}

fn decode(line: &str, line_no: usize) -> Result<JournalEntry, FsError> {
    serde_json::from_str(line).map_err(|source| FsError::Codec {
        line: line_no,
        source,
    })
}

/// JSON-lines journal file.
///
/// A crash mid-append can leave a final line without its newline. Loading
/// drops such a torn record, and the first append cuts it off the file
/// before writing.
pub struct FileStore {
    path: PathBuf,
    tail_checked: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tail_checked: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Truncates the file back to its last newline if it ends mid-record.
    fn trim_torn_tail(&mut self) -> Result<(), FsError> {
        if self.tail_checked {
            return Ok(());
        }
        if self.path.is_file() {
            let bytes = fs::read(&self.path)?;
            if bytes.last().is_some_and(|b| *b != b'\n') {
                let keep = bytes
                    .iter()
                    .rposition(|b| *b == b'\n')
                    .map_or(0, |pos| pos + 1);
                let tail = String::from_utf8_lossy(&bytes[keep..]);
                let mut file = OpenOptions::new().write(true).open(&self.path)?;
                if serde_json::from_str::<JournalEntry>(tail.trim()).is_ok() {
                    // Complete record missing only its newline; load kept it
                    file.seek(SeekFrom::End(0))?;
                    file.write_all(b"\n")?;
                } else {
                    warn!(
                        "Dropping {} bytes of torn record at the end of {}",
                        bytes.len() - keep,
                        self.path.display()
                    );
                    file.set_len(keep as u64)?;
                }
                file.sync_data()?;
            }
        }
        self.tail_checked = true;
        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), FsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl JournalStore for FileStore {
    fn append(&mut self, entry: &JournalEntry) -> Result<(), FsError> {
        self.ensure_parent()?;
        self.trim_torn_tail()?;
        let mut line = encode(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;

        debug!("Appended {} record to {}", entry.action, self.path.display());
        Ok(())
    }

    fn rewrite(&mut self, entries: &[JournalEntry]) -> Result<(), FsError> {
        self.ensure_parent()?;
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            for entry in entries {
                let mut line = encode(entry)?;
                line.push('\n');
                file.write_all(line.as_bytes())?;
            }
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        self.tail_checked = true;

        info!(
            "Rewrote journal {} with {} records",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<JournalEntry>>, FsError> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        let torn_tail = !raw.is_empty() && !raw.ends_with('\n');
        let lines: Vec<&str> = raw.lines().collect();

        let mut entries = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match decode(line, index + 1) {
                Ok(entry) => entries.push(entry),
                // Only an unterminated final record is a torn append
                Err(e) if torn_tail && index + 1 == lines.len() => {
                    warn!("Ignoring torn last record of {}: {}", self.path.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Loaded {} records from journal {}",
            entries.len(),
            self.path.display()
        );
        Ok(Some(entries))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps encoded records in memory. `load` reports no store until something
/// has been written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lines: Option<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalStore for MemoryStore {
    fn append(&mut self, entry: &JournalEntry) -> Result<(), FsError> {
        let line = encode(entry)?;
        self.lines.get_or_insert_with(Vec::new).push(line);
        Ok(())
    }

    fn rewrite(&mut self, entries: &[JournalEntry]) -> Result<(), FsError> {
        let lines = entries.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        self.lines = Some(lines);
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<JournalEntry>>, FsError> {
        match &self.lines {
            None => Ok(None),
            Some(lines) => lines
                .iter()
                .enumerate()
                .map(|(index, line)| decode(line, index + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
        }
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::Permission;
    use crate::journal::Action;
    use tempfile::tempdir;

    fn sample() -> Vec<JournalEntry> {
        vec![
            JournalEntry::create("/a.txt", "hello", "alice"),
            JournalEntry::append("/a.txt", "world", "alice"),
            JournalEntry::chmod("/a.txt", "bob", Permission::Read, "admin"),
            JournalEntry::delete("/a.txt", "hello\nworld", "alice"),
        ]
    }

    #[test]
    fn test_file_store_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("journal.jsonl"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_appends_in_order() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested/journal.jsonl"));
        for entry in sample() {
            store.append(&entry).unwrap();
        }
        assert_eq!(store.load().unwrap().unwrap(), sample());

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 4);
    }

    #[test]
    fn test_file_store_rewrite_replaces_content() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("journal.jsonl"));
        for entry in sample() {
            store.append(&entry).unwrap();
        }
        let kept = vec![JournalEntry::create("/b", "", "bob")];
        store.rewrite(&kept).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), kept);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_file_store_reports_bad_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let good = serde_json::to_string(&JournalEntry::read("/a", "bob")).unwrap();
        fs::write(&path, format!("{}\nnot json\n", good)).unwrap();

        let err = FileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, FsError::Codec { line: 2, .. }));
    }

    #[test]
    fn test_file_store_drops_torn_last_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let mut store = FileStore::new(&path);
        store.append(&JournalEntry::create("/a", "x", "alice")).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(br#"{"action":"write","target":"/a","con"#).unwrap();
        drop(file);

        let mut reopened = FileStore::new(&path);
        assert_eq!(reopened.load().unwrap().unwrap().len(), 1);

        reopened.append(&JournalEntry::write("/a", "y", "alice")).unwrap();
        let loaded = reopened.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].content.as_deref(), Some("y"));
        assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
    }

    #[test]
    fn test_file_store_keeps_complete_unterminated_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let line = encode(&JournalEntry::create("/a", "x", "alice")).unwrap();
        fs::write(&path, &line).unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.load().unwrap().unwrap().len(), 1);
        store.append(&JournalEntry::delete("/a", "x", "alice")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].action, Action::Create);
    }

    #[test]
    fn test_file_store_terminated_bad_last_line_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        fs::write(&path, "not json\n").unwrap();
        assert!(matches!(
            FileStore::new(&path).load(),
            Err(FsError::Codec { line: 1, .. })
        ));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.rewrite(&sample()).unwrap();
        store.append(&JournalEntry::mkdir("/docs", "admin")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 5);
        assert_eq!(loaded[4].target, "/docs");
    }
}
