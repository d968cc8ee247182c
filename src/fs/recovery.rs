//! Crash recovery
//!
//! Discards the tree and rebuilds it by replaying the journal in append
//! order onto an empty root. Replay bypasses permission checks.
//!
//! Every handler checks existence before acting, so a single entry is safe
//! to apply once. A full replay is only valid against a freshly reset root:
//! replaying twice onto the same tree duplicates `Append` deltas.

use log::{debug, info, warn};

use crate::acl::Permission;
use crate::error::FsError;
use crate::fs::facade::FileSystem;
use crate::fs::results::{RecoveryReport, RecoveryState, ReplayOutcome};
use crate::journal::{Action, JournalEntry};
use crate::tree::{Directory, File, lookup_parent_mut, resolve_or_create_parents};

impl FileSystem {
    /// Drops the in-memory tree and rebuilds it from the journal.
    ///
    /// Never fails: an entry that cannot be applied is logged and skipped.
    pub fn simulate_crash_and_recovery(&mut self) -> RecoveryReport {
        info!(
            "Simulating crash, rebuilding tree from {} journal entries",
            self.journal.len()
        );
        let report = self.replay();
        info!("Recovery complete: {}", report);
        report
    }

    /// Reloads the journal from its durable store, then replays it. This is
    /// what a restart after a real crash does.
    pub fn recover_from_store(&mut self) -> Result<RecoveryReport, FsError> {
        self.journal.load_all()?;
        Ok(self.simulate_crash_and_recovery())
    }

    pub(crate) fn replay(&mut self) -> RecoveryReport {
        self.state = RecoveryState::Recovering;
        self.root = Directory::root();

        let mut report = RecoveryReport::default();
        for (index, entry) in self.journal.entries().iter().enumerate() {
            match replay_entry(&mut self.root, entry) {
                Ok(outcome) => {
                    debug!("Replayed #{} ({}): {:?}", index + 1, entry, outcome);
                    report.record(outcome);
                }
                Err(e) => {
                    warn!("Skipping journal entry #{} ({}): {}", index + 1, entry, e);
                    report.failed += 1;
                }
            }
        }

        self.state = RecoveryState::Live;
        report
    }
}

fn required<'a>(
    value: &'a Option<String>,
    field: &str,
    entry: &JournalEntry,
) -> Result<&'a str, FsError> {
    value.as_deref().ok_or_else(|| {
        FsError::MalformedEntry(format!(
            "{} entry for {} has no {}",
            entry.action, entry.target, field
        ))
    })
}

/// Applies one entry to `root`.
pub fn replay_entry(root: &mut Directory, entry: &JournalEntry) -> Result<ReplayOutcome, FsError> {
    match entry.action {
        Action::Create => {
            let content = required(&entry.content, "content", entry)?;
            let owner = required(&entry.user, "user", entry)?;
            let (parent, name) = resolve_or_create_parents(root, &entry.target);
            if name.is_empty() {
                return Err(FsError::InvalidPath(entry.target.clone()));
            }
            if parent.insert_file(File::new(&name, content, owner)) {
                Ok(ReplayOutcome::Applied)
            } else {
                Ok(ReplayOutcome::Skipped)
            }
        }
        Action::Write => {
            let content = required(&entry.content, "content", entry)?;
            Ok(match existing_file(root, &entry.target) {
                Some(file) => {
                    file.content = content.to_string();
                    ReplayOutcome::Applied
                }
                None => ReplayOutcome::Skipped,
            })
        }
        Action::Append => {
            let delta = required(&entry.content, "content", entry)?;
            Ok(match existing_file(root, &entry.target) {
                Some(file) => {
                    file.append(delta);
                    ReplayOutcome::Applied
                }
                None => ReplayOutcome::Skipped,
            })
        }
        Action::Delete => {
            let removed = lookup_parent_mut(root, &entry.target)
                .and_then(|(parent, name)| parent.remove_file(&name));
            Ok(match removed {
                Some(_) => ReplayOutcome::Applied,
                None => ReplayOutcome::Skipped,
            })
        }
        Action::Read => Ok(ReplayOutcome::Ignored),
        Action::Mkdir => {
            let (parent, name) = resolve_or_create_parents(root, &entry.target);
            if name.is_empty() || parent.find_subdir(&name).is_some() {
                return Ok(ReplayOutcome::Skipped);
            }
            parent.subdir_or_create(&name);
            Ok(ReplayOutcome::Applied)
        }
        Action::Chmod => {
            let grantee = required(&entry.grantee, "grantee", entry)?;
            let level: Permission = required(&entry.content, "permission", entry)?.parse()?;
            Ok(match existing_file(root, &entry.target) {
                Some(file) => {
                    file.acl.set(grantee, level);
                    ReplayOutcome::Applied
                }
                None => ReplayOutcome::Skipped,
            })
        }
    }
}

fn existing_file<'a>(root: &'a mut Directory, path: &str) -> Option<&'a mut File> {
    lookup_parent_mut(root, path).and_then(|(parent, name)| parent.find_file_mut(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JournalPolicy;

    fn fs() -> FileSystem {
        FileSystem::new(JournalPolicy::default(), "admin")
    }

    #[test]
    fn test_append_survives_recovery() {
        let mut fs = fs();
        fs.create_file("/notes/a.txt", "hello", "alice").unwrap();
        fs.append_to_file("/notes/a.txt", "world", "alice").unwrap();

        let report = fs.simulate_crash_and_recovery();
        assert_eq!(report.applied, 2);
        assert_eq!(fs.read_file("/notes/a.txt", "alice").unwrap(), "hello\nworld");
        assert_eq!(fs.recovery_state(), RecoveryState::Live);
    }

    #[test]
    fn test_recovery_reproduces_tree() {
        let mut fs = fs();
        fs.create_file("/a", "1", "alice").unwrap();
        fs.create_file("/d/b", "2", "bob").unwrap();
        fs.write_file("/a", "one", "alice").unwrap();
        fs.delete_file("/d/b", "bob").unwrap();
        fs.create_file("/d/c", "3", "bob").unwrap();
        fs.append_to_file("/d/c", "4", "bob").unwrap();
        let before = fs.root().clone();

        fs.simulate_crash_and_recovery();
        assert_eq!(fs.root(), &before);
    }

    #[test]
    fn test_replay_twice_from_reset_root_is_stable() {
        let mut fs = fs();
        fs.create_file("/a", "x", "alice").unwrap();
        fs.append_to_file("/a", "y", "alice").unwrap();

        fs.simulate_crash_and_recovery();
        let first = fs.root().clone();
        fs.simulate_crash_and_recovery();
        assert_eq!(fs.root(), &first);
    }

    #[test]
    fn test_replay_onto_live_tree_duplicates_appends() {
        let mut fs = fs();
        fs.create_file("/a", "x", "alice").unwrap();
        fs.append_to_file("/a", "y", "alice").unwrap();

        let entries = fs.journal_entries().to_vec();
        let mut root = fs.root().clone();
        for entry in &entries {
            replay_entry(&mut root, entry).unwrap();
        }
        assert_eq!(root.find_file("a").unwrap().content, "x\ny\ny");
    }

    #[test]
    fn test_chmod_and_mkdir_survive_recovery() {
        let mut fs = fs();
        fs.create_directory("/empty", "admin").unwrap();
        fs.create_file("/a", "x", "alice").unwrap();
        fs.set_file_permission("/a", "bob", "r", "admin").unwrap();

        fs.simulate_crash_and_recovery();
        assert!(fs.directory_exists("/empty"));
        assert_eq!(fs.read_file("/a", "bob").unwrap(), "x");
    }

    #[test]
    fn test_unlogged_mkdir_is_lost() {
        let policy = JournalPolicy {
            log_directories: false,
            ..JournalPolicy::default()
        };
        let mut fs = FileSystem::new(policy, "admin");
        fs.create_directory("/empty", "admin").unwrap();
        fs.create_file("/kept/a", "", "alice").unwrap();

        fs.simulate_crash_and_recovery();
        assert!(!fs.directory_exists("/empty"));
        assert!(fs.directory_exists("/kept"));
    }

    #[test]
    fn test_bad_entry_is_skipped() {
        let mut root = Directory::root();
        let mut broken = JournalEntry::create("/a", "x", "alice");
        broken.content = None;
        assert!(matches!(
            replay_entry(&mut root, &broken),
            Err(FsError::MalformedEntry(_))
        ));

        let mut fs = fs();
        fs.create_file("/b", "y", "alice").unwrap();
        fs.journal.append(broken).unwrap();
        let report = fs.simulate_crash_and_recovery();
        assert_eq!(report.failed, 1);
        assert_eq!(report.applied, 1);
        assert!(fs.file_exists("/b"));
    }

    #[test]
    fn test_read_entries_are_ignored() {
        let mut root = Directory::root();
        let outcome = replay_entry(&mut root, &JournalEntry::read("/a", "bob")).unwrap();
        assert_eq!(outcome, ReplayOutcome::Ignored);
    }

    #[test]
    fn test_write_to_missing_file_is_skipped() {
        let mut root = Directory::root();
        let outcome = replay_entry(&mut root, &JournalEntry::write("/a", "x", "bob")).unwrap();
        assert_eq!(outcome, ReplayOutcome::Skipped);
    }
}
