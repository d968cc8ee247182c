//! File system operations
//!
//! Each operation resolves its target, checks the caller's permission,
//! appends a journal entry and only then mutates the tree. A rejected
//! operation leaves both the tree and the journal untouched.

use log::{debug, info, warn};

use crate::acl::{Acl, Permission};
use crate::config::JournalPolicy;
use crate::error::FsError;
use crate::fs::results::RecoveryState;
use crate::journal::{FileStore, Journal, JournalEntry};
use crate::tree::{
    Directory, File, ListEntry, find_directory, lookup_parent, lookup_parent_mut, normalize_path,
    resolve_or_create_parents,
};

/// One independent file system: a tree plus the journal it is derived from.
pub struct FileSystem {
    pub(crate) root: Directory,
    pub(crate) journal: Journal,
    pub(crate) state: RecoveryState,
    policy: JournalPolicy,
    admin: String,
}

/// Looks up an existing file without creating anything on the way.
fn file_mut<'a>(root: &'a mut Directory, path: &str) -> Result<&'a mut File, FsError> {
    lookup_parent_mut(root, path)
        .and_then(|(parent, name)| parent.find_file_mut(&name))
        .ok_or_else(|| FsError::NotFound(path.to_string()))
}

fn file_ref<'a>(root: &'a Directory, path: &str) -> Result<&'a File, FsError> {
    lookup_parent(root, path)
        .and_then(|(parent, name)| parent.find_file(&name))
        .ok_or_else(|| FsError::NotFound(path.to_string()))
}

impl FileSystem {
    /// Empty file system journaling into memory.
    pub fn new(policy: JournalPolicy, admin: &str) -> Self {
        Self::with_journal(Journal::in_memory(), policy, admin)
    }

    pub fn with_journal(journal: Journal, policy: JournalPolicy, admin: &str) -> Self {
        Self {
            root: Directory::root(),
            journal,
            state: RecoveryState::Live,
            policy,
            admin: admin.to_string(),
        }
    }

    /// Opens the journal named by `policy.path` and rebuilds the tree from it.
    ///
    /// A missing journal file starts an empty file system. Without a path the
    /// journal lives in memory.
    pub fn open(policy: JournalPolicy, admin: &str) -> Result<Self, FsError> {
        let journal = match &policy.path {
            Some(path) => Journal::new(Box::new(FileStore::new(path))),
            None => Journal::in_memory(),
        };
        let mut fs = Self::with_journal(journal, policy, admin);

        match fs.journal.load_all() {
            Ok(count) => {
                let report = fs.replay();
                info!(
                    "Recovered from {} ({} entries): {}",
                    fs.journal.location(),
                    count,
                    report
                );
            }
            Err(FsError::JournalUnavailable(location)) => {
                info!("Starting with an empty journal at {}", location);
            }
            Err(e) => return Err(e),
        }
        Ok(fs)
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    pub fn policy(&self) -> &JournalPolicy {
        &self.policy
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn recovery_state(&self) -> RecoveryState {
        self.state
    }

    pub fn create_file(&mut self, path: &str, content: &str, user: &str) -> Result<(), FsError> {
        let target = normalize_path(path);
        let exists = match lookup_parent(&self.root, &target) {
            Some((_, name)) if name.is_empty() => {
                return Err(FsError::InvalidPath(path.to_string()));
            }
            Some((parent, name)) => parent.find_file(&name).is_some(),
            None => false,
        };
        if exists {
            warn!("[{}] create rejected, '{}' already exists", user, target);
            return Err(FsError::AlreadyExists(target));
        }

        // Missing parents are only created once the entry is durable
        self.journal
            .append(JournalEntry::create(&target, content, user))?;
        let (parent, name) = resolve_or_create_parents(&mut self.root, &target);
        parent.insert_file(File::new(&name, content, user));

        info!("[{}] created file {}", user, target);
        Ok(())
    }

    pub fn delete_file(&mut self, path: &str, user: &str) -> Result<(), FsError> {
        let target = normalize_path(path);
        let (parent, name) = lookup_parent_mut(&mut self.root, &target)
            .ok_or_else(|| FsError::NotFound(target.clone()))?;
        let file = parent
            .find_file(&name)
            .ok_or_else(|| FsError::NotFound(target.clone()))?;
        if !file.acl.get(user).can_write() {
            warn!("[{}] delete denied on {}", user, target);
            return Err(FsError::denied(user, &target));
        }

        self.journal
            .append(JournalEntry::delete(&target, &file.content, user))?;
        parent.remove_file(&name);

        info!("[{}] deleted file {}", user, target);
        Ok(())
    }

    /// Returns the file's content. Logged as a `Read` entry when the policy
    /// asks for read auditing.
    pub fn read_file(&mut self, path: &str, user: &str) -> Result<String, FsError> {
        let target = normalize_path(path);
        let file = file_ref(&self.root, &target)?;
        if !file.acl.get(user).can_read() {
            warn!("[{}] read denied on {}", user, target);
            return Err(FsError::denied(user, &target));
        }
        let content = file.content.clone();

        if self.policy.log_reads {
            self.journal.append(JournalEntry::read(&target, user))?;
        }
        debug!("[{}] read file {}", user, target);
        Ok(content)
    }

    pub fn write_file(&mut self, path: &str, content: &str, user: &str) -> Result<(), FsError> {
        let target = normalize_path(path);
        let file = file_mut(&mut self.root, &target)?;
        if !file.acl.get(user).can_write() {
            warn!("[{}] write denied on {}", user, target);
            return Err(FsError::denied(user, &target));
        }

        self.journal
            .append(JournalEntry::write(&target, content, user))?;
        file.content = content.to_string();

        info!("[{}] wrote file {}", user, target);
        Ok(())
    }

    /// Adds `delta` on a new line. Only the delta is journaled.
    pub fn append_to_file(&mut self, path: &str, delta: &str, user: &str) -> Result<(), FsError> {
        let target = normalize_path(path);
        let file = file_mut(&mut self.root, &target)?;
        if !file.acl.get(user).can_write() {
            warn!("[{}] append denied on {}", user, target);
            return Err(FsError::denied(user, &target));
        }

        self.journal
            .append(JournalEntry::append(&target, delta, user))?;
        file.append(delta);

        info!("[{}] appended to file {}", user, target);
        Ok(())
    }

    /// Sets `target_user`'s permission on a file. Only the admin principal may
    /// call this; the level is parsed before anything is touched.
    pub fn set_file_permission(
        &mut self,
        path: &str,
        target_user: &str,
        permission: &str,
        admin: &str,
    ) -> Result<Permission, FsError> {
        if admin != self.admin {
            warn!("[{}] chmod rejected, not the admin", admin);
            return Err(FsError::InvalidAdmin(admin.to_string()));
        }
        let level: Permission = permission.parse()?;

        let target = normalize_path(path);
        let file = file_mut(&mut self.root, &target)?;

        self.journal
            .append(JournalEntry::chmod(&target, target_user, level, admin))?;
        file.acl.set(target_user, level);

        info!(
            "[{}] granted '{}' to '{}' on {}",
            admin, level, target_user, target
        );
        Ok(level)
    }

    /// ACL of a file, visible to the admin and to anyone who may read it.
    pub fn file_acl(&self, path: &str, user: &str) -> Result<Acl, FsError> {
        let target = normalize_path(path);
        let file = file_ref(&self.root, &target)?;
        if user != self.admin && !file.acl.get(user).can_read() {
            return Err(FsError::denied(user, &target));
        }
        Ok(file.acl.clone())
    }

    /// Creates a directory and any missing parents. Not gated by ACLs.
    pub fn create_directory(&mut self, path: &str, user: &str) -> Result<(), FsError> {
        let target = normalize_path(path);
        let taken = match lookup_parent(&self.root, &target) {
            Some((_, name)) if name.is_empty() => true,
            Some((parent, name)) => {
                parent.find_subdir(&name).is_some() || parent.find_file(&name).is_some()
            }
            None => false,
        };
        if taken {
            warn!("mkdir rejected, '{}' already exists", target);
            return Err(FsError::AlreadyExists(target));
        }

        if self.policy.log_directories {
            self.journal.append(JournalEntry::mkdir(&target, user))?;
        }
        let (parent, name) = resolve_or_create_parents(&mut self.root, &target);
        parent.subdir_or_create(&name);

        info!("[{}] created directory {}", user, target);
        Ok(())
    }

    /// Children of a directory, subdirectories first.
    pub fn list_directory(&self, path: &str) -> Result<Vec<ListEntry>, FsError> {
        find_directory(&self.root, path)
            .map(Directory::list)
            .ok_or_else(|| FsError::NotFound(normalize_path(path)))
    }

    pub fn directory_exists(&self, path: &str) -> bool {
        find_directory(&self.root, path).is_some()
    }

    pub fn file_exists(&self, path: &str) -> bool {
        file_ref(&self.root, path).is_ok()
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        self.journal.entries()
    }

    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Rewrites the durable journal from memory.
    pub fn save_journal(&mut self) -> Result<usize, FsError> {
        self.journal.persist_all()
    }

    /// Replaces the in-memory journal with the durable one. The tree is left
    /// as is until the next recovery.
    pub fn load_journal(&mut self) -> Result<usize, FsError> {
        self.journal.load_all()
    }
}
