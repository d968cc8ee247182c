//! Tree nodes
//!
//! Files and directories. Siblings of the same kind never share a name.

use std::fmt;

use crate::acl::Acl;

/// Name of the root directory, which always exists and is never deleted.
pub const ROOT_NAME: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub content: String,
    pub acl: Acl,
}

impl File {
    /// Creates a file owned by `owner`, who is granted read and write.
    pub fn new(name: &str, content: &str, owner: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
            acl: Acl::owned_by(owner),
        }
    }

    /// Appends `delta` on a new line.
    pub fn append(&mut self, delta: &str) {
        self.content.push('\n');
        self.content.push_str(delta);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    files: Vec<File>,
    subdirectories: Vec<Directory>,
}

impl Directory {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
            subdirectories: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_NAME)
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn subdirectories(&self) -> &[Directory] {
        &self.subdirectories
    }

    pub fn find_file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn find_file_mut(&mut self, name: &str) -> Option<&mut File> {
        self.files.iter_mut().find(|f| f.name == name)
    }

    pub fn find_subdir(&self, name: &str) -> Option<&Directory> {
        self.subdirectories.iter().find(|d| d.name == name)
    }

    pub fn find_subdir_mut(&mut self, name: &str) -> Option<&mut Directory> {
        self.subdirectories.iter_mut().find(|d| d.name == name)
    }

    /// Adds `file` unless a file with the same name exists. Returns whether
    /// it was inserted.
    pub fn insert_file(&mut self, file: File) -> bool {
        if self.find_file(&file.name).is_some() {
            return false;
        }
        self.files.push(file);
        true
    }

    pub fn remove_file(&mut self, name: &str) -> Option<File> {
        let index = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.remove(index))
    }

    /// Returns the subdirectory called `name`, creating it if needed.
    pub fn subdir_or_create(&mut self, name: &str) -> &mut Directory {
        match self.subdirectories.iter().position(|d| d.name == name) {
            Some(index) => &mut self.subdirectories[index],
            None => {
                self.subdirectories.push(Directory::new(name));
                let last = self.subdirectories.len() - 1;
                &mut self.subdirectories[last]
            }
        }
    }

    /// Children, directories first, each group in insertion order.
    pub fn list(&self) -> Vec<ListEntry> {
        self.subdirectories
            .iter()
            .map(|d| ListEntry {
                name: d.name.clone(),
                kind: EntryKind::Directory,
            })
            .chain(self.files.iter().map(|f| ListEntry {
                name: f.name.clone(),
                kind: EntryKind::File,
            }))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One child in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Directory => write!(f, "<DIR> {}", self.name),
            EntryKind::File => write!(f, "      {}", self.name),
        }
    }
}
