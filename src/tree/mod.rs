//! Directory tree
//!
//! The in-memory hierarchy of directories and files, plus the path resolver
//! that walks it.

pub mod node;
pub mod resolver;

pub use node::{Directory, EntryKind, File, ListEntry, ROOT_NAME};
pub use resolver::{
    find_directory, lookup_parent, lookup_parent_mut, normalize_path, resolve_or_create_parents,
    split_path,
};
