//! Path resolution
//!
//! Paths are `/`-separated and always taken from the root. Empty segments are
//! skipped, so `/a//b/` names the same leaf as `/a/b`. The leaf of `/` is the
//! empty name, which stands for the directory itself.

use super::node::Directory;

/// Splits `path` into its intermediate directory names and leaf name.
pub fn split_path(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.pop() {
        Some(leaf) => (segments, leaf),
        None => (segments, ""),
    }
}

/// Canonical form of `path`: leading slash, no empty segments.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Returns the parent directory of the leaf of `path` and the leaf name.
///
/// Every missing intermediate directory is created on the way down, like
/// `mkdir -p`. Only the leaf itself can turn out to be absent.
pub fn resolve_or_create_parents<'a>(
    root: &'a mut Directory,
    path: &str,
) -> (&'a mut Directory, String) {
    let (parents, leaf) = split_path(path);
    let mut current = root;
    for name in parents {
        current = current.subdir_or_create(name);
    }
    (current, leaf.to_string())
}

/// Read-only counterpart of [`resolve_or_create_parents`]. Returns `None`
/// if an intermediate directory is missing.
///
/// Lookups of existing targets go through here and never create
/// directories, so a failed lookup leaves the tree unchanged. Only
/// journaled creations add directories.
pub fn lookup_parent<'a>(root: &'a Directory, path: &str) -> Option<(&'a Directory, String)> {
    let (parents, leaf) = split_path(path);
    let mut current = root;
    for name in parents {
        current = current.find_subdir(name)?;
    }
    Some((current, leaf.to_string()))
}

/// Like [`lookup_parent`] but yields a mutable parent. Nothing is created.
pub fn lookup_parent_mut<'a>(
    root: &'a mut Directory,
    path: &str,
) -> Option<(&'a mut Directory, String)> {
    let (parents, leaf) = split_path(path);
    let mut current = root;
    for name in parents {
        current = current.find_subdir_mut(name)?;
    }
    Some((current, leaf.to_string()))
}

/// Finds the directory named by `path`. `/` and the empty path are the root.
pub fn find_directory<'a>(root: &'a Directory, path: &str) -> Option<&'a Directory> {
    let (parent, leaf) = lookup_parent(root, path)?;
    if leaf.is_empty() {
        Some(parent)
    } else {
        parent.find_subdir(&leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_root_and_single_segment() {
        assert_eq!(split_path("/"), (vec![], ""));
        assert_eq!(split_path("/x"), (vec![], "x"));
        assert_eq!(split_path("/a/b/c"), (vec!["a", "b"], "c"));
        assert_eq!(split_path("a//b/"), (vec!["a"], "b"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_path("a//b/"), "/a/b");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/x"), "/x");
    }

    #[test]
    fn test_resolve_creates_intermediates() {
        let mut root = Directory::root();
        let (parent, leaf) = resolve_or_create_parents(&mut root, "/a/b/file.txt");
        assert_eq!(parent.name, "b");
        assert_eq!(leaf, "file.txt");
        assert!(find_directory(&root, "/a").is_some());
        assert!(find_directory(&root, "/a/b").is_some());
    }

    #[test]
    fn test_resolve_root_leaf_is_empty() {
        let mut root = Directory::root();
        let (parent, leaf) = resolve_or_create_parents(&mut root, "/");
        assert_eq!(parent.name, "root");
        assert!(leaf.is_empty());
    }

    #[test]
    fn test_lookup_does_not_create() {
        let root = Directory::root();
        assert!(lookup_parent(&root, "/missing/file").is_none());
        assert!(root.subdirectories().is_empty());
        assert!(find_directory(&root, "/").is_some());
        assert!(find_directory(&root, "").is_some());
    }
}
