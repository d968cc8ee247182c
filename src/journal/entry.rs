//! Journal entries

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::acl::Permission;

const PREVIEW_LEN: usize = 20;

/// Kind of operation recorded by a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Write,
    Append,
    Delete,
    Read,
    Mkdir,
    Chmod,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Write => "write",
            Action::Append => "append",
            Action::Delete => "delete",
            Action::Read => "read",
            Action::Mkdir => "mkdir",
            Action::Chmod => "chmod",
        };
        f.write_str(name)
    }
}

/// One logged operation. Immutable once appended.
///
/// `content` depends on the action: the initial content for `Create`, the
/// full post-image for `Write`, only the appended delta for `Append`, the
/// content just before removal for `Delete`, and the permission token for
/// `Chmod`, whose grantee is kept in `grantee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub action: Action,
    pub target: String,
    pub content: Option<String>,
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grantee: Option<String>,
}

impl JournalEntry {
    fn new(action: Action, target: &str, content: Option<&str>, user: &str) -> Self {
        Self {
            action,
            target: target.to_string(),
            content: content.map(str::to_string),
            user: Some(user.to_string()),
            grantee: None,
        }
    }

    pub fn create(target: &str, content: &str, user: &str) -> Self {
        Self::new(Action::Create, target, Some(content), user)
    }

    pub fn write(target: &str, content: &str, user: &str) -> Self {
        Self::new(Action::Write, target, Some(content), user)
    }

    pub fn append(target: &str, delta: &str, user: &str) -> Self {
        Self::new(Action::Append, target, Some(delta), user)
    }

    pub fn delete(target: &str, last_content: &str, user: &str) -> Self {
        Self::new(Action::Delete, target, Some(last_content), user)
    }

    pub fn read(target: &str, user: &str) -> Self {
        Self::new(Action::Read, target, None, user)
    }

    pub fn mkdir(target: &str, user: &str) -> Self {
        Self::new(Action::Mkdir, target, None, user)
    }

    pub fn chmod(target: &str, grantee: &str, permission: Permission, admin: &str) -> Self {
        let mut entry = Self::new(Action::Chmod, target, Some(permission.as_token()), admin);
        entry.grantee = Some(grantee.to_string());
        entry
    }

    /// Content shortened for display.
    pub fn content_preview(&self) -> String {
        match &self.content {
            None => "-".to_string(),
            Some(c) if c.chars().count() > PREVIEW_LEN => {
                let head: String = c.chars().take(PREVIEW_LEN).collect();
                format!("{}...", head)
            }
            Some(c) => c.clone(),
        }
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "action: {}, target: {}, user: {}",
            self.action,
            self.target,
            self.user.as_deref().unwrap_or("-")
        )?;
        if let Some(grantee) = &self.grantee {
            write!(f, ", grantee: {}", grantee)?;
        }
        write!(f, ", content: {}", self.content_preview().escape_debug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_shape() {
        let entry = JournalEntry::create("/a.txt", "hi", "alice");
        let line = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            line,
            r#"{"action":"create","target":"/a.txt","content":"hi","user":"alice"}"#
        );
    }

    #[test]
    fn test_read_has_null_content() {
        let line = serde_json::to_string(&JournalEntry::read("/a", "bob")).unwrap();
        assert!(line.contains(r#""content":null"#));
    }

    #[test]
    fn test_chmod_keeps_grantee_and_level() {
        let entry = JournalEntry::chmod("/a", "bob", Permission::Read, "admin");
        let line = serde_json::to_string(&entry).unwrap();
        let back: JournalEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.grantee.as_deref(), Some("bob"));
        assert_eq!(back.content.as_deref(), Some("r"));
        assert_eq!(back.action, Action::Chmod);
    }

    #[test]
    fn test_chmod_records_short_token() {
        let entry = JournalEntry::chmod("/a", "bob", Permission::ReadWrite, "admin");
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains(r#""content":"rw""#));
        assert!(!line.contains("readwrite"));
    }

    #[test]
    fn test_record_without_user_loads() {
        let back: JournalEntry =
            serde_json::from_str(r#"{"action":"delete","target":"/x","content":null,"user":null}"#)
                .unwrap();
        assert_eq!(back.action, Action::Delete);
        assert!(back.user.is_none());
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let entry = JournalEntry::write("/a", "abcdefghijklmnopqrstuvwxyz", "alice");
        assert_eq!(entry.content_preview(), "abcdefghijklmnopqrst...");
    }
}
