//! Permission levels and per-file ACLs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FsError;

/// Access level a user holds on a single file.
///
/// A user without an ACL entry is treated as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    None,
    Read,
    Write,
    ReadWrite,
}

impl Permission {
    /// Whether this level allows reading file content.
    pub fn can_read(self) -> bool {
        matches!(self, Permission::Read | Permission::ReadWrite)
    }

    /// Whether this level allows write, append and delete.
    pub fn can_write(self) -> bool {
        matches!(self, Permission::Write | Permission::ReadWrite)
    }

    /// Short token used on the wire and in the journal.
    pub fn as_token(self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Read => "r",
            Permission::Write => "w",
            Permission::ReadWrite => "rw",
        }
    }
}

impl FromStr for Permission {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Permission::None),
            "r" => Ok(Permission::Read),
            "w" => Ok(Permission::Write),
            "rw" => Ok(Permission::ReadWrite),
            other => Err(FsError::InvalidPermission(other.to_string())),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Access list of a single file. Ordered by user name so listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acl {
    entries: BTreeMap<String, Permission>,
}

impl Acl {
    pub fn new() -> Self {
        Self::default()
    }

    /// ACL granting `owner` read and write, as every new file gets.
    pub fn owned_by(owner: &str) -> Self {
        let mut acl = Self::new();
        acl.set(owner, Permission::ReadWrite);
        acl
    }

    pub fn set(&mut self, user: &str, permission: Permission) {
        self.entries.insert(user.to_string(), permission);
    }

    pub fn get(&self, user: &str) -> Permission {
        self.entries.get(user).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Permission)> {
        self.entries.iter().map(|(user, level)| (user.as_str(), *level))
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (user, level) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", user, level)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_none() {
        let acl = Acl::new();
        assert_eq!(acl.get("bob"), Permission::None);
        assert!(!acl.get("bob").can_read());
        assert!(!acl.get("bob").can_write());
    }

    #[test]
    fn test_owner_gets_read_write() {
        let acl = Acl::owned_by("alice");
        assert_eq!(acl.get("alice"), Permission::ReadWrite);
        assert_eq!(acl.to_string(), "alice:rw");
    }

    #[test]
    fn test_levels_gate_read_and_write() {
        assert!(Permission::Read.can_read());
        assert!(!Permission::Read.can_write());
        assert!(Permission::Write.can_write());
        assert!(!Permission::Write.can_read());
        assert!(Permission::ReadWrite.can_read() && Permission::ReadWrite.can_write());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = "rwx".parse::<Permission>().unwrap_err();
        assert!(matches!(err, FsError::InvalidPermission(ref s) if s == "rwx"));
    }

    #[test]
    fn test_parse_tokens() {
        for token in ["none", "r", "w", "rw"] {
            let level: Permission = token.parse().unwrap();
            assert_eq!(level.as_token(), token);
        }
        assert!("RW".parse::<Permission>().is_err());
    }
}
