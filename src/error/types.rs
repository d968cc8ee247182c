//! Error types
//!
//! Every failure a file system operation can report. All of them are
//! recoverable: the façade returns them as values and the command layer turns
//! them into status replies.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied for user '{user}' on {path}")]
    PermissionDenied { user: String, path: String },

    #[error("Invalid permission '{0}'. Use 'rw', 'r', 'w' or 'none'")]
    InvalidPermission(String),

    #[error("User '{0}' is not allowed to change permissions")]
    InvalidAdmin(String),

    #[error("Journal store unavailable: {0}")]
    JournalUnavailable(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Malformed journal entry: {0}")]
    MalformedEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed journal record on line {line}: {source}")]
    Codec {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl FsError {
    pub(crate) fn denied(user: &str, path: &str) -> Self {
        FsError::PermissionDenied {
            user: user.to_string(),
            path: path.to_string(),
        }
    }
}
