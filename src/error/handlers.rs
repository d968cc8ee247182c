//! Error handlers
//!
//! Maps errors to reply codes of the command protocol.

use crate::error::types::FsError;
use log::error;

/// Log an error that could not be attributed to a single command.
pub fn handle_error(err: &FsError) {
    error!("journal-fs error: {}", err);
}

/// Convert an error to its protocol reply code
pub fn error_to_status_code(err: &FsError) -> u16 {
    match err {
        FsError::NotFound(_) => 550,
        FsError::AlreadyExists(_) => 553,
        FsError::PermissionDenied { .. } => 530,
        FsError::InvalidAdmin(_) => 530,
        FsError::InvalidPermission(_) => 501,
        FsError::InvalidPath(_) => 501,
        FsError::JournalUnavailable(_) => 451,
        FsError::MalformedEntry(_) => 451,
        FsError::Io(_) => 451,
        FsError::Codec { .. } => 451,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_by_kind() {
        assert_eq!(error_to_status_code(&FsError::NotFound("/a".into())), 550);
        assert_eq!(error_to_status_code(&FsError::denied("bob", "/a")), 530);
        assert_eq!(
            error_to_status_code(&FsError::InvalidPermission("x".into())),
            501
        );
        assert_eq!(
            error_to_status_code(&FsError::JournalUnavailable("j".into())),
            451
        );
    }
}
