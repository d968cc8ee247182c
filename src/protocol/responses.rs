//! Reply formatting
//!
//! Reply codes and formatting.

pub const OK: u16 = 200;
pub const STATUS: u16 = 211;
pub const LISTING: u16 = 212;
pub const HELP: u16 = 214;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const TOO_MANY_SESSIONS: u16 = 421;
pub const SYNTAX_ERROR: u16 = 500;

/// Format a single-line reply
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Format a multi-line reply: every body line is sent as `code-line`, the
/// footer as `code footer`.
pub fn format_multiline<S: AsRef<str>>(code: u16, lines: &[S], footer: &str) -> String {
    let mut reply = String::new();
    for line in lines {
        reply.push_str(&format!("{}-{}\r\n", code, line.as_ref()));
    }
    reply.push_str(&format_response(code, footer));
    reply
}
