//! Access control
//!
//! Per-file access lists mapping a user name to one of four permission levels.

pub mod permission;

pub use permission::{Acl, Permission};
