//! Server core functionality
//!
//! Exposes one shared file system over a line-oriented TCP protocol.

pub mod core;

pub use self::core::Server;
