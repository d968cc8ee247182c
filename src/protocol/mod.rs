//! Command protocol
//!
//! Line-oriented text commands over the file system façade: parsing,
//! dispatch, and reply formatting.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
