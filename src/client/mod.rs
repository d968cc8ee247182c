//! Client sessions
//!
//! Per-connection state and the loop that serves one connection.

pub mod handler;
pub mod state;

pub use handler::handle_client;
pub use state::Session;
