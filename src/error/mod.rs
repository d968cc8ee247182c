//! Error handling
//!
//! Defines the error type shared by the tree, journal and façade, and the
//! mapping from errors to protocol reply codes.

pub mod handlers;
pub mod types;

pub use types::*;
