pub mod acl;
pub mod client;
pub mod config;
pub mod error;
pub mod fs;
pub mod journal;
pub mod protocol;
pub mod server;
pub mod tree;

pub use error::FsError;
pub use fs::FileSystem;
pub use server::Server;
