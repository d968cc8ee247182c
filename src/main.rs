//! journal-fs - Entry Point
//!
//! A journaled in-memory file store with per-file access control, served
//! over a line-oriented TCP protocol.

use log::{error, info};
use std::process::ExitCode;

use journal_fs::config::ServerConfig;
use journal_fs::error::handlers::handle_error;
use journal_fs::{FileSystem, Server};

#[tokio::main]
async fn main() -> ExitCode {
    // env_logger picks up the RUST_LOG environment variable
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Opening file system...");
    let fs = match FileSystem::open(config.journal.clone(), &config.server.admin_user) {
        Ok(fs) => fs,
        Err(e) => {
            handle_error(&e);
            return ExitCode::FAILURE;
        }
    };

    match Server::bind(config.server, fs).await {
        Ok(server) => {
            server.run().await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
