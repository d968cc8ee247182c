//! Configuration management for journal-fs
//!
//! Separates the service's startup settings from the journaling policy the
//! file system itself consumes.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Complete configuration, one table per concern
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub server: StartupConfig,
    pub journal: JournalPolicy,
}

/// Service settings that require a restart to take effect
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StartupConfig {
    /// IP address to bind the command listener
    pub bind_address: String,

    /// Port of the command listener. 0 picks a free port.
    pub control_port: u16,

    /// Maximum sessions served at once
    pub max_sessions: usize,

    /// Maximum length of one command line, in bytes
    pub max_command_length: usize,

    /// The only principal allowed to change file permissions
    pub admin_user: String,

    /// User a new session starts as
    pub default_user: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            control_port: 2121,
            max_sessions: 1,
            max_command_length: 4096,
            admin_user: "admin".to_string(),
            default_user: "admin".to_string(),
        }
    }
}

/// What gets journaled, and where
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JournalPolicy {
    /// Journal file. Without one the journal lives in memory only.
    pub path: Option<PathBuf>,

    /// Record reads for audit. Replay ignores them.
    pub log_reads: bool,

    /// Record explicit directory creation so empty directories survive recovery
    pub log_directories: bool,
}

impl Default for JournalPolicy {
    fn default() -> Self {
        Self {
            path: None,
            log_reads: false,
            log_directories: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Packaged layout first, then the working directory
        let config_paths = ["journal-fs/config", "config"];

        let mut builder = Config::builder();
        for config_path in config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("JOURNAL_FS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.max_sessions == 0 {
            return Err(config::ConfigError::Message(
                "max_sessions must be greater than 0".into(),
            ));
        }

        if self.server.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.server.admin_user.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "admin_user cannot be empty".into(),
            ));
        }

        if self.server.default_user.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "default_user cannot be empty".into(),
            ));
        }

        if let Some(path) = &self.journal.path {
            if path.as_os_str().is_empty() {
                return Err(config::ConfigError::Message(
                    "journal path cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Bind address and control port as a socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }
}
