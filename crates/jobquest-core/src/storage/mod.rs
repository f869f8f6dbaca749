mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, MilestonesConfig};
pub use database::{Database, Store, DEFAULT_USER};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/jobquest[-dev]/` based on JOBQUEST_ENV.
///
/// Set JOBQUEST_ENV=dev to use the development data directory, and
/// JOBQUEST_HOME to replace `~/.config` as the base.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = match std::env::var_os("JOBQUEST_HOME") {
        Some(home) => PathBuf::from(home),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config"),
    };

    let env = std::env::var("JOBQUEST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("jobquest-dev")
    } else {
        base_dir.join("jobquest")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
