//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use taskdeck_core::error::{Result, TaskdeckError};

pub use schema::{AppConfig, DatabaseSection, MetricsSection, ServerSection, UnmatchedRoute};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "TASKDECK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "taskdeck.yaml";

/// Env var holding the database connection string; wins over `database.url`.
pub const DB_URL_ENV: &str = "TASKDECK_DB_URL";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TaskdeckError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    if Path::new(path).exists() {
        return load_from_file(path);
    }
    tracing::info!(path, "config file not found; using defaults");
    let cfg = AppConfig::default();
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| TaskdeckError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Connection string for the store bootstrap.
pub fn database_url(cfg: &AppConfig) -> String {
    std::env::var(DB_URL_ENV).unwrap_or_else(|_| cfg.database.url.clone())
}
