use std::net::SocketAddr;

use serde::Deserialize;
use taskdeck_core::error::{Result, TaskdeckError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            database: DatabaseSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TaskdeckError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// How long `/readyz` reports draining before the listener stops.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.shutdown_grace_ms > 60_000 {
            return Err(TaskdeckError::BadRequest(
                "server.shutdown_grace_ms must be between 0 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            TaskdeckError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3500".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self { url: default_database_url() }
    }
}

fn default_database_url() -> String {
    "memory://".into()
}

/// Route label for requests that matched no route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedRoute {
    /// Collapse into a single `unmatched` label.
    #[default]
    Fixed,
    /// Use the raw request path (unbounded cardinality).
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Append process metrics (start time, uptime, memory, fds).
    #[serde(default = "default_true")]
    pub default_metrics: bool,

    #[serde(default)]
    pub unmatched_route: UnmatchedRoute,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            default_metrics: true,
            unmatched_route: UnmatchedRoute::default(),
        }
    }
}

const RESERVED_PATHS: [&str; 3] = ["/", "/healthz", "/readyz"];

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(TaskdeckError::BadRequest("metrics.path must start with '/'".into()));
        }
        if self.path.contains([':', '*', '{', '}']) {
            return Err(TaskdeckError::BadRequest(
                "metrics.path must be a static path".into(),
            ));
        }
        if RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(TaskdeckError::BadRequest(format!(
                "metrics.path collides with a built-in route: {}",
                self.path
            )));
        }
        Ok(())
    }
}

fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_true() -> bool {
    true
}
