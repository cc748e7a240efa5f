use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::matching::service::{ServiceSettings, DEFAULT_HISTORY_LIMIT};
use crate::matching::{DEFAULT_SNAPSHOT_KEY, DEFAULT_TOP_N};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let top_n = positive_var("APP_MATCH_TOP_N", DEFAULT_TOP_N)
            .map_err(|value| ConfigError::InvalidTopN { value })?;
        let snapshot_history = positive_var("APP_SNAPSHOT_HISTORY", DEFAULT_HISTORY_LIMIT)
            .map_err(|value| ConfigError::InvalidSnapshotHistory { value })?;

        let snapshot_key = env::var("APP_SNAPSHOT_KEY")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_SNAPSHOT_KEY.to_string());
        if snapshot_key.is_empty() {
            return Err(ConfigError::EmptySnapshotKey);
        }

        let snapshot_dir = env::var("APP_SNAPSHOT_DIR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching: MatchingConfig {
                top_n,
                snapshot_key,
                snapshot_history,
                snapshot_dir,
            },
        })
    }
}

/// Reads a `usize >= 1`, returning the raw value on failure.
fn positive_var(name: &str, default: usize) -> Result<usize, String> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value >= 1 => Ok(value),
            _ => Err(raw),
        },
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Ranking defaults and snapshot persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    pub top_n: usize,
    pub snapshot_key: String,
    pub snapshot_history: usize,
    /// When set, snapshots persist as JSON files under this directory.
    pub snapshot_dir: Option<PathBuf>,
}

impl MatchingConfig {
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            top_n: self.top_n,
            snapshot_key: self.snapshot_key.clone(),
            history_limit: self.snapshot_history,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            snapshot_history: DEFAULT_HISTORY_LIMIT,
            snapshot_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTopN { value: String },
    InvalidSnapshotHistory { value: String },
    EmptySnapshotKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTopN { value } => {
                write!(f, "APP_MATCH_TOP_N must be a positive integer, got '{}'", value)
            }
            ConfigError::InvalidSnapshotHistory { value } => write!(
                f,
                "APP_SNAPSHOT_HISTORY must be a positive integer, got '{}'",
                value
            ),
            ConfigError::EmptySnapshotKey => write!(f, "APP_SNAPSHOT_KEY must not be blank"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTopN { .. }
            | ConfigError::InvalidSnapshotHistory { .. }
            | ConfigError::EmptySnapshotKey => None,
        }
    }
}
