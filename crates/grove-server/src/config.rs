//! Grove Server Configuration
//!
//! Server configuration: binding, CORS, API keys, seed data, and the record
//! query settings. Values layer as defaults, then an optional TOML file, then
//! `GROVE_*` environment variables, then command-line flags.
//!
//! @version 0.1.0
//! @author Grove Development Team

use grove_common::{GroveError, RecordsConfig, Result, ScanScope};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

// =============================================================================
// Server Configuration
// =============================================================================

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Accepted `x-api-key` values. Empty disables the check.
    pub api_keys: Vec<String>,
    /// JSON file of `{"<document path>": {fields}}` loaded at startup.
    pub seed_file: Option<String>,
    pub records: RecordsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: true,
            api_keys: Vec::new(),
            seed_file: None,
            records: RecordsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the specified host and port.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw).map_err(|e| match e {
            GroveError::Configuration(msg) => {
                GroveError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| GroveError::Configuration(e.to_string()))
    }

    /// Override fields from `GROVE_*` environment variables.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = var("GROVE_HOST") {
            self.host = host;
        }
        if let Some(port) = var("GROVE_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(cors) = var("GROVE_ENABLE_CORS") {
            self.enable_cors = matches!(cors.trim(), "1" | "true");
        }
        if let Some(keys) = var("GROVE_API_KEYS") {
            self.api_keys = split_list(&keys);
        }
        if let Some(seed) = var("GROVE_SEED_FILE") {
            self.seed_file = Some(seed);
        }
        if let Some(collection) = var("GROVE_RECORDS_COLLECTION") {
            self.records.collection = collection;
        }
        if let Some(base) = var("GROVE_RECORDS_BASE_PATH") {
            self.records.base_path = base;
        }
        if let Some(scope) = var("GROVE_RECORDS_SCOPE").and_then(|s| ScanScope::parse(&s)) {
            self.records.default_scope = scope;
        }
        self
    }

    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], self.port)))
    }

    pub fn with_api_keys(mut self, keys: Vec<String>) -> Self {
        self.api_keys = keys;
        self
    }

    pub fn with_records(mut self, records: RecordsConfig) -> Self {
        self.records = records;
        self
    }
}

/// Split a comma-separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
