//! Configuration management for the panel server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, a JSON configuration file, or defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use super::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// HTTP listener and URL generation.
    pub http: HttpConfig,

    /// Panel-wide conventions.
    pub panel: PanelConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The name of the server as reported in logs and the health endpoint.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port number to listen on.
    pub port: u16,

    /// Prefix of absolute URLs. Defaults to `http://{host}:{port}`.
    pub base_url: Option<String>,

    /// Enable permissive CORS for every route.
    pub enable_cors: bool,
}

/// Panel conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Default locale of request contexts.
    pub locale: String,

    /// Namespace prepended to model identifiers derived from resource names.
    pub model_namespace: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "filament-panel".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: None,
            enable_cors: false,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            model_namespace: "app::models".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl HttpConfig {
    /// Address to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Prefix for absolute URLs.
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.address()))
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file. Missing keys use defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `PANEL_`.
    /// For example: `PANEL_SERVER_NAME`, `PANEL_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("PANEL_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("PANEL_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(host) = std::env::var("PANEL_HTTP_HOST") {
            config.http.host = host;
        }

        if let Ok(port) = std::env::var("PANEL_HTTP_PORT") {
            match port.parse() {
                Ok(port) => config.http.port = port,
                Err(_) => warn!(
                    "Ignoring invalid PANEL_HTTP_PORT '{}', using {}",
                    port, config.http.port
                ),
            }
        }

        if let Ok(base_url) = std::env::var("PANEL_BASE_URL") {
            config.http.base_url = Some(base_url);
        }

        if let Ok(cors) = std::env::var("PANEL_HTTP_CORS") {
            config.http.enable_cors = cors.parse().unwrap_or(false);
            info!("CORS enabled: {}", config.http.enable_cors);
        }

        if let Ok(locale) = std::env::var("PANEL_LOCALE") {
            config.panel.locale = locale;
        }

        if let Ok(namespace) = std::env::var("PANEL_MODEL_NAMESPACE") {
            config.panel.model_namespace = namespace;
        }

        config
    }
}
