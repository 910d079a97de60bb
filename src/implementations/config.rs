use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted when no config file names a service URL
pub const SERVICE_URL_ENV: &str = "TAXON_SERVICE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid service URL: {0}")]
    InvalidServiceUrl(String),
}

/// Configuration for the HTTP knowledge gateway
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base URL of the knowledge service
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Bearer token, if the deployment requires one
    pub auth_token: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: GatewayConfig = serde_yaml::from_str(&contents)?;
        config.validated()
    }

    /// Resolve configuration: an explicit file wins, then the
    /// `TAXON_SERVICE_URL` environment variable, then the default local
    /// deployment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            info!("Loading gateway config from {}", path.display());
            return Self::from_file(path);
        }
        match std::env::var(SERVICE_URL_ENV) {
            Ok(url) => {
                info!("Using service URL from {}", SERVICE_URL_ENV);
                GatewayConfig {
                    base_url: url,
                    ..Default::default()
                }
                .validated()
            }
            Err(_) => {
                debug!(
                    "{} not set, using default service URL {}",
                    SERVICE_URL_ENV, DEFAULT_BASE_URL
                );
                Ok(GatewayConfig::default())
            }
        }
    }

    /// Reject URLs the gateway cannot work with
    pub fn validated(self) -> Result<Self, ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidServiceUrl(
                "service URL must not be empty".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidServiceUrl(format!(
                "'{}' is not an http(s) URL",
                url
            )));
        }
        Ok(GatewayConfig {
            base_url: url.trim_end_matches('/').to_string(),
            ..self
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Default configuration: the local development deployment
impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            auth_token: None,
        }
    }
}
