use serde::Deserialize;
use std::fs;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATABASE_NAME: &str = "fraud_detection";
pub const DEFAULT_STORAGE_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    pub project_name: String,
    pub database_url: Option<String>,
    pub database_name: String,
    pub storage_timeout_ms: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            project_name: "card-fraud".to_string(),
            database_url: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            storage_timeout_ms: DEFAULT_STORAGE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub common: CommonConfig,
    pub backend: BackendConfig,
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_string(),
            source,
        })?;
        Self::from_yaml(config_path, &contents)
    }

    fn from_yaml(config_path: &str, contents: &str) -> Result<Self, ConfigError> {
        serde_yml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_string(),
            source,
        })
    }

    /// Overlays process environment variables on top of the loaded values.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `PORT`, `HOST`, `DATABASE_URL`, `DATABASE_NAME` and `LOG_LEVEL`
    /// as resolved by `lookup`. Blank values are treated as unset.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = resolve("PORT") {
            self.backend.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port.clone() })?;
        }
        if let Some(host) = resolve("HOST") {
            self.backend.host = host;
        }
        if let Some(level) = resolve("LOG_LEVEL") {
            self.backend.log_level = level;
        }
        if let Some(url) = resolve("DATABASE_URL") {
            self.common.database_url = Some(url);
        }
        if let Some(name) = resolve("DATABASE_NAME") {
            self.common.database_name = name;
        }

        if self
            .common
            .database_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.common.database_url = None;
        }

        tracing::debug!(
            port = self.backend.port,
            database_configured = self.common.database_url.is_some(),
            "Resolved configuration"
        );
        Ok(self)
    }
}
