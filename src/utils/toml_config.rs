//! TOML-based configuration for Jobly
//!
//! The server reads `jobly.toml` once at startup. Secrets are never written
//! into the file; it names the environment variables that hold them.
//! Values are immutable for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from jobly.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoblyConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the token signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Token lifetime in seconds; 0 issues tokens that never expire
    #[serde(default = "default_token_expiry_secs")]
    pub token_expiry_secs: i64,

    /// Argon2id time cost for password digests
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_token_expiry_secs() -> i64 {
    86400
}

fn default_hash_cost() -> u32 {
    4
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_expiry_secs: default_token_expiry_secs(),
            hash_cost: default_hash_cost(),
        }
    }
}

impl AuthConfig {
    /// Token lifetime handed to the token codec.
    pub fn token_expiry(&self) -> Option<i64> {
        (self.token_expiry_secs > 0).then_some(self.token_expiry_secs)
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/jobly.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl JoblyConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: JoblyConfig = toml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }

        if !matches!(self.server.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "server.log_format must be 'pretty' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        if self.auth.hash_cost == 0 {
            return Err(ConfigError::ValidationError(
                "auth.hash_cost must be at least 1".to_string(),
            ));
        }

        if self.auth.token_expiry_secs < 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_expiry_secs must not be negative".to_string(),
            ));
        }

        if self.database.turso_url_env.is_some() != self.database.turso_token_env.is_some() {
            return Err(ConfigError::ValidationError(
                "database.turso_url_env and database.turso_token_env must be set together"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Get the token signing secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// Remote Turso URL and token, when configured.
    pub fn turso_remote(&self) -> Result<Option<(String, String)>, ConfigError> {
        let (Some(url_env), Some(token_env)) =
            (&self.database.turso_url_env, &self.database.turso_token_env)
        else {
            return Ok(None);
        };

        let url = self
            .resolve_env(url_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(url_env.clone()))?;
        let token = self
            .resolve_env(token_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(token_env.clone()))?;

        Ok(Some((url, token)))
    }
}
