//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::{jwt::MIN_SECRET_LEN, AuthError, JwtValidator};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP API port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// CORS preflight cache lifetime
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite file name inside the data directory
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Lifetime of tokens minted by the `token` subcommand
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,

    /// Accept tokens signed with the built-in development secret
    #[serde(default)]
    pub dev_mode: bool,
}

// Defaults
fn default_bind_addr() -> String { "0.0.0.0".to_string() }
fn default_http_port() -> u16 { 8080 }
fn default_cors_max_age() -> u64 { 60 * 60 }
fn default_data_dir() -> PathBuf { PathBuf::from("./data") }
fn default_db_file() -> String { "swipe.db".to_string() }
fn default_token_expiry() -> u64 { 3600 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            http_port: default_http_port(),
            cors_max_age_secs: default_cors_max_age(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_file: default_db_file(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiry_secs: default_token_expiry(),
            dev_mode: false,
        }
    }
}

impl Config {
    /// Load from a TOML file, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.db_file)
    }

    /// Reject configurations that would start without usable auth.
    pub fn validate(&self) -> Result<(), AuthError> {
        match (&self.auth.jwt_secret, self.auth.dev_mode) {
            (Some(secret), _) if secret.len() >= MIN_SECRET_LEN => Ok(()),
            (Some(_), false) => Err(AuthError::Config(format!(
                "jwt_secret must be at least {} characters",
                MIN_SECRET_LEN
            ))),
            (None, false) => Err(AuthError::Config(
                "jwt_secret is required unless dev_mode is enabled".into(),
            )),
            (_, true) => Ok(()),
        }
    }

    /// Build the token validator this configuration describes.
    pub fn jwt_validator(&self) -> Result<JwtValidator, AuthError> {
        match &self.auth.jwt_secret {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => {
                JwtValidator::new(secret.clone(), self.auth.token_expiry_secs)
            }
            _ if self.auth.dev_mode => Ok(JwtValidator::new_dev()),
            Some(secret) => JwtValidator::new(secret.clone(), self.auth.token_expiry_secs),
            None => Err(AuthError::Config("jwt_secret is not configured".into())),
        }
    }
}
