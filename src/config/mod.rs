//! Configuration Module
//!
//! Centralized configuration management for the blog service: server,
//! database, token, federated-login, and upload settings, all sourced from
//! the environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::service::upload::{DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_BYTES};

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as usize with default
    pub fn get_usize(key: &str, default: usize) -> usize {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseSettings,

    /// Bearer-token configuration
    pub jwt: JwtConfig,

    /// Federated Google login; absent when no client id is configured
    pub google: Option<GoogleConfig>,

    /// Upload relay configuration
    pub upload: UploadSettings,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
}

/// Bearer-token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_days: i64,
}

/// Google federated-login configuration
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
}

/// Upload relay configuration
///
/// One size limit, applied in one place. When `blob_endpoint` is set the
/// relay forwards to the remote store; otherwise files land under `dir` and
/// are served from `public_base_url`.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub public_base_url: String,
    pub blob_endpoint: Option<String>,
    pub blob_access_key: Option<String>,
    pub max_file_bytes: usize,
    pub max_files: usize,
    pub timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        Ok(Self {
            server: ServerConfig {
                host: env::get_string("SERVER_HOST", "0.0.0.0"),
                port: env::get_u16("SERVER_PORT", 3001),
            },
            database: DatabaseSettings {
                url: database_url,
                max_connections: env::get_u32("DB_MAX_CONNECTIONS", 20),
                min_connections: env::get_u32("DB_MIN_CONNECTIONS", 1),
                connect_timeout_seconds: env::get_u64("DB_CONNECT_TIMEOUT", 30),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expires_days: env::get_i64("JWT_EXPIRES_DAYS", 30),
            },
            google: std::env::var("GOOGLE_CLIENT_ID")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|client_id| GoogleConfig { client_id }),
            upload: UploadSettings {
                dir: PathBuf::from(env::get_string("UPLOAD_DIR", "uploads")),
                public_base_url: env::get_string("UPLOAD_BASE_URL", "/uploads"),
                blob_endpoint: std::env::var("BLOB_ENDPOINT").ok().filter(|v| !v.is_empty()),
                blob_access_key: std::env::var("BLOB_ACCESS_KEY").ok().filter(|v| !v.is_empty()),
                max_file_bytes: env::get_usize("UPLOAD_MAX_FILE_BYTES", DEFAULT_MAX_FILE_BYTES),
                max_files: env::get_usize("UPLOAD_MAX_FILES", DEFAULT_MAX_FILES),
                timeout_seconds: env::get_u64("UPLOAD_TIMEOUT_SECS", 15),
            },
        })
    }

    /// Sanity-check the loaded configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET must not be blank".into()));
        }
        if self.jwt.expires_days <= 0 {
            return Err(ConfigError::Invalid(
                "JWT_EXPIRES_DAYS must be positive".into(),
            ));
        }
        if self.upload.max_files == 0 {
            return Err(ConfigError::Invalid(
                "UPLOAD_MAX_FILES must be at least 1".into(),
            ));
        }
        if self.upload.max_file_bytes == 0 {
            return Err(ConfigError::Invalid(
                "UPLOAD_MAX_FILE_BYTES must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3001,
            },
            database: DatabaseSettings {
                url: "postgresql://localhost/blog".into(),
                max_connections: 20,
                min_connections: 1,
                connect_timeout_seconds: 30,
            },
            jwt: JwtConfig {
                secret: "test_secret".into(),
                expires_days: 30,
            },
            google: None,
            upload: UploadSettings {
                dir: PathBuf::from("uploads"),
                public_base_url: "/uploads".into(),
                blob_endpoint: None,
                blob_access_key: None,
                max_file_bytes: DEFAULT_MAX_FILE_BYTES,
                max_files: DEFAULT_MAX_FILES,
                timeout_seconds: 15,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_blank_secret_rejected() {
        let mut config = test_config();
        config.jwt.secret = "   ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_upload_limits_rejected() {
        let mut config = test_config();
        config.upload.max_files = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.upload.max_file_bytes = 0;
        assert!(config.validate().is_err());
    }
}
