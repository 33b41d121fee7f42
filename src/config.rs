//! Configuration management for the flipbook server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL clients reach this server on. Used to build share links and
    /// static page URLs for the local backend.
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the local backend, also served at `/uploads`.
    pub uploads_dir: PathBuf,
    pub s3: Option<S3Config>,
}

/// Which page store implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Lifetime of the presigned page URLs handed to clients.
    pub url_expiry_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                public_url: "http://localhost:8000".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                uploads_dir: PathBuf::from("./uploads"),
                s3: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// S3 credentials are optional: when they are incomplete the server runs
    /// against the local backend instead of rejecting uploads.
    pub fn from_env() -> Self {
        let s3 = S3Config::from_env();
        let requested = env::var("STORAGE_BACKEND").ok();
        let backend = select_backend(requested.as_deref(), s3.is_some());

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8000),
                public_url: env::var("PUBLIC_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            },
            storage: StorageConfig {
                backend,
                uploads_dir: env::var("UPLOADS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./uploads")),
                s3,
            },
        }
    }
}

impl S3Config {
    /// Read the S3 settings, returning `None` unless every required
    /// credential is present.
    fn from_env() -> Option<Self> {
        Some(S3Config {
            endpoint: env::var("S3_ENDPOINT").ok()?,
            bucket: env::var("S3_BUCKET").ok()?,
            access_key: env::var("S3_ACCESS_KEY").ok()?,
            secret_key: env::var("S3_SECRET_KEY").ok()?,
            region: env::var("S3_REGION").ok(),
            url_expiry_secs: env::var("S3_URL_EXPIRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        })
    }
}

/// Resolve the backend to run, falling back to local storage whenever the
/// S3 credentials cannot back the request.
fn select_backend(requested: Option<&str>, has_s3: bool) -> StorageBackend {
    match requested {
        Some("s3") if has_s3 => StorageBackend::S3,
        Some("s3") => {
            tracing::warn!(
                "STORAGE_BACKEND=s3 but S3 credentials are incomplete, using local storage"
            );
            StorageBackend::Local
        }
        Some("local") => StorageBackend::Local,
        Some(other) => {
            tracing::warn!("Unknown STORAGE_BACKEND '{}', using local storage", other);
            StorageBackend::Local
        }
        None if has_s3 => StorageBackend::S3,
        None => StorageBackend::Local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_local_storage() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert!(config.storage.s3.is_none());
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn backend_selection_prefers_s3_when_credentials_exist() {
        assert_eq!(select_backend(None, true), StorageBackend::S3);
        assert_eq!(select_backend(Some("s3"), true), StorageBackend::S3);
    }

    #[test]
    fn backend_selection_falls_back_without_credentials() {
        assert_eq!(select_backend(None, false), StorageBackend::Local);
        assert_eq!(select_backend(Some("s3"), false), StorageBackend::Local);
    }

    #[test]
    fn explicit_local_wins_over_credentials() {
        assert_eq!(select_backend(Some("local"), true), StorageBackend::Local);
    }

    #[test]
    fn unknown_backend_name_falls_back_to_local() {
        assert_eq!(select_backend(Some("gcs"), true), StorageBackend::Local);
    }
}
