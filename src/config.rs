//! Application configuration loaded from environment variables.
//!
//! A `.env` file is read first when present, so local development can keep
//! the store selection next to the binary.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Which `UserStore` backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Single JSON document on local disk
    File,
    /// Process memory only (lost on restart)
    Memory,
    /// Google Cloud Firestore (or its emulator)
    Firestore,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            "firestore" => Ok(StoreBackend::Firestore),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Storage backend for user records
    pub store_backend: StoreBackend,
    /// Path of the JSON database (file backend)
    pub db_file: PathBuf,
    /// GCP project ID (Firestore backend)
    pub gcp_project_id: String,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 3000,
            store_backend: StoreBackend::Memory,
            db_file: PathBuf::from("db.json"),
            gcp_project_id: "test-project".to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StoreBackend::File,
        };

        let gcp_project_id = match env::var("GCP_PROJECT_ID") {
            Ok(id) => id,
            Err(_) if store_backend == StoreBackend::Firestore => {
                return Err(ConfigError::Missing("GCP_PROJECT_ID"))
            }
            Err(_) => "local-dev".to_string(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            store_backend,
            db_file: env::var("DB_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("db.json")),
            gcp_project_id,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
