//! Server configuration

use anyhow::Result;
use std::path::PathBuf;
use tracing::warn;

/// Signing key used by debug builds when `SECRET_KEY` is not set
const DEVELOPMENT_SECRET_KEY: &str = "development-only-secret-key";

/// Longest accepted session lifetime in seconds (10 years)
const MAX_SESSION_EXPIRY: u64 = 315_360_000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// Key used to sign session tokens
    pub secret_key: String,
    /// Session lifetime in seconds (default: 7 days)
    pub session_expiry: u64,
    /// Path of the catalog CSV
    pub catalog_path: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: Listener address (default: "0.0.0.0:5000")
    /// - `SECRET_KEY`: Session signing key (required in release builds)
    /// - `SESSION_EXPIRY`: Session lifetime in seconds (default: 604800, at most 10 years)
    /// - `CATALOG_PATH`: Catalog CSV (default: "static/images_dataset/images.csv")
    /// - `STATIC_DIR`: Static asset directory (default: "static")
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ if cfg!(debug_assertions) => {
                warn!("SECRET_KEY not set, using the development key");
                DEVELOPMENT_SECRET_KEY.to_string()
            }
            _ => anyhow::bail!("SECRET_KEY environment variable not set"),
        };

        let session_expiry = std::env::var("SESSION_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse::<u64>()
            .unwrap_or(604800)
            .min(MAX_SESSION_EXPIRY);

        let catalog_path = std::env::var("CATALOG_PATH")
            .unwrap_or_else(|_| "static/images_dataset/images.csv".to_string())
            .into();

        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();

        Ok(ServerConfig {
            bind_addr,
            secret_key,
            session_expiry,
            catalog_path,
            static_dir,
        })
    }
}
