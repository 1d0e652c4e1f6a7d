use std::time::Duration;

use thiserror::Error;

use crate::storage::models::Category;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub storage: StorageConfig,
    /// Categories inserted at start-up when their id is not yet present.
    pub seed_categories: Vec<Category>,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
    /// Maximum photo upload size in bytes
    pub max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
    /// Externally visible base URL, used for locally stored photo addresses.
    pub public_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Gcs,
    Local,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for local storage backend
    pub local_storage_path: String,
    /// GCS bucket name (required when backend is gcs)
    pub gcs_bucket: Option<String>,
    /// Path to GCS service account JSON (optional, defaults to ADC)
    pub gcs_credentials_file: Option<String>,
    /// Per-request timeout for the GCS backend
    pub gcs_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: "./photos".to_string(),
            gcs_bucket: None,
            gcs_credentials_file: None,
            gcs_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = NodeConfig::default();
        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let data_dir = std::env::var("DATA_DIR").unwrap_or(defaults.data_dir);
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url);

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10 * 1024 * 1024); // 10MB

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "gcs" => StorageBackend::Gcs,
            _ => StorageBackend::Local,
        };

        let local_storage_path =
            std::env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./photos".to_string());

        let gcs_bucket = std::env::var("GCS_BUCKET").ok();
        let gcs_credentials_file = std::env::var("GCS_CREDENTIALS_FILE").ok();
        let gcs_timeout = std::env::var("GCS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let seed_categories = std::env::var("SEED_CATEGORIES")
            .map(|raw| parse_seed_categories(&raw))
            .unwrap_or_default();

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
                public_base_url,
            },
            storage: StorageConfig {
                backend: storage_backend,
                local_storage_path,
                gcs_bucket,
                gcs_credentials_file,
                gcs_timeout,
            },
            seed_categories,
            test_mode,
            max_upload_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::Gcs && self.storage.gcs_bucket.is_none() {
            return Err(ConfigError::ValidationError(
                "GCS_BUCKET is required when STORAGE_BACKEND=gcs".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::Local
            && !(self.node.public_base_url.starts_with("http://")
                || self.node.public_base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(
                "PUBLIC_BASE_URL must be an http(s) URL".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse `id:name` or bare `name` entries separated by commas. Bare names get
/// a lowercase, dash-separated id.
pub fn parse_seed_categories(raw: &str) -> Vec<Category> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (id, name) = match entry.split_once(':') {
                Some((id, name)) => (id.trim().to_string(), name.trim().to_string()),
                None => (
                    entry
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join("-")
                        .to_lowercase(),
                    entry.to_string(),
                ),
            };
            (!id.is_empty() && !name.is_empty()).then_some(Category { id, name })
        })
        .collect()
}
