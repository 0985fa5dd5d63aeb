//! Configuration management for revu.
//!
//! Parses `revu.toml` configuration files with serde. Every section is
//! optional; CLI flags override loaded values.
//!
//! ```toml
//! [render]
//! include_timestamp = false
//!
//! [s3]
//! region = "eu-west-1"
//! endpoint = "http://localhost:9000"
//!
//! [gcs]
//! enabled = false
//!
//! [sign]
//! expiry_secs = 600
//! ```

use std::path::Path;

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "revu.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report rendering configuration.
    pub render: RenderConfig,
    /// GCS backend configuration.
    pub gcs: GcsConfig,
    /// S3 backend configuration.
    pub s3: S3Config,
    /// Signed URL configuration.
    pub sign: SignConfig,
}

/// Report rendering configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Include the review timestamp in the report summary.
    pub include_timestamp: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_timestamp: true,
        }
    }
}

/// GCS backend configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GcsConfig {
    /// Register the GCS backend for `gs://` destinations.
    pub enabled: bool,
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// S3 backend configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// Register the S3 backend for `s3://` destinations.
    pub enabled: bool,
    /// AWS region.
    pub region: String,
    /// S3-compatible endpoint URL (MinIO, LocalStack).
    pub endpoint: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            enabled: true,
            region: "us-east-1".to_owned(),
            endpoint: None,
        }
    }
}

/// Signed URL configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SignConfig {
    /// Lifetime of signed read URLs, in seconds.
    pub expiry_secs: u64,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self { expiry_secs: 3600 }
    }
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from an explicit path, from `./revu.toml` when present, or fall
    /// back to defaults.
    ///
    /// An explicit path must exist; the implicit one is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let implicit = Path::new(CONFIG_FILENAME);
        if implicit.exists() {
            return Self::load(implicit);
        }
        Ok(Self::default())
    }
}
