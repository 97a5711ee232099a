//! Environment-provided settings.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use zepp_store::StoreConfig;

/// Service settings, read once at startup.
///
/// Every field maps to an upper-cased environment variable (`TITLE`,
/// `MONGO_URI`, ...). `title`, `description` and `version` are metadata
/// surfaced by the health endpoint and have no behavioral effect.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub title: String,
    pub description: String,
    pub version: String,
    /// Optional route prefix when running behind a proxy.
    pub proxy: Option<String>,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub bind_addr: String,
    /// Directory holding the OCR model files; absent disables the OCR
    /// endpoint.
    pub ocr_model_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Zepp NLP Engine".to_string(),
            description: "Extracts coupon details from text".to_string(),
            version: "1.0.0".to_string(),
            proxy: None,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_database: "Zepp".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            ocr_model_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            uri: self.mongo_uri.clone(),
            database: self.mongo_database.clone(),
        }
    }

    /// Route prefix, normalized: empty or missing means none.
    pub fn route_prefix(&self) -> Option<&str> {
        self.proxy.as_deref().filter(|p| !p.is_empty())
    }
}
