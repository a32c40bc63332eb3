use crate::composer::payload::{DEFAULT_OFFER_LINK, DEFAULT_SMARTPHONE_LINK};
use crate::model::{ComposeRequest, ConfigError};
use crate::resolver::DEFAULT_QUERY_LIMIT;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    /// `None` runs on the local catalog only.
    pub qdrant_url: Option<String>,
    pub qdrant_api_key: Option<String>,
    pub qdrant_offres_collection: String,
    pub qdrant_smartphones_collection: String,
    pub vector_timeout_ms: u64,
    pub vector_limit: usize,
    pub default_offer_link: String,
    pub default_smartphone_link: String,
    /// Batch composed by the binary on startup.
    pub requests: Vec<ComposeRequest>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("segmentationRAG/data"),
            qdrant_url: Some("http://localhost:6333".to_string()),
            qdrant_api_key: None,
            qdrant_offres_collection: "offres".to_string(),
            qdrant_smartphones_collection: "smartphones".to_string(),
            vector_timeout_ms: 2000,
            vector_limit: DEFAULT_QUERY_LIMIT,
            default_offer_link: DEFAULT_OFFER_LINK.to_string(),
            default_smartphone_link: DEFAULT_SMARTPHONE_LINK.to_string(),
            requests: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Environment overrides: env > file > defaults. An empty `QDRANT_URL`
    /// disables the vector backend.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("CATALOG_PATH") {
            self.catalog_path = PathBuf::from(v);
        }
        if let Some(v) = env("QDRANT_URL") {
            self.qdrant_url = Some(v).filter(|u| !u.trim().is_empty());
        }
        if let Some(v) = env("QDRANT_API_KEY") {
            self.qdrant_api_key = Some(v).filter(|k| !k.is_empty());
        }
        if let Some(v) = env("QDRANT_OFFRES_COLLECTION") {
            self.qdrant_offres_collection = v;
        }
        if let Some(v) = env("QDRANT_SMARTPHONES_COLLECTION") {
            self.qdrant_smartphones_collection = v;
        }
    }
}

/// Reads a JSON config; a missing file falls back to defaults. Process
/// environment overrides are applied on top.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => {
            info!("Loading config from {}", path);
            serde_json::from_str::<AppConfig>(&content)?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No config at {}, using defaults", path);
            AppConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_string(),
                source,
            });
        }
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
