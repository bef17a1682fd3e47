// Runtime configuration assembled from CLI arguments and the environment

use crate::metadata::OmdbConfig;
use crate::site::SiteConfig;
use crate::storage::StorageKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageKind,
    /// Explicit catalog file; falls back to the backend's default file name
    pub catalog_file: Option<PathBuf>,
    pub site: SiteConfig,
    pub omdb: OmdbConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::Json,
            catalog_file: None,
            site: SiteConfig::default(),
            omdb: OmdbConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.storage.default_file_name()))
    }
}
