use super::{check_catalog, CatalogStore, StorageError};
use crate::movie::{Catalog, StoredMovie};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Catalog stored as a single JSON object keyed by title
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogStore for JsonStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn list_movies(&self) -> Result<Catalog, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Catalog {} does not exist yet, starting empty", self.path.display());
                return Ok(Catalog::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        // An empty file is treated like a fresh catalog
        if content.trim().is_empty() {
            return Ok(Catalog::new());
        }

        let records: BTreeMap<String, StoredMovie> =
            serde_json::from_str(&content).map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })?;

        let mut catalog = Catalog::new();
        for (title, record) in records {
            let movie = record
                .into_movie()
                .map_err(|source| StorageError::invalid_record(&self.path, &title, source))?;
            catalog.insert(title, movie);
        }
        check_catalog(&self.path, &catalog)?;
        debug!("Loaded {} movies from {}", catalog.len(), self.path.display());
        Ok(catalog)
    }

    fn save_movies(&self, catalog: &Catalog) -> Result<(), StorageError> {
        check_catalog(&self.path, catalog)?;
        let content = serde_json::to_string_pretty(catalog).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        fs::write(&self.path, content).map_err(|e| StorageError::io(&self.path, e))?;
        info!("Wrote {} movies to {}", catalog.len(), self.path.display());
        Ok(())
    }
}
