// Catalog persistence behind one contract with a JSON and a CSV backend.
// Every operation reads the whole file and every mutation rewrites it.

use crate::movie::{Catalog, Movie, MovieError};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod csv_store;
pub mod json_store;

pub use csv_store::CsvStore;
pub use json_store::JsonStore;

/// Errors raised by catalog backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV catalog {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Movie not found: {0}")]
    NotFound(String),

    #[error("Movie already exists: {0}")]
    AlreadyExists(String),

    #[error("Movie title must not be empty")]
    InvalidTitle,

    #[error("invalid record {title:?} in {path}: {source}")]
    InvalidRecord {
        path: PathBuf,
        title: String,
        #[source]
        source: MovieError,
    },

    #[error("Invalid movie {title}: {source}")]
    InvalidMovie {
        title: String,
        #[source]
        source: MovieError,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_record(path: &Path, title: &str, source: MovieError) -> Self {
        Self::InvalidRecord {
            path: path.to_path_buf(),
            title: title.to_string(),
            source,
        }
    }
}

/// Reject a catalog that could not be written back and read again unchanged.
/// Backends run this on every catalog they load and before every rewrite.
pub(crate) fn check_catalog(path: &Path, catalog: &Catalog) -> Result<(), StorageError> {
    for (title, movie) in catalog {
        if title.trim().is_empty() {
            return Err(StorageError::invalid_record(path, title, MovieError::EmptyTitle));
        }
        movie
            .validate()
            .map_err(|source| StorageError::invalid_record(path, title, source))?;
    }
    Ok(())
}

/// Available file encodings for the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageKind {
    Json,
    Csv,
}

impl StorageKind {
    /// File used when no explicit catalog path is configured
    pub fn default_file_name(self) -> &'static str {
        match self {
            StorageKind::Json => "movies.json",
            StorageKind::Csv => "movies.csv",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Json => "json",
            StorageKind::Csv => "csv",
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage contract shared by all catalog backends
pub trait CatalogStore {
    /// Path of the backing file
    fn path(&self) -> &Path;

    /// Load the complete catalog. A missing file is an empty catalog.
    fn list_movies(&self) -> Result<Catalog, StorageError>;

    /// Replace the file contents with `catalog`
    fn save_movies(&self, catalog: &Catalog) -> Result<(), StorageError>;

    /// Insert a new title. Titles are trimmed and must be unique; ratings must be on the 0-10 scale.
    fn add_movie(&self, title: &str, movie: Movie) -> Result<(), StorageError> {
        let title = normalize_title(title)?;
        if let Err(source) = movie.validate() {
            return Err(StorageError::InvalidMovie { title, source });
        }
        let mut catalog = self.list_movies()?;
        if catalog.contains_key(&title) {
            return Err(StorageError::AlreadyExists(title));
        }
        catalog.insert(title, movie);
        self.save_movies(&catalog)
    }

    /// Remove a title; the file is untouched when the title is absent
    fn delete_movie(&self, title: &str) -> Result<(), StorageError> {
        let title = normalize_title(title)?;
        let mut catalog = self.list_movies()?;
        if catalog.remove(&title).is_none() {
            return Err(StorageError::NotFound(title));
        }
        self.save_movies(&catalog)
    }

    /// Set the notes of an existing title
    fn update_movie(&self, title: &str, notes: &str) -> Result<(), StorageError> {
        let title = normalize_title(title)?;
        let mut catalog = self.list_movies()?;
        let movie = catalog
            .get_mut(&title)
            .ok_or_else(|| StorageError::NotFound(title.clone()))?;
        let notes = notes.trim();
        movie.notes = (!notes.is_empty()).then(|| notes.to_string());
        self.save_movies(&catalog)
    }
}

fn normalize_title(title: &str) -> Result<String, StorageError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StorageError::InvalidTitle);
    }
    Ok(title.to_string())
}

/// Open the backend for `kind` at `path`
pub fn open_store(kind: StorageKind, path: impl Into<PathBuf>) -> Box<dyn CatalogStore> {
    let path = path.into();
    match kind {
        StorageKind::Json => Box::new(JsonStore::new(path)),
        StorageKind::Csv => Box::new(CsvStore::new(path)),
    }
}
