pub mod app;
pub mod config;
pub mod histogram;
pub mod metadata;
pub mod movie;
pub mod search;
pub mod site;
pub mod statistics;
pub mod storage;

// Re-export main types for convenient access
pub use app::MovieApp;
pub use config::AppConfig;
pub use movie::{Catalog, Movie, MovieError, RATING_RANGE};

// Re-export storage contract and backends
pub use storage::{open_store, CatalogStore, CsvStore, JsonStore, StorageError, StorageKind};

// Re-export analysis and rendering entry points
pub use search::{partial_ratio, search_movies, SearchMatch, MATCH_THRESHOLD};
pub use site::{generate_website, SiteConfig};
pub use statistics::CatalogStats;
