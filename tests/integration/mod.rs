// Integration test utilities and common code

#![allow(dead_code)]

use movie_catalog::{open_store, CatalogStore, Movie, StorageKind};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixture catalog. Ratings sum to 41.4: mean 6.9, median 8.4
pub const SAMPLE_MOVIES: &[(&str, &str, f64)] = &[
    ("The Godfather", "1972", 9.2),
    ("Inception", "2010", 8.8),
    ("Alien", "1979", 8.5),
    ("Heat", "1995", 8.3),
    ("Batman & Robin", "1997", 3.8),
    ("Cats", "2019", 2.8),
];

pub const TEMPLATE: &str = r#"<html>
<head><title>__TEMPLATE_TITLE__</title></head>
<body>
<!-- header -->
<ol class="movie-grid">__TEMPLATE_MOVIE_GRID__</ol>
</body>
</html>
"#;

/// Temporary workspace holding a catalog file and a site template
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    pub fn catalog_path(&self, kind: StorageKind) -> PathBuf {
        self.root_path.join(kind.default_file_name())
    }

    pub fn store(&self, kind: StorageKind) -> Box<dyn CatalogStore> {
        open_store(kind, self.catalog_path(kind))
    }

    /// Store preloaded with [`SAMPLE_MOVIES`]
    pub fn sample_store(&self, kind: StorageKind) -> Box<dyn CatalogStore> {
        let store = self.store(kind);
        for (title, year, rating) in SAMPLE_MOVIES {
            let poster = format!("http://posters.test/{}.jpg", title.to_lowercase().replace(' ', "_"));
            store
                .add_movie(title, Movie::new(*year, *rating, Some(poster)))
                .expect("Failed to seed catalog");
        }
        store
    }

    pub fn write_template(&self) -> PathBuf {
        self.write_file("_static/index_template.html", TEMPLATE)
    }

    pub fn write_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }
}
