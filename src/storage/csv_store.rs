use super::{check_catalog, CatalogStore, StorageError};
use crate::movie::{Catalog, Movie, MovieError, StoredMovie};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One line of the CSV catalog. Column order: title,rating,year,poster_url,notes
#[derive(Deserialize, Debug)]
struct CsvRow {
    title: String,
    // Short rows leave these empty; an empty rating is then rejected like any other bad value
    #[serde(default)]
    rating: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    poster_url: String,
    // Files written before notes were persisted have no such column
    #[serde(default)]
    notes: String,
}

impl CsvRow {
    fn from_movie(title: &str, movie: &Movie) -> Self {
        Self {
            title: title.to_string(),
            rating: movie.rating.to_string(),
            year: movie.year.clone(),
            poster_url: movie.poster_or_empty().to_string(),
            notes: movie.notes.clone().unwrap_or_default(),
        }
    }

    fn is_blank(&self) -> bool {
        [&self.title, &self.rating, &self.year, &self.poster_url, &self.notes]
            .iter()
            .all(|field| field.is_empty())
    }

    fn into_movie(self) -> Result<Movie, MovieError> {
        StoredMovie {
            year: self.year,
            rating: self.rating,
            poster_url: non_empty(self.poster_url),
            notes: non_empty(self.notes),
        }
        .into_movie()
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Catalog stored as a flat CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl CatalogStore for CsvStore {
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

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut catalog = Catalog::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record.map_err(|e| self.csv_error(e))?;
            if row.is_blank() {
                continue;
            }
            let title = row.title.clone();
            let movie = row
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
        let mut writer = csv::Writer::from_writer(Vec::new());
        // Header is written explicitly so an empty catalog still carries it
        writer
            .write_record(["title", "rating", "year", "poster_url", "notes"])
            .map_err(|e| self.csv_error(e))?;
        for (title, movie) in catalog {
            let row = CsvRow::from_movie(title, movie);
            writer
                .write_record([&row.title, &row.rating, &row.year, &row.poster_url, &row.notes])
                .map_err(|e| self.csv_error(e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::io(&self.path, e.into_error()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        fs::write(&self.path, bytes).map_err(|e| StorageError::io(&self.path, e))?;
        info!("Wrote {} movies to {}", catalog.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_file_without_notes_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("movies.csv");
        fs::write(
            &path,
            "title,rating,year,poster_url\n Titanic , 7.9 , 1997 ,http://p/t.jpg\nHeat,8.3,1995,\n",
        )
        .unwrap();

        let catalog = CsvStore::new(&path).list_movies().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["Titanic"].rating, 7.9);
        assert_eq!(catalog["Titanic"].year, "1997");
        assert_eq!(catalog["Heat"].poster_url, None);
        assert_eq!(catalog["Heat"].notes, None);
    }

    #[test]
    fn test_titles_with_commas_and_quotes_survive_rewrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvStore::new(temp_dir.path().join("movies.csv"));

        let mut catalog = Catalog::new();
        let mut movie = Movie::new("2000", 7.5, None);
        movie.notes = Some("said \"hi\", twice".to_string());
        catalog.insert("Crouching Tiger, Hidden Dragon".to_string(), movie);
        store.save_movies(&catalog).unwrap();

        assert_eq!(store.list_movies().unwrap(), catalog);
    }

    #[test]
    fn test_empty_catalog_keeps_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("movies.csv");
        CsvStore::new(&path).save_movies(&Catalog::new()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "title,rating,year,poster_url,notes\n");
    }

    #[test]
    fn test_bad_rating_row_fails_the_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("movies.csv");
        let content = "title,rating,year,poster_url,notes\nBroken,N/A,2001,,\nHeat,8.3,1995,,\n";
        fs::write(&path, content).unwrap();

        let store = CsvStore::new(&path);
        let result = store.list_movies();
        assert!(matches!(result, Err(StorageError::InvalidRecord { ref title, .. }) if title == "Broken"));

        // The row must not vanish on the next rewrite
        assert!(store.add_movie("Alien", Movie::new("1979", 8.5, None)).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_blank_rows_are_ignored_and_title_only_rows_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("movies.csv");
        fs::write(&path, "title,rating,year,poster_url,notes\n,,,,\nHeat,8.3,1995,,\n").unwrap();
        assert_eq!(CsvStore::new(&path).list_movies().unwrap().len(), 1);

        fs::write(&path, "title,rating,year,poster_url,notes\nHeat,8.3,1995,,\nFuture Film\n").unwrap();
        let result = CsvStore::new(&path).list_movies();
        assert!(matches!(result, Err(StorageError::InvalidRecord { ref title, .. }) if title == "Future Film"));

        fs::write(&path, "title,rating,year,poster_url,notes\n,8.3,1995,,\n").unwrap();
        let result = CsvStore::new(&path).list_movies();
        assert!(matches!(
            result,
            Err(StorageError::InvalidRecord { source: MovieError::EmptyTitle, .. })
        ));
    }
}
