// Application shell: one method per user command plus the interactive menu loop

use crate::histogram::RatingHistogram;
use crate::metadata::MetadataSource;
use crate::search::search_movies;
use crate::site::{generate_website, SiteConfig};
use crate::statistics::{random_movie, sorted_by_rating, CatalogStats};
use crate::storage::CatalogStore;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, info};

/// Menu entries in display order; the index is the choice number
pub const MENU: [&str; 11] = [
    "Exit",
    "List Movies",
    "Add Movie",
    "Delete Movie",
    "Update Movie",
    "Stats",
    "Random Movie",
    "Search Movie",
    "Movies sorted by rating",
    "Create Rating Histogram",
    "Generate website",
];

pub struct MovieApp<M> {
    store: Box<dyn CatalogStore>,
    metadata: M,
    site: SiteConfig,
}

impl<M: MetadataSource> MovieApp<M> {
    pub fn new(store: Box<dyn CatalogStore>, metadata: M, site: SiteConfig) -> Self {
        Self { store, metadata, site }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    pub fn list_movies<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        writeln!(out, "{} movies in total", catalog.len())?;
        for (title, movie) in &catalog {
            writeln!(out)?;
            writeln!(out, "Title: {title}")?;
            writeln!(out, "Year: {}", movie.year)?;
            writeln!(out, "Rating: {}", movie.rating)?;
            writeln!(out, "Poster: {}", movie.poster_or_empty())?;
            if let Some(notes) = &movie.notes {
                writeln!(out, "Notes: {notes}")?;
            }
        }
        Ok(())
    }

    /// Fetch metadata for `title` and store it
    pub async fn add_movie<W: Write>(&self, title: &str, out: &mut W) -> Result<()> {
        let title = title.trim();
        let metadata = self
            .metadata
            .lookup(title)
            .await
            .with_context(|| format!("Failed to add movie: {title}"))?;
        debug!(?metadata, "Metadata for {title}");

        self.store.add_movie(title, metadata.into())?;
        info!("Added {title} to {}", self.store.path().display());
        writeln!(out, "{}", format!("Added movie: {title}").green())?;
        Ok(())
    }

    pub fn delete_movie<W: Write>(&self, title: &str, out: &mut W) -> Result<()> {
        self.store.delete_movie(title)?;
        writeln!(out, "{}", format!("Deleted movie: {}", title.trim()).green())?;
        Ok(())
    }

    pub fn update_movie<W: Write>(&self, title: &str, notes: &str, out: &mut W) -> Result<()> {
        self.store.update_movie(title, notes)?;
        writeln!(out, "{}", format!("Updated movie: {}", title.trim()).green())?;
        Ok(())
    }

    pub fn show_statistics<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        let Some(stats) = CatalogStats::from_catalog(&catalog) else {
            writeln!(out, "No movies in the catalog.")?;
            return Ok(());
        };

        writeln!(out, "Average rating: {:.2}", stats.average)?;
        writeln!(out, "Median rating: {:.2}", stats.median)?;
        writeln!(out, "Best movie(s):")?;
        for title in &stats.best {
            writeln!(out, "  {title}: {}", stats.best_rating)?;
        }
        writeln!(out, "Worst movie(s):")?;
        for title in &stats.worst {
            writeln!(out, "  {title}: {}", stats.worst_rating)?;
        }
        Ok(())
    }

    pub fn show_random_movie<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        match random_movie(&catalog, &mut rand::thread_rng()) {
            Some((title, movie)) => {
                writeln!(out, "Random movie: {title} ({}), rated {}", movie.year, movie.rating)?
            }
            None => writeln!(out, "No movies in the catalog.")?,
        }
        Ok(())
    }

    pub fn search_movies<W: Write>(&self, query: &str, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        let matches = search_movies(&catalog, query);
        debug!("Search {:?} produced {} matches", query, matches.len());

        if matches.is_empty() {
            writeln!(out, "{}", "No movies found.".red())?;
            return Ok(());
        }

        writeln!(out, "Matches for \"{}\":", query.trim())?;
        for m in matches {
            writeln!(
                out,
                "{} ({}): {} (match score: {})",
                m.title, m.movie.year, m.movie.rating, m.score
            )?;
        }
        Ok(())
    }

    pub fn show_sorted_by_rating<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        for (title, movie) in sorted_by_rating(&catalog) {
            writeln!(out, "{title}: {}", movie.rating)?;
        }
        Ok(())
    }

    /// Print the histogram and save it as an SVG chart at `path`
    pub fn create_rating_histogram<W: Write>(&self, path: &Path, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        let histogram = RatingHistogram::from_ratings(catalog.values().map(|m| m.rating));

        write!(out, "{}", histogram.render_text())?;
        histogram
            .save_svg(path, "Rating Histogram")
            .with_context(|| format!("Failed to save histogram to {}", path.display()))?;
        writeln!(out, "Histogram saved to {}", path.display())?;
        Ok(())
    }

    pub fn generate_website<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.store.list_movies()?;
        let path = generate_website(&catalog, &self.site)?;
        writeln!(out, "{}", format!("Website was generated successfully: {}", path.display()).green())?;
        Ok(())
    }

    /// Interactive loop. Ends on choice `0` or end of input.
    /// Command failures are reported and the loop carries on.
    pub async fn run_menu<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<()> {
        loop {
            writeln!(out)?;
            writeln!(out, "Menu:")?;
            for (index, entry) in MENU.iter().enumerate() {
                writeln!(out, "{}", format!("{index}. {entry}").yellow())?;
            }

            let Some(choice) = prompt(input, out, "Enter your choice (0-10): ")? else {
                break;
            };
            writeln!(out)?;

            let result = match choice.as_str() {
                "0" => {
                    writeln!(out, "Exiting the Movie App...")?;
                    break;
                }
                "1" => self.list_movies(out),
                "2" => match prompt(input, out, "Enter the movie title: ")? {
                    Some(title) => self.add_movie(&title, out).await,
                    None => break,
                },
                "3" => match prompt(input, out, "Enter the movie title to delete: ")? {
                    Some(title) => self.delete_movie(&title, out),
                    None => break,
                },
                "4" => {
                    let Some(title) = prompt(input, out, "Enter the movie title to update: ")? else {
                        break;
                    };
                    let Some(notes) = prompt(input, out, "Enter the movie notes: ")? else {
                        break;
                    };
                    self.update_movie(&title, &notes, out)
                }
                "5" => self.show_statistics(out),
                "6" => self.show_random_movie(out),
                "7" => match prompt(input, out, "Enter the movie title to search: ")? {
                    Some(query) => self.search_movies(&query, out),
                    None => break,
                },
                "8" => self.show_sorted_by_rating(out),
                "9" => match prompt(input, out, "Enter filename to save plot to: ")? {
                    Some(file) => self.create_rating_histogram(Path::new(&file), out),
                    None => break,
                },
                "10" => self.generate_website(out),
                _ => {
                    writeln!(out, "Invalid choice. Please try again.")?;
                    Ok(())
                }
            };

            if let Err(e) = result {
                writeln!(out, "{}", format!("Error: {e:#}").red())?;
            }
        }
        Ok(())
    }
}

/// Print `message` and read one trimmed line; `None` at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataError, MovieMetadata};
    use crate::movie::Movie;
    use crate::storage::{open_store, StorageKind};
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Answers lookups from a fixed list instead of the network
    struct FixedMetadata(Vec<(&'static str, MovieMetadata)>);

    impl MetadataSource for FixedMetadata {
        async fn lookup(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
            self.0
                .iter()
                .find(|(t, _)| t.eq_ignore_ascii_case(title))
                .map(|(_, m)| m.clone())
                .ok_or_else(|| MetadataError::NotFound(title.to_string()))
        }
    }

    fn test_app(temp_dir: &TempDir, kind: StorageKind) -> MovieApp<FixedMetadata> {
        colored::control::set_override(false);
        let store = open_store(kind, temp_dir.path().join(kind.default_file_name()));
        let metadata = FixedMetadata(vec![(
            "Inception",
            MovieMetadata {
                year: "2010".to_string(),
                rating: 8.8,
                poster_url: Some("http://img/inception.jpg".to_string()),
            },
        )]);
        let site = SiteConfig {
            template_path: temp_dir.path().join("index_template.html"),
            output_path: temp_dir.path().join("site").join("index.html"),
            ..SiteConfig::default()
        };
        MovieApp::new(store, metadata, site)
    }

    fn output_of(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[tokio::test]
    async fn test_add_uses_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir, StorageKind::Json);
        let mut out = Vec::new();

        app.add_movie("Inception", &mut out).await.unwrap();
        let catalog = app.store().list_movies().unwrap();
        assert_eq!(catalog["Inception"], Movie::new("2010", 8.8, Some("http://img/inception.jpg".to_string())));
        assert!(output_of(out).contains("Added movie: Inception"));
    }

    #[tokio::test]
    async fn test_add_unknown_title_fails_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir, StorageKind::Csv);
        let mut out = Vec::new();

        let err = app.add_movie("Unknown Film", &mut out).await.unwrap_err();
        assert!(err.to_string().contains("Failed to add movie: Unknown Film"));
        assert!(!app.store().path().exists());
    }

    #[tokio::test]
    async fn test_menu_session() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir, StorageKind::Csv);
        app.store()
            .add_movie("Heat", Movie::new("1995", 8.3, None))
            .unwrap();

        let script = "2\nInception\n4\nHeat\nGreat heist\n5\n7\nincepton\n3\nAlien\n42\n0\n";
        let mut input = Cursor::new(script.as_bytes());
        let mut out = Vec::new();
        app.run_menu(&mut input, &mut out).await.unwrap();

        let text = output_of(out);
        assert!(text.contains("10. Generate website"));
        assert!(text.contains("Added movie: Inception"));
        assert!(text.contains("Updated movie: Heat"));
        assert!(text.contains("Average rating: 8.55"));
        assert!(text.contains("Inception (2010): 8.8 (match score: 88)"));
        assert!(text.contains("Error: Movie not found: Alien"));
        assert!(text.contains("Invalid choice. Please try again."));
        assert!(text.contains("Exiting the Movie App..."));

        let catalog = app.store().list_movies().unwrap();
        assert_eq!(catalog["Heat"].notes.as_deref(), Some("Great heist"));
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_menu_stops_at_end_of_input() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir, StorageKind::Json);
        let mut input = Cursor::new("1\n".as_bytes());
        let mut out = Vec::new();

        app.run_menu(&mut input, &mut out).await.unwrap();
        assert!(output_of(out).contains("0 movies in total"));
    }

    #[test]
    fn test_generate_website_and_histogram() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(&temp_dir, StorageKind::Json);
        app.store()
            .add_movie("Heat", Movie::new("1995", 8.3, None))
            .unwrap();
        std::fs::write(
            temp_dir.path().join("index_template.html"),
            "<h1>__TEMPLATE_TITLE__</h1><ol>__TEMPLATE_MOVIE_GRID__</ol>",
        )
        .unwrap();

        let mut out = Vec::new();
        app.generate_website(&mut out).unwrap();
        let page = std::fs::read_to_string(temp_dir.path().join("site").join("index.html")).unwrap();
        assert!(page.starts_with("<h1>My Movie App</h1><ol>"));
        assert!(page.contains(r#"<h2 class="movie-title">Heat</h2>"#));

        let chart = temp_dir.path().join("ratings.svg");
        app.create_rating_histogram(&chart, &mut out).unwrap();
        assert!(chart.exists());
        assert!(output_of(out).contains(" 8- 9 | # 1"));
    }
}
