// Static website generation by placeholder substitution in an HTML template

use crate::movie::Catalog;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write website {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template is missing placeholder {0}")]
    MissingPlaceholder(&'static str),
}

/// Where the template lives, where the page goes and what it is called
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub page_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("_static/index_template.html"),
            output_path: PathBuf::from("_static/index.html"),
            page_title: "My Movie App".to_string(),
        }
    }
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One `<li>` block per movie, in catalog order
pub fn render_movie_grid(catalog: &Catalog) -> String {
    let mut grid = String::new();
    for (title, movie) in catalog {
        let title = escape_html(title);
        let _ = write!(
            grid,
            r#"
        <li>
            <div class="movie">
                <img class="movie-poster" src="{}" alt="{title}"/>
                <h2 class="movie-title">{title}</h2>
                <div class="movie-year">{}</div>
            </div>
        </li>"#,
            escape_html(movie.poster_or_empty()),
            escape_html(&movie.year),
        );
    }
    grid
}

/// Substitute the title placeholder, then the grid placeholder, in a single pass each.
/// Everything else in the template is copied through unchanged.
pub fn render_page(template: &str, page_title: &str, grid: &str) -> Result<String, SiteError> {
    if !template.contains(TITLE_PLACEHOLDER) {
        return Err(SiteError::MissingPlaceholder(TITLE_PLACEHOLDER));
    }
    if !template.contains(GRID_PLACEHOLDER) {
        return Err(SiteError::MissingPlaceholder(GRID_PLACEHOLDER));
    }

    let page = template.replace(TITLE_PLACEHOLDER, &escape_html(page_title));
    // Grid last: inserted movie text is never scanned for placeholders
    Ok(page.replace(GRID_PLACEHOLDER, grid))
}

/// Render `catalog` through the configured template and write the page.
/// Returns the path of the generated file.
pub fn generate_website(catalog: &Catalog, config: &SiteConfig) -> Result<PathBuf, SiteError> {
    let template = fs::read_to_string(&config.template_path).map_err(|source| SiteError::ReadTemplate {
        path: config.template_path.clone(),
        source,
    })?;

    let page = render_page(&template, &config.page_title, &render_movie_grid(catalog))?;

    write_output(&config.output_path, &page)?;
    info!(
        "Generated website with {} movies at {}",
        catalog.len(),
        config.output_path.display()
    );
    Ok(config.output_path.clone())
}

fn write_output(path: &Path, page: &str) -> Result<(), SiteError> {
    let to_error = |source| SiteError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, page).map_err(to_error)
}
