use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use movie_catalog::config::AppConfig;
use movie_catalog::metadata::{OmdbClient, OmdbConfig, DEFAULT_OMDB_URL};
use movie_catalog::site::SiteConfig;
use movie_catalog::{open_store, MovieApp, StorageKind};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "movie-catalog")]
#[command(about = "Personal movie catalog with JSON or CSV storage")]
#[command(version)]
struct Args {
    /// Storage backend; asked interactively when omitted in menu mode
    #[arg(long, value_enum)]
    storage: Option<StorageKind>,

    /// Catalog file (default: movies.json or movies.csv)
    #[arg(long)]
    file: Option<PathBuf>,

    /// HTML template containing __TEMPLATE_TITLE__ and __TEMPLATE_MOVIE_GRID__
    #[arg(long, default_value = "_static/index_template.html")]
    template: PathBuf,

    /// Generated website path
    #[arg(long, default_value = "_static/index.html")]
    output: PathBuf,

    /// Page title for the generated website
    #[arg(long, default_value = "My Movie App")]
    title: String,

    /// OMDb endpoint used to look up new movies
    #[arg(long, default_value = DEFAULT_OMDB_URL)]
    omdb_url: String,

    /// OMDb API key
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Debug-level logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every movie
    List,
    /// Look up a title on OMDb and add it
    Add { title: String },
    /// Delete a movie
    Delete { title: String },
    /// Set the notes of a movie
    Update { title: String, notes: String },
    /// Average, median, best and worst ratings
    Stats,
    /// Pick a random movie
    Random,
    /// Fuzzy search by title
    Search { query: String },
    /// Movies sorted by rating, best first
    Sorted,
    /// Print the rating histogram and save it as SVG
    Histogram { file: PathBuf },
    /// Render the catalog into the HTML template
    GenerateWebsite,
}

impl Args {
    fn into_config(self, storage: StorageKind) -> (AppConfig, Option<Command>) {
        let config = AppConfig {
            storage,
            catalog_file: self.file,
            site: SiteConfig {
                template_path: self.template,
                output_path: self.output,
                page_title: self.title,
            },
            omdb: OmdbConfig {
                base_url: self.omdb_url,
                api_key: self.api_key.filter(|k| !k.trim().is_empty()),
            },
        };
        (config, self.command)
    }
}

/// Ask for the backend the way the menu-driven app always has
fn prompt_storage_kind() -> Result<StorageKind> {
    print!("Enter storage type (json/csv): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    StorageKind::from_str(line.trim(), true)
        .map_err(|e| anyhow::anyhow!("Invalid storage type. Exiting... ({e})"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry OMDB_API_KEY
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .json()
        .init();

    info!(storage = ?args.storage, command = ?args.command, "Parsed CLI arguments");

    let storage = match (args.storage, &args.command) {
        (Some(kind), _) => kind,
        (None, Some(_)) => StorageKind::Json,
        (None, None) => prompt_storage_kind()?,
    };

    let (config, command) = args.into_config(storage);
    let catalog_path = config.catalog_path();

    if catalog_path.is_dir() {
        anyhow::bail!("Catalog path is a directory: {}", catalog_path.display());
    }

    info!("Using {} catalog at {}", config.storage, catalog_path.display());
    let store = open_store(config.storage, catalog_path);
    let app = MovieApp::new(store, OmdbClient::new(config.omdb), config.site);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            app.run_menu(&mut input, &mut out).await?
        }
        Some(Command::List) => app.list_movies(&mut out)?,
        Some(Command::Add { title }) => app.add_movie(&title, &mut out).await?,
        Some(Command::Delete { title }) => app.delete_movie(&title, &mut out)?,
        Some(Command::Update { title, notes }) => app.update_movie(&title, &notes, &mut out)?,
        Some(Command::Stats) => app.show_statistics(&mut out)?,
        Some(Command::Random) => app.show_random_movie(&mut out)?,
        Some(Command::Search { query }) => app.search_movies(&query, &mut out)?,
        Some(Command::Sorted) => app.show_sorted_by_rating(&mut out)?,
        Some(Command::Histogram { file }) => app.create_rating_histogram(&file, &mut out)?,
        Some(Command::GenerateWebsite) => app.generate_website(&mut out)?,
    }

    Ok(())
}
