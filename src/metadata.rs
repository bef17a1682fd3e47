// Remote movie metadata lookup (OMDb)

use crate::movie::{parse_rating, Movie};
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("movie not found: {0}")]
    NotFound(String),

    #[error("no usable rating for {title}: {value:?}")]
    InvalidRating { title: String, value: String },

    #[error("no API key configured (set OMDB_API_KEY or pass --api-key)")]
    MissingApiKey,
}

/// Fields fetched for a title being added
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub year: String,
    pub rating: f64,
    pub poster_url: Option<String>,
}

impl From<MovieMetadata> for Movie {
    fn from(metadata: MovieMetadata) -> Self {
        Movie::new(metadata.year, metadata.rating, metadata.poster_url)
    }
}

/// Source of year/rating/poster for a title
pub trait MetadataSource {
    fn lookup(&self, title: &str) -> impl Future<Output = Result<MovieMetadata, MetadataError>> + Send;
}

/// Raw OMDb payload; only the fields this crate uses
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    pub response: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Turn an OMDb payload into metadata. `N/A` posters become `None`; `N/A` ratings are rejected.
pub fn parse_omdb_response(title: &str, response: OmdbResponse) -> Result<MovieMetadata, MetadataError> {
    if response.response != "True" {
        let reason = response.error.unwrap_or_else(|| title.to_string());
        return Err(MetadataError::NotFound(reason));
    }

    let raw_rating = response.imdb_rating.unwrap_or_default();
    let rating = parse_rating(&raw_rating).map_err(|_| MetadataError::InvalidRating {
        title: title.to_string(),
        value: raw_rating.clone(),
    })?;

    let poster_url = response
        .poster
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && p != "N/A");

    Ok(MovieMetadata {
        year: response.year.unwrap_or_default().trim().to_string(),
        rating,
        poster_url,
    })
}

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OMDB_URL.to_string(),
            api_key: None,
        }
    }
}

/// HTTP client for the OMDb title endpoint
pub struct OmdbClient {
    config: OmdbConfig,
    http: reqwest::Client,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

impl MetadataSource for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(MetadataError::MissingApiKey)?;

        debug!("Looking up {:?} at {}", title, self.config.base_url);
        let response: OmdbResponse = self
            .http
            .get(&self.config.base_url)
            .query(&[("t", title), ("apikey", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let metadata = parse_omdb_response(title, response)?;
        info!(title, year = %metadata.year, rating = metadata.rating, "Fetched movie metadata");
        Ok(metadata)
    }
}
