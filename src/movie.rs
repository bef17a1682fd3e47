// Movie record and the in-memory catalog mapping shared by every backend

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Full in-memory catalog keyed by movie title.
/// Ordered so listings, rewrites and generated pages are deterministic.
pub type Catalog = BTreeMap<String, Movie>;

/// Ratings live on the IMDb 0-10 scale
pub const RATING_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// A record that cannot be part of a catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MovieError {
    #[error("rating {0:?} is not a number between 0 and 10")]
    InvalidRating(String),

    #[error("title is empty")]
    EmptyTitle,
}

/// Parse a stored or fetched rating. Non-numeric, non-finite and out-of-range values are rejected.
pub fn parse_rating(text: &str) -> Result<f64, MovieError> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|rating| RATING_RANGE.contains(rating))
        .ok_or_else(|| MovieError::InvalidRating(text.to_string()))
}

/// Check a rating that is already numeric
pub fn check_rating(rating: f64) -> Result<f64, MovieError> {
    // NaN fails `contains`, infinities fall outside the range
    if RATING_RANGE.contains(&rating) {
        Ok(rating)
    } else {
        Err(MovieError::InvalidRating(rating.to_string()))
    }
}

/// Attributes stored for a single title
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub year: String,
    pub rating: f64,
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Movie {
    pub fn new(year: impl Into<String>, rating: f64, poster_url: Option<String>) -> Self {
        Self {
            year: year.into(),
            rating,
            poster_url,
            notes: None,
        }
    }

    /// Poster URL or an empty string when the record has none
    pub fn poster_or_empty(&self) -> &str {
        self.poster_url.as_deref().unwrap_or("")
    }

    pub fn validate(&self) -> Result<(), MovieError> {
        check_rating(self.rating).map(|_| ())
    }
}

/// A record as it sits in a catalog file, before the rating is checked.
/// Both backends decode into this so they accept and reject the same values.
#[derive(Deserialize, Debug)]
pub(crate) struct StoredMovie {
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl StoredMovie {
    pub(crate) fn into_movie(self) -> Result<Movie, MovieError> {
        Ok(Movie {
            rating: parse_rating(&self.rating)?,
            year: self.year,
            poster_url: self.poster_url,
            notes: self.notes,
        })
    }
}

/// Scalar that older catalog files stored either as a number or as text
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => n.to_string(),
        Some(NumberOrString::Text(s)) => s.trim().to_string(),
        None => String::new(),
    })
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}
