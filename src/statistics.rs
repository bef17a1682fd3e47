// Aggregate views over the rating field

use crate::movie::{Catalog, Movie};
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::Serialize;

/// Summary statistics for a non-empty catalog
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub best_rating: f64,
    pub worst_rating: f64,
    /// All titles sharing the highest rating
    pub best: Vec<String>,
    /// All titles sharing the lowest rating
    pub worst: Vec<String>,
}

impl CatalogStats {
    /// Returns `None` for an empty catalog
    pub fn from_catalog(catalog: &Catalog) -> Option<Self> {
        if catalog.is_empty() {
            return None;
        }

        let mut ratings: Vec<f64> = catalog.values().map(|m| m.rating).collect();
        ratings.sort_by(f64::total_cmp);

        let count = ratings.len();
        let average = ratings.iter().sum::<f64>() / count as f64;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (ratings[mid - 1] + ratings[mid]) / 2.0
        } else {
            ratings[mid]
        };

        let worst_rating = ratings[0];
        let best_rating = ratings[count - 1];
        let titles_rated = |rating: f64| -> Vec<String> {
            catalog
                .iter()
                .filter(|(_, m)| m.rating == rating)
                .map(|(title, _)| title.clone())
                .collect()
        };

        Some(Self {
            count,
            average,
            median,
            best_rating,
            worst_rating,
            best: titles_rated(best_rating),
            worst: titles_rated(worst_rating),
        })
    }
}

/// Catalog entries by descending rating, ties ordered by title
pub fn sorted_by_rating(catalog: &Catalog) -> Vec<(&str, &Movie)> {
    let mut entries: Vec<(&str, &Movie)> =
        catalog.iter().map(|(title, movie)| (title.as_str(), movie)).collect();
    entries.sort_by(|a, b| b.1.rating.total_cmp(&a.1.rating).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Uniformly random entry, `None` when the catalog is empty
pub fn random_movie<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    rng: &mut R,
) -> Option<(&'a str, &'a Movie)> {
    catalog
        .iter()
        .choose(rng)
        .map(|(title, movie)| (title.as_str(), movie))
}
