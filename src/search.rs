// Fuzzy title search: partial-ratio similarity between a query and catalog titles

use crate::movie::{Catalog, Movie};

/// Minimum score for a title to count as a match
pub const MATCH_THRESHOLD: u8 = 70;

/// A catalog entry that matched a search query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch<'a> {
    pub title: &'a str,
    pub movie: &'a Movie,
    pub score: u8,
}

/// Edit distance where insertions and deletions cost 1 and substitutions cost 2
fn indel_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr_row[0] = i;
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 2 };
            curr_row[j] = (curr_row[j - 1] + 1)
                .min(prev_row[j] + 1)
                .min(prev_row[j - 1] + substitution);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// Similarity of two char sequences scaled to 0..=100
fn ratio(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let distance = indel_distance(a, b);
    let score = 100.0 * (total - distance) as f64 / total as f64;
    score.round() as u8
}

/// Best similarity between the shorter string and any equal-length window of the longer one.
/// Returns 0 when either side is empty.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let window = shorter.len();

    let mut best = 0;
    for start in 0..=(longer.len() - window) {
        let score = ratio(shorter, &longer[start..start + window]);
        if score == 100 {
            return 100;
        }
        best = best.max(score);
    }
    best
}

/// Rank catalog titles against `query`, case-insensitively.
/// Only scores at or above [`MATCH_THRESHOLD`] are kept, best first, ties by title.
pub fn search_movies<'a>(catalog: &'a Catalog, query: &str) -> Vec<SearchMatch<'a>> {
    let query = query.trim().to_lowercase();

    let mut matches: Vec<SearchMatch<'a>> = catalog
        .iter()
        .filter_map(|(title, movie)| {
            let score = partial_ratio(&query, &title.to_lowercase());
            (score >= MATCH_THRESHOLD).then_some(SearchMatch {
                title: title.as_str(),
                movie,
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.title.cmp(b.title)));
    matches
}
