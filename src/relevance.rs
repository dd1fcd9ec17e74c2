//! Deduplication and relevance ranking of listing candidates.
//!
//! The score is a plain term-overlap count:
//!
//! ```text
//! relevance = 2 * |terms found in lowercased title|
//!           + 1 * |terms found in lowercased description|
//! ```
//!
//! Terms are the whitespace-separated words of the lowercased query and match
//! as substrings. Candidates scoring zero are dropped.

use crate::models::ArticleCandidate;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

const TITLE_WEIGHT: u32 = 2;
const DESCRIPTION_WEIGHT: u32 = 1;

/// Lowercased whitespace-separated query terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Score a title/description pair against pre-split `terms`.
pub fn relevance(terms: &[String], title: &str, description: &str) -> u32 {
    let title = title.to_lowercase();
    let description = description.to_lowercase();
    terms
        .iter()
        .map(|term| {
            let mut score = 0;
            if title.contains(term.as_str()) {
                score += TITLE_WEIGHT;
            }
            if description.contains(term.as_str()) {
                score += DESCRIPTION_WEIGHT;
            }
            score
        })
        .sum()
}

/// Deduplicate by URL, score, drop zero scores and sort by score descending.
///
/// A URL is claimed by the first candidate carrying it, whatever that
/// candidate scores: when the first one scores zero it is dropped and any
/// later duplicate stays hidden. Candidates with an empty URL are ignored.
///
/// # Arguments
///
/// * `candidates` - Merged listing results, in the order they were collected
/// * `query` - Raw user query; split with [`query_terms`]
///
/// # Returns
///
/// The kept candidates with `relevance_score` set, highest first. The sort is
/// stable, so ties keep their input order.
pub fn filter_results(candidates: Vec<ArticleCandidate>, query: &str) -> Vec<ArticleCandidate> {
    let terms = query_terms(query);
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut filtered = Vec::new();

    for mut candidate in candidates {
        if candidate.url.is_empty() || !seen_urls.insert(candidate.url.clone()) {
            continue;
        }
        let score = relevance(&terms, &candidate.title, &candidate.description);
        if score == 0 {
            continue;
        }
        candidate.relevance_score = Some(score);
        filtered.push(candidate);
    }

    filtered.sort_by_key(|c| Reverse(c.relevance_score));
    debug!(count = filtered.len(), "Filtered and sorted candidates");
    filtered
}
