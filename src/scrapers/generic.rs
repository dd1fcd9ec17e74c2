//! Fallback parser for listing pages without a dedicated routine.
//!
//! Containers are every `<article>` element followed by any element whose
//! class contains `article`, `post`, `story` or `news-item`. An element that
//! qualifies both ways is visited once.

use super::{RawEntry, class_pattern, collect_entries, containers, first_link, select_first, selectors};
use crate::models::ArticleCandidate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));
static ARTICLE_CLASS: Lazy<Regex> = Lazy::new(|| class_pattern("article|post|story|news-item"));
static TITLE: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&["h1", "h2", "h3", "h4", ".title", ".headline"]));
static DESCRIPTION: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&[".description", ".summary", ".excerpt", "p"]));

/// `base` is the origin of the listing page, used for root-relative links.
pub fn parse(document: &Html, base: Option<&str>) -> Vec<ArticleCandidate> {
    let candidates = document
        .select(&ARTICLE)
        .chain(containers(document, &[], &ARTICLE_CLASS))
        .unique_by(|el| el.id());

    collect_entries("generic", base, candidates, |container| RawEntry {
        title: select_first(container, &TITLE),
        href: first_link(container),
        description: select_first(container, &DESCRIPTION),
        published: String::new(),
    })
}
