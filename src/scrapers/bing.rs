//! Bing News search results.
//!
//! Hits are `div`s whose class contains `news-card`. The headline anchor
//! (class containing `title`) doubles as the link; the snippet lives in a
//! `div` with a `snippet` class.

use super::{RawEntry, class_pattern, collect_entries, containers, find_tagged, published_of};
use crate::models::ArticleCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

const BASE: &str = "https://www.bing.com";

static CARD: Lazy<Regex> = Lazy::new(|| class_pattern("news-card"));
static TITLE: Lazy<Regex> = Lazy::new(|| class_pattern("title"));
static SNIPPET: Lazy<Regex> = Lazy::new(|| class_pattern("snippet"));

pub fn parse(document: &Html) -> Vec<ArticleCandidate> {
    collect_entries("bing_news", Some(BASE), containers(document, &["div"], &CARD), |card| {
        let title = find_tagged(card, &["a"], Some(&*TITLE));
        RawEntry {
            title,
            href: title.and_then(|a| a.value().attr("href")),
            description: find_tagged(card, &["div"], Some(&*SNIPPET)),
            published: published_of(card),
        }
    })
}
