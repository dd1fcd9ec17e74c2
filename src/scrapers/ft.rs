//! Financial Times search results.
//!
//! Teasers are `div.o-teaser__content`; the `js-teaser-heading-link` anchor is
//! both headline and link, and the standfirst paragraph is the description.

use super::{RawEntry, class_pattern, collect_entries, containers, find_tagged, published_of};
use crate::models::ArticleCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

const BASE: &str = "https://www.ft.com";

static TEASER: Lazy<Regex> = Lazy::new(|| class_pattern("o-teaser__content"));
static HEADING_LINK: Lazy<Regex> = Lazy::new(|| class_pattern("js-teaser-heading-link"));
static STANDFIRST: Lazy<Regex> = Lazy::new(|| class_pattern("o-teaser__standfirst"));

pub fn parse(document: &Html) -> Vec<ArticleCandidate> {
    collect_entries("financial_times", Some(BASE), containers(document, &["div"], &TEASER), |teaser| {
        let heading = find_tagged(teaser, &["a"], Some(&*HEADING_LINK));
        RawEntry {
            title: heading,
            href: heading.and_then(|a| a.value().attr("href")),
            description: find_tagged(teaser, &["p"], Some(&*STANDFIRST)),
            published: published_of(teaser),
        }
    })
}
