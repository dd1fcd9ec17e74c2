//! Google News search results.
//!
//! Each hit is an `<article>` element. The headline sits in an `h3`/`h4` (or,
//! in newer markup, an `a.JtKRv`), the first link is the article URL and a
//! `<time datetime>` element gives the publication stamp. Google does not
//! render a snippet, so descriptions are always empty.
//!
//! Root-relative `/articles/...` links resolve against `news.google.com`.
//! Dot-relative `./articles/...` links are not resolved: like any other value
//! not starting with `http` they only get an `https://` prefix.

use super::{RawEntry, collect_entries, first_link, published_of, select_first, selectors};
use crate::models::ArticleCandidate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

const BASE: &str = "https://news.google.com";

static CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("valid selector"));
static TITLE: Lazy<Vec<Selector>> = Lazy::new(|| selectors(&["h3", "h4", "a.JtKRv"]));

pub fn parse(document: &Html) -> Vec<ArticleCandidate> {
    collect_entries("google_news", Some(BASE), document.select(&CONTAINER), |article| RawEntry {
        title: select_first(article, &TITLE),
        href: first_link(article),
        description: None,
        published: published_of(article),
    })
}
