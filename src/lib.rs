//! # Noovox Search
//!
//! Query-driven news search over public listing pages.
//!
//! A query and a category go in; every source of that category is fetched
//! concurrently, its listing page parsed into candidates, the candidates
//! deduplicated and ranked by term overlap, and each surviving article
//! fetched again so its body text and images can be extracted.
//!
//! ```no_run
//! use noovox_search::{NewsSearcher, SearchConfig};
//!
//! # async fn run() -> noovox_search::Result<()> {
//! let searcher = NewsSearcher::new(SearchConfig::default())?;
//! for article in searcher.search("apple stock", "news").await {
//!     println!("{} ({})", article.title, article.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod pool;
pub mod relevance;
pub mod responder;
pub mod scrapers;
pub mod search;
pub mod sources;
pub mod utils;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use models::{ArticleCandidate, ContentSource, SearchResults};
pub use search::NewsSearcher;
