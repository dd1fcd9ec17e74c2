//! # Noovox Search
//!
//! Command-line front end for the news search pipeline.
//!
//! ## Usage
//!
//! ```sh
//! # One search, results printed as JSON
//! noovox_search -q "apple stock" -c news
//!
//! # Interactive session
//! noovox_search
//! ```
//!
//! Logs go to stderr (and optionally a file); results go to stdout.

use clap::Parser;
use noovox_search::outputs::export;
use noovox_search::responder::{DummyResponder, LlmProvider, OpenAiResponder, Responder};
use noovox_search::sources::DEFAULT_CATEGORY;
use noovox_search::utils::{
    DEFAULT_PREVIEW_CHARS, ensure_writable_dir, format_article_preview, format_full_article, truncate_for_log,
};
use noovox_search::{NewsSearcher, SearchConfig, SearchError, SearchResults};
use std::error::Error;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, LlmChoice};

const TOP_RESULTS: usize = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing(args.log_file.as_deref())?;

    let start_time = std::time::Instant::now();
    info!("noovox_search starting up");
    debug!(?args.config, ?args.export, output_dir = %args.output_dir, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => {
            let config = SearchConfig::load(path)?;
            info!(config_path = %path, "Loaded configuration");
            config
        }
        None => SearchConfig::default(),
    };
    let searcher = NewsSearcher::new(config)?;
    let responder = build_responder(&args)?;

    if args.export.is_some() {
        if let Err(e) = ensure_writable_dir(&args.output_dir).await {
            error!(path = %args.output_dir, error = %e, "Output directory is not writable");
            return Err(e.into());
        }
    }

    match args.query.as_deref() {
        Some(query) => run_once(&searcher, &args, query, responder.as_ref()).await?,
        None => run_interactive(&searcher, &args, responder.as_ref()).await?,
    }

    info!(elapsed_ms = start_time.elapsed().as_millis(), "noovox_search finished");
    Ok(())
}

/// Stderr logging, plus a plain-text copy in `log_file` when given.
fn init_tracing(log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tfmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tfmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

fn build_responder(args: &Cli) -> Result<Option<LlmProvider>, SearchError> {
    let provider = match args.llm_provider {
        None => return Ok(None),
        Some(LlmChoice::Dummy) => LlmProvider::Dummy(DummyResponder),
        Some(LlmChoice::OpenAi) => {
            let key = args.openai_api_key.as_deref().unwrap_or_default();
            LlmProvider::OpenAi(OpenAiResponder::new(
                key,
                args.openai_base_url.as_deref(),
                args.openai_model.as_deref(),
            )?)
        }
    };
    info!(?provider, "LLM responder enabled");
    Ok(Some(provider))
}

async fn run_once(
    searcher: &NewsSearcher,
    args: &Cli,
    query: &str,
    responder: Option<&LlmProvider>,
) -> Result<(), Box<dyn Error>> {
    let articles = searcher.search(query, &args.category).await;
    let mut results = SearchResults::new(query, articles);

    if let Some(format) = args.export.as_deref() {
        export(&mut results, format, &args.output_dir).await;
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    if let Some(responder) = responder {
        print_digest(responder, &results).await;
    }
    Ok(())
}

async fn run_interactive(
    searcher: &NewsSearcher,
    args: &Cli,
    responder: Option<&LlmProvider>,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let categories: Vec<&str> = searcher.registry().categories().collect();

    println!("Noovox news search. Type 'quit' to exit.");
    loop {
        prompt("\nEnter search query (or 'quit' to exit): ")?;
        let Some(line) = lines.next_line().await? else { break };
        let query = line.trim();
        if query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        prompt(&format!("Category ({}) [{DEFAULT_CATEGORY}]: ", categories.join(", ")))?;
        let Some(line) = lines.next_line().await? else { break };
        let requested = line.trim();
        let category = if requested.is_empty() {
            DEFAULT_CATEGORY
        } else if categories.contains(&requested) {
            requested
        } else {
            println!("Unknown category '{requested}', searching {DEFAULT_CATEGORY} instead.");
            DEFAULT_CATEGORY
        };

        println!("Searching {category} sources for '{query}'...");
        let articles = searcher.search(query, category).await;
        let mut results = SearchResults::new(query, articles);
        println!("{} ({} articles)", results.message, results.data.article_count);
        if results.data.articles.is_empty() {
            println!("Try fewer or different keywords, or another category.");
            continue;
        }

        prompt("Export results? (json/csv, Enter to skip): ")?;
        let Some(line) = lines.next_line().await? else { break };
        let format = line.trim();
        if !format.is_empty() {
            export(&mut results, format, &args.output_dir).await;
            match &results.exported_file {
                Some(path) => println!("Exported to {path}"),
                None => println!("Export failed; see log for details."),
            }
        }

        let total = results.data.articles.len();
        let mut shown = 0;
        loop {
            let page_end = (shown + TOP_RESULTS).min(total);
            for (i, article) in results.data.articles[shown..page_end].iter().enumerate() {
                println!("\n[{}]\n{}", shown + i + 1, format_article_preview(article, DEFAULT_PREVIEW_CHARS));
            }
            shown = page_end;
            if shown == total {
                break;
            }
            prompt(&format!("\nShow more results? ({} left, y/N): ", total - shown))?;
            let Some(line) = lines.next_line().await? else { return Ok(()) };
            if !line.trim().eq_ignore_ascii_case("y") {
                break;
            }
        }

        if let Some(responder) = responder {
            print_digest(responder, &results).await;
        }

        loop {
            prompt(&format!("\nView full article (1-{total}, Enter to continue): "))?;
            let Some(line) = lines.next_line().await? else { return Ok(()) };
            let choice = line.trim();
            if choice.is_empty() {
                break;
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=total).contains(&n) => {
                    println!("\n{}", format_full_article(&results.data.articles[n - 1]));
                }
                _ => println!("Please enter a number between 1 and {total}."),
            }
        }
    }

    info!("Interactive session ended");
    Ok(())
}

/// Ask the responder for a short digest of the top results.
///
/// Failures are logged and never affect the search output.
async fn print_digest(responder: &LlmProvider, results: &SearchResults) {
    let mut prompt = format!(
        "Write a short digest of these news articles about \"{}\":\n",
        results.data.query
    );
    for article in results.data.articles.iter().take(TOP_RESULTS) {
        prompt.push('\n');
        prompt.push_str(&format_article_preview(article, 500));
        prompt.push('\n');
    }

    match responder.respond(&prompt).await {
        Ok(reply) => {
            debug!(reply = %truncate_for_log(&reply, 300), "Digest received");
            println!("\n--- Digest ---\n{reply}");
        }
        Err(e) => warn!(error = %e, "Digest generation failed"),
    }
}

fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}
