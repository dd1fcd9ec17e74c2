//! Command-line interface definitions.
//!
//! Every option can also come from the environment where noted.

use clap::{Parser, ValueEnum};

/// Command-line arguments for noovox_search.
///
/// Without `--query` the program runs an interactive prompt on stdin.
///
/// # Examples
///
/// ```sh
/// # One search, exported as CSV
/// noovox_search -q "apple stock" -c news -e csv -o ./out
///
/// # Interactive session with a custom source list
/// noovox_search --config ./search.yaml
///
/// # Ask a model for a digest of the top results
/// OPENAI_API_KEY=sk-... noovox_search -q "rate cut" --llm-provider openai
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search query; omit for interactive mode
    #[arg(short, long)]
    pub query: Option<String>,

    /// Source category (unknown categories fall back to general)
    #[arg(short, long, default_value = "general")]
    pub category: String,

    /// Export format for the results (json or csv)
    #[arg(short, long)]
    pub export: Option<String>,

    /// Directory export files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Optional path to a YAML config file
    #[arg(long, env = "NOOVOX_CONFIG")]
    pub config: Option<String>,

    /// Also write logs to this file
    #[arg(long, env = "NOOVOX_LOG_FILE")]
    pub log_file: Option<String>,

    /// Send a digest of the top results to a language model
    #[arg(long, value_enum)]
    pub llm_provider: Option<LlmChoice>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Chat model used by the openai provider
    #[arg(long, env = "OPENAI_MODEL")]
    pub openai_model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LlmChoice {
    Dummy,
    #[value(name = "openai")]
    OpenAi,
}
