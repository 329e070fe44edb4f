//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How a one-shot round is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Turns as they happen
    #[default]
    Text,
    /// The whole round as one JSON document
    Json,
}

/// CLI arguments for legion
#[derive(Parser, Debug)]
#[command(name = "legion")]
#[command(author, version, about = "A crowd of characters talks with you, curated by three judges")]
#[command(long_about = r#"
Legion puts you in a conversation with a small pool of characters played by a
local LLM. Before every round three judges (MELCHIOR, BALTHASAR, CASPAR) vote
on how the pool should change: keep it, shuffle it, remove members, invent a
new one or recall the most popular characters.

Start a line with [MAGI] to ask the judges themselves instead.

Configuration files are loaded from (in priority order):
1. LEGION_<SECTION>__<KEY>               Environment variables
2. --config <path>                       Explicit config file
3. ./legion.toml                         Project-level config
4. ~/.config/legion/config.toml          Global config

Example:
  legion
  legion "Who would win, Geralt or Karlach?"
  legion --model mistral --tts
"#)]
pub struct Cli {
    /// Run a single round with this input and exit
    pub input: Option<String>,

    /// Model tag to generate with
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ollama server URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory holding actor records and the popularity ledger
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace); -v also
    /// reports rolls, votes and memory updates
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format for a one-shot round
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Read generated turns aloud
    #[arg(long)]
    pub tts: bool,

    /// Seed the random source for a reproducible session
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append the JSONL transcript to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}
