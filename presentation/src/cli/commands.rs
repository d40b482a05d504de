//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the finished discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full transcript, streamed live as each persona speaks
    Transcript,
    /// Only the moderator's closing synthesis
    Moderator,
    /// JSON outcome (transcript, slot assignment, failure count)
    Json,
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Personas argue a topic in turns, then a moderator wraps up")]
#[command(long_about = r#"
Roundtable runs a turn-based discussion between personas, each voiced by a
randomly assigned LLM backend.

The session has three kinds of steps:
1. Turns: personas speak in roster order, each reacting to the last speaker
2. Interim summary: injected once partway through (unless disabled)
3. Moderator: a randomly chosen backend closes with a synthesis

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./roundtable.toml   Project-level config
3. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "Should cities ban cars from downtown?"
  roundtable --turns 6 --no-summary "Tabs or spaces?"
  roundtable -o json --seed 42 "Is a hot dog a sandwich?"
"#)]
pub struct Cli {
    /// The topic to discuss (not required with --show-config or --list-personas)
    pub topic: Option<String>,

    /// Total number of speaker turns (defaults to roster size x rounds)
    #[arg(short, long, value_name = "N")]
    pub turns: Option<usize>,

    /// Inject the interim summary after this many turns
    #[arg(long, value_name = "N", conflicts_with = "no_summary")]
    pub summary_after: Option<usize>,

    /// Skip the interim summary
    #[arg(long)]
    pub no_summary: bool,

    /// Seed for slot assignment and moderator selection
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "transcript")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List the configured personas and backends and exit
    #[arg(long)]
    pub list_personas: bool,
}
