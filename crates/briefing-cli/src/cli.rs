//! CLI argument parsing for the briefing tool.
//!
//! CLI flags override every other settings source.

use clap::{Parser, Subcommand};

/// Daily AI briefing
///
/// Turns a batch of already-fetched feed items into a ranked briefing and
/// an overflow queue.
#[derive(Parser, Debug)]
#[command(name = "briefing")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/ai-briefing/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Briefing commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a briefing from a JSON array of source items
    Run {
        /// Source items file (JSON array)
        #[arg(short, long)]
        input: String,

        /// Window start (RFC 3339); defaults to now minus window_hours
        #[arg(long)]
        window_start: Option<String>,

        /// Date label for topic ids; defaults to today's UTC date
        #[arg(long)]
        date: Option<String>,

        /// Publisher override flags (JSON object of publisher -> bool)
        #[arg(long)]
        overrides: Option<String>,

        /// Engine rules file (TOML)
        #[arg(long)]
        rules: Option<String>,

        /// Override topic id prefix
        #[arg(long)]
        id_prefix: Option<String>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the default engine rules as TOML
    Rules,
}
