//! Daily AI Briefing
//!
//! Builds a ranked briefing and overflow queue from a batch of feed items.
//!
//! # Usage
//!
//! ```bash
//! briefing run --input items.json [--window-start RFC3339] [--date LABEL]
//!              [--overrides publishers.json] [--rules engine.toml] [--output result.json]
//! briefing rules > engine.toml
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/ai-briefing/config.toml)
//! 3. Environment variables (BRIEFING_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use briefing_cli::{
    init_logging, load_settings, render_default_rules, run_briefing, Cli, Commands, RunOptions,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            window_start,
            date,
            overrides,
            rules,
            id_prefix,
            output,
        } => {
            let settings = load_settings(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                id_prefix.as_deref(),
            )?;
            init_logging(&settings)?;

            let opts = RunOptions {
                input,
                window_start,
                date,
                overrides,
                rules,
                output,
            };
            run_briefing(&settings, &opts)?;
        }
        Commands::Rules => {
            print!("{}", render_default_rules()?);
        }
    }

    Ok(())
}
