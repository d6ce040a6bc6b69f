//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Snippet Build - Validate, canonicalize, and publish add-in sample snippets
#[derive(Parser, Debug)]
#[command(name = "snippet-build")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Repository root containing the snippet directories
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate and correct every snippet, then write playlists and indexes
    Build(commands::build::BuildArgs),

    /// Validate every snippet without writing anything
    Check(commands::check::CheckArgs),

    /// Print the snippet id derived from arbitrary text
    NormalizeId(commands::normalize_id::NormalizeIdArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Build(args) => commands::build::execute(args, &self.root, &self.color),
            Commands::Check(args) => commands::check::execute(args, &self.root, &self.color),
            Commands::NormalizeId(args) => commands::normalize_id::execute(args),
        }
    }
}

/// Initialize `env_logger`; `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
