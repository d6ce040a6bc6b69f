//! # Check Command Implementation
//!
//! This module implements the `check` subcommand: the same validation as
//! `build`, without writing anything. Files that would be rewritten into
//! canonical form are listed, and count as a failure, which makes the command
//! suitable for CI.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use snippet_build::output::{render_report, OutputConfig};
use snippet_build::phases::orchestrator::execute_build;
use snippet_build::suggestions;

use super::{abort, load_context, RepoArgs};

/// Validate every snippet without writing anything
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, root: &Path, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let ctx = load_context(root, args.repo)?;

    let report = execute_build(&ctx, false).map_err(abort)?;
    print!("{}", render_report(&out, &report));

    if report.succeeded() && report.pending.is_empty() {
        Ok(())
    } else {
        Err(suggestions::check_failed(
            report.error_count(),
            report.pending.len(),
        ))
    }
}
