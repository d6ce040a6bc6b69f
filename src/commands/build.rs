//! # Build Command Implementation
//!
//! This module implements the `build` subcommand, which runs the whole
//! snippet pipeline: every snippet is validated and corrected, corrections are
//! written back, and per-host playlists, indexes, and reference-doc excerpts
//! are published.
//!
//! Corrections are written even when the build fails. The command exits
//! non-zero when any snippet error or id collision was found.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use snippet_build::output::{render_report, OutputConfig};
use snippet_build::phases::orchestrator::execute_build;
use snippet_build::suggestions;

use super::{abort, load_context, RepoArgs};

/// Validate and correct every snippet, then write playlists and indexes
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs, root: &Path, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let ctx = load_context(root, args.repo)?;

    let report = execute_build(&ctx, true).map_err(abort)?;
    print!("{}", render_report(&out, &report));

    if report.succeeded() {
        Ok(())
    } else {
        Err(suggestions::build_failed(report.error_count()))
    }
}
