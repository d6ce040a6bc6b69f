//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `snippet-build` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `snippet_build` library.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use snippet_build::config::{BuildContext, RepoCoordinates};
use snippet_build::error::Error;
use snippet_build::suggestions;

pub mod build;
pub mod check;
pub mod normalize_id;

/// Repository coordinates used to build each snippet's `rawUrl`.
#[derive(Args, Debug, Default)]
pub struct RepoArgs {
    /// GitHub account hosting the snippets
    #[arg(long, value_name = "ACCOUNT", env = "GH_ACCOUNT")]
    pub account: Option<String>,

    /// GitHub repository hosting the snippets
    #[arg(long, value_name = "REPO", env = "GH_REPO")]
    pub repo: Option<String>,

    /// Branch the snippets are published from
    #[arg(long, value_name = "BRANCH", env = "GH_BRANCH")]
    pub branch: Option<String>,
}

impl From<RepoArgs> for RepoCoordinates {
    fn from(args: RepoArgs) -> Self {
        RepoCoordinates {
            account: args.account,
            repo: args.repo,
            branch: args.branch,
        }
    }
}

/// Load the build context for `root`, with a hint when the corpus is missing.
pub fn load_context(root: &Path, repo: RepoArgs) -> Result<BuildContext> {
    let ctx = BuildContext::load(root, repo.into())?;
    if !ctx.root.join(&ctx.samples_dir).is_dir() {
        return Err(suggestions::samples_dir_not_found(root, &ctx.samples_dir));
    }
    Ok(ctx)
}

/// Turn a run-aborting library error into a CLI error.
pub fn abort(error: Error) -> anyhow::Error {
    if error.is_structural() {
        anyhow::anyhow!("Build aborted: {error}")
    } else {
        error.into()
    }
}
