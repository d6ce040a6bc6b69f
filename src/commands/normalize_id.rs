//! # Normalize-Id Command Implementation
//!
//! Prints the snippet id that the build would derive from the given text,
//! which may be a declared id or a path relative to the snippet directory.

use anyhow::{bail, Result};
use clap::Args;

use snippet_build::naming::normalize_id;

/// Print the snippet id derived from arbitrary text
#[derive(Args, Debug)]
pub struct NormalizeIdArgs {
    /// Text to normalize, such as `excel/01-basics/Basic Call.yaml`
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Execute the `normalize-id` command.
pub fn execute(args: NormalizeIdArgs) -> Result<()> {
    let id = normalize_id(&args.text);
    if id.is_empty() {
        bail!("\"{}\" does not contain any characters usable in an id", args.text);
    }
    println!("{id}");
    Ok(())
}
