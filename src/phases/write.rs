//! Phase 4: Writing Corrections
//!
//! Processing never touches the disk; it queues a [`PendingWrite`] for every
//! snippet whose canonical form differs from the file. This phase flushes
//! that queue in one parallel pass. It runs even when the build has failed, so
//! automatic corrections are never lost.
//!
//! Failures are collected per file rather than stopping the pass.

use std::fs;
use std::path::PathBuf;

use log::info;
use rayon::prelude::*;

use super::PendingWrite;
use crate::error::{Error, Result};

/// Executes Phase 4 of the pipeline.
///
/// Returns the written paths and the errors for writes that failed.
pub fn execute(writes: &[PendingWrite]) -> (Vec<PathBuf>, Vec<Error>) {
    let results: Vec<Result<PathBuf>> = writes.par_iter().map(write_one).collect();

    let mut written = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(path) => written.push(path),
            Err(e) => errors.push(e),
        }
    }
    info!("Rewrote {} snippet file(s)", written.len());
    (written, errors)
}

fn write_one(write: &PendingWrite) -> Result<PathBuf> {
    if let Some(parent) = write.path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", parent.display(), e),
        })?;
    }
    fs::write(&write.path, &write.contents).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", write.path.display(), e),
    })?;
    Ok(write.path.clone())
}
