//! Orchestrator for a complete snippet build
//!
//! This module runs every phase in order and folds their results into a
//! [`BuildReport`]. Only discovery can abort the run; everything after it
//! reports into the report so the caller sees every problem at once.

use log::{info, warn};

use super::{phase1, phase2, phase3, phase4, phase5, phase6, BuildReport, PendingWrite};
use crate::config::BuildContext;
use crate::error::Result;

/// Execute a full build (Phases 1-6).
///
/// With `write` set, canonical rewrites are flushed, and (when no ids collide)
/// playlists, indexes, and excerpts are written. Without it the run is a pure
/// check: pending rewrites are only listed in [`BuildReport::pending`].
pub fn execute_build(ctx: &BuildContext, write: bool) -> Result<BuildReport> {
    // Phase 1: Discovery
    let files = phase1::execute(ctx)?;

    // Phase 2: Processing
    let outcomes = phase2::execute(&files, ctx);

    // Phase 3: Uniqueness
    let collisions = phase3::execute(&outcomes);

    let mut report = BuildReport {
        files: outcomes,
        collisions,
        ..Default::default()
    };

    // Phase 4: Writing corrections, even when the build has failed
    let pending: Vec<PendingWrite> = report
        .files
        .iter()
        .filter_map(|outcome| outcome.pending_write.clone())
        .collect();
    if write {
        let (written, errors) = phase4::execute(&pending);
        report.written = written;
        report.errors.extend(errors.iter().map(ToString::to_string));
    } else {
        report.pending = pending.into_iter().map(|w| w.path).collect();
    }

    if !report.collisions.is_empty() {
        warn!(
            "{} snippet(s) share an id; skipping playlists and excerpts",
            report.collisions.len()
        );
        return Ok(report);
    }

    let processed: Vec<_> = report.processed().collect();

    // Phase 5: Playlists and indexes
    let playlists = if write {
        phase5::execute(&processed, ctx)
    } else {
        Ok(Vec::new())
    };

    // Phase 6: Excerpts
    let (excerpts, extraction_errors) = phase6::execute(&processed, ctx, write);

    match playlists {
        Ok(paths) => report.playlists = paths,
        Err(e) => report.errors.push(e.to_string()),
    }
    report.excerpts = excerpts;
    report
        .errors
        .extend(extraction_errors.iter().map(ToString::to_string));

    info!(
        "Processed {} snippet(s) with {} error(s)",
        report.files.len(),
        report.error_count()
    );
    Ok(report)
}
