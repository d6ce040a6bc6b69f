//! Phase 3: Id Uniqueness
//!
//! Snippet ids must be unique across the public and private corpora together.
//! This check only runs once every file has been projected, and reports each
//! snippet that shares its id with another, so both ends of a collision show up
//! in the output.

use std::collections::BTreeMap;

use log::warn;

use super::{Collision, FileOutcome};

/// Executes Phase 3 of the pipeline.
///
/// Returns one [`Collision`] per snippet involved in a collision, in
/// discovery order.
pub fn execute(outcomes: &[FileOutcome]) -> Vec<Collision> {
    let mut by_id: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for outcome in outcomes {
        if let Some(processed) = &outcome.processed {
            by_id
                .entry(processed.id.as_str())
                .or_default()
                .push(outcome.file.display_path());
        }
    }

    let mut collisions = Vec::new();
    for outcome in outcomes {
        let Some(processed) = &outcome.processed else {
            continue;
        };
        let path = outcome.file.display_path();
        let others: Vec<String> = by_id[processed.id.as_str()]
            .iter()
            .filter(|other| **other != path)
            .cloned()
            .collect();
        if others.is_empty() {
            continue;
        }
        warn!("Id \"{}\" of {path} is shared with {}", processed.id, others.join(", "));
        collisions.push(Collision {
            id: processed.id.clone(),
            path,
            others,
        });
    }
    collisions
}
