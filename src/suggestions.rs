//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use snippet_build::suggestions;
//!
//! return Err(suggestions::build_failed(report.error_count()));
//! ```

use std::path::Path;

use crate::config::CONFIG_FIELDS;

/// Generate an error for when the snippet directory does not exist.
pub fn samples_dir_not_found(root: &Path, samples_dir: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Snippet directory not found: {path}\n\n\
         hint: Run from the repository root or pass --root <DIR>\n\
         hint: Set samples_dir in .snippet-build.yaml if snippets live elsewhere",
        path = root.join(samples_dir).display()
    )
}

/// Generate the error that makes `build` exit non-zero.
pub fn build_failed(error_count: usize) -> anyhow::Error {
    anyhow::anyhow!(
        "Build failed with {error_count} error(s)\n\n\
         hint: Automatic corrections have already been written; review them with git diff\n\
         hint: Fix the remaining errors listed above and run the build again"
    )
}

/// Generate the error that makes `check` exit non-zero.
pub fn check_failed(error_count: usize, pending: usize) -> anyhow::Error {
    anyhow::anyhow!(
        "Check failed: {error_count} error(s), {pending} file(s) not in canonical form\n\n\
         hint: Run 'snippet-build build' to apply automatic corrections"
    )
}

/// Hint for an unknown configuration field, naming the closest valid one.
pub fn unknown_config_field(field: &str) -> String {
    match find_similar(field, CONFIG_FIELDS) {
        Some(candidate) => format!("Did you mean `{candidate}`?"),
        None => format!("Valid fields are: {}", CONFIG_FIELDS.join(", ")),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b_chars.len()]
}
