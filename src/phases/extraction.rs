//! Phase 6: Reference-doc Excerpt Extraction
//!
//! The API reference documentation shows short code excerpts taken from real
//! snippets. Which function of which snippet illustrates which API member is
//! recorded in one mapping file per host under `snippet-extractor-metadata/`:
//!
//! ```yaml
//! - class: Range
//!   member: format
//!   snippetId: excel-range-formatting
//!   functionName: applyFormat
//! ```
//!
//! For every row the named function is cut out of the snippet's script,
//! dedented, and filed under `<App>.<class>#<member>:member` in
//! `snippet-extractor-output/snippets.yaml`. Every problem is collected, so one
//! run reports all broken rows at once.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use super::ProcessedSnippet;
use crate::config::BuildContext;
use crate::defaults::host_app_name;
use crate::error::{Error, Result};

const MAPPING_EXTENSION: &str = "yaml";
const OUTPUT_FILE_NAME: &str = "snippets.yaml";

/// One row of a host mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExcerptMapping {
    pub class: String,
    pub member: String,
    pub snippet_id: String,
    pub function_name: String,
}

/// Excerpts keyed by `<App>.<class>#<member>:member`.
pub type Excerpts = BTreeMap<String, Vec<String>>;

/// Load and validate one mapping file, returning the host app name and rows.
pub fn load_mapping_file(path: &Path) -> Result<(&'static str, Vec<ExcerptMapping>)> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(stem) = file_name.strip_suffix(&format!(".{MAPPING_EXTENSION}")) else {
        return Err(Error::Extraction {
            message: format!("Expecting {file_name} to end in \".{MAPPING_EXTENSION}\""),
        });
    };
    let app = host_app_name(&stem.to_uppercase()).ok_or_else(|| Error::Extraction {
        message: format!("{file_name} does not name a known host"),
    })?;

    let content = fs::read_to_string(path)?;
    let rows: Vec<ExcerptMapping> = serde_yaml::from_str(&content).map_err(|e| Error::Extraction {
        message: format!("{file_name}: {e}"),
    })?;
    if rows.is_empty() {
        return Err(Error::Extraction {
            message: format!("{file_name}: no data rows found"),
        });
    }
    Ok((app, rows))
}

/// Cut `function <name>(...)` out of `script`, through the closing brace at
/// the declaration's indentation, and dedent it.
pub fn extract_function(script: &str, name: &str) -> Result<Option<String>> {
    let declaration = Regex::new(&format!(
        r"^(?P<indent>\s*)(?:export\s+)?(?:async\s+)?function\s+{}\s*\(",
        regex::escape(name)
    ))?;

    let lines: Vec<&str> = script.lines().collect();
    let Some((start, indent)) = lines.iter().enumerate().find_map(|(i, line)| {
        declaration
            .captures(line)
            .and_then(|caps| caps.name("indent"))
            .map(|m| (i, m.as_str().to_string()))
    }) else {
        return Ok(None);
    };

    let closing = format!("{indent}}}");
    let Some(end) = (start..lines.len()).find(|&i| lines[i].trim_end() == closing) else {
        return Ok(None);
    };

    let excerpt = lines[start..=end]
        .iter()
        .map(|line| line.strip_prefix(indent.as_str()).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Some(excerpt))
}

/// Build the excerpt set for one host's mapping rows.
///
/// Rows that cannot be satisfied are reported in the returned error list.
pub fn extract_for_host(
    app: &str,
    rows: &[ExcerptMapping],
    snippets: &BTreeMap<&str, &ProcessedSnippet>,
) -> (Excerpts, Vec<Error>) {
    let mut excerpts = Excerpts::new();
    let mut errors = Vec::new();

    for row in rows {
        let Some(snippet) = snippets.get(row.snippet_id.as_str()) else {
            errors.push(Error::Extraction {
                message: format!(
                    "Snippet \"{}\" referenced by {}.{}#{} does not exist",
                    row.snippet_id, app, row.class, row.member
                ),
            });
            continue;
        };

        match extract_function(&snippet.script, &row.function_name) {
            Ok(Some(text)) => excerpts
                .entry(format!("{}.{}#{}:member", app, row.class, row.member))
                .or_default()
                .push(text),
            Ok(None) => errors.push(Error::Extraction {
                message: format!(
                    "Function \"{}\" not found in snippet \"{}\"",
                    row.function_name, row.snippet_id
                ),
            }),
            Err(e) => errors.push(e),
        }
    }
    (excerpts, errors)
}

/// Executes Phase 6 of the pipeline.
///
/// Does nothing when the metadata directory is absent. With `write` unset the
/// mappings are still checked but no output is produced. Returns the output
/// path, if written, and every error found.
pub fn execute(
    snippets: &[&ProcessedSnippet],
    ctx: &BuildContext,
    write: bool,
) -> (Option<PathBuf>, Vec<Error>) {
    let metadata_dir = ctx.extractor_metadata_path();
    if !metadata_dir.is_dir() {
        debug!("No excerpt metadata at {}", metadata_dir.display());
        return (None, Vec::new());
    }

    let by_id: BTreeMap<&str, &ProcessedSnippet> =
        snippets.iter().map(|s| (s.id.as_str(), *s)).collect();
    let mut excerpts = Excerpts::new();
    let mut errors = Vec::new();

    let mut entries: Vec<PathBuf> = match fs::read_dir(&metadata_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => return (None, vec![Error::Io(e)]),
    };
    entries.sort();

    for path in entries {
        match load_mapping_file(&path) {
            Ok((app, rows)) => {
                info!("Extracting reference-doc excerpts for {app}");
                let (host_excerpts, host_errors) = extract_for_host(app, &rows, &by_id);
                for (key, mut texts) in host_excerpts {
                    excerpts.entry(key).or_default().append(&mut texts);
                }
                errors.extend(host_errors);
            }
            Err(e) => errors.push(e),
        }
    }

    if !write {
        return (None, errors);
    }

    let output_dir = ctx.extractor_output_path();
    let output_path = output_dir.join(OUTPUT_FILE_NAME);
    let written = serde_yaml::to_string(&excerpts)
        .map_err(Error::from)
        .and_then(|contents| {
            fs::create_dir_all(&output_dir)?;
            fs::write(&output_path, contents)?;
            Ok(output_path)
        });
    match written {
        Ok(path) => (Some(path), errors),
        Err(e) => {
            errors.push(e);
            (None, errors)
        }
    }
}
