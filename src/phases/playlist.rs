//! Phase 5: Playlists and Indexes
//!
//! Once every snippet has been validated, this phase publishes two views of
//! the projection set, each split per host:
//!
//! - **Playlists** (`playlists/<host>.yaml`): public snippets only, sorted by
//!   `(group, order, id)`, with display-ready group names.
//! - **Indexes** (`view/<host>.json`): every snippet, public and private, as a
//!   map from `id` to `rawUrl`.
//!
//! Host `default.yaml` templates never appear in either view. The two views
//! are independent and are emitted concurrently.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::ProcessedSnippet;
use crate::config::BuildContext;
use crate::defaults::{DEFAULT_SNIPPET_FILE_NAME, GROUP_WORD_OVERRIDES};
use crate::error::{Error, Result};
use crate::naming::strip_numeric_prefix;
use crate::snippet::ApiSet;

/// One playlist row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub description: String,
    pub raw_url: String,
    pub group: String,
    #[serde(rename = "api_set")]
    pub api_set: ApiSet,
}

/// Playlist rows per lowercase host.
pub type Playlists = BTreeMap<String, Vec<PlaylistEntry>>;

/// `id -> rawUrl` per lowercase host.
pub type Indexes = BTreeMap<String, BTreeMap<String, String>>;

fn is_listed(snippet: &ProcessedSnippet) -> bool {
    snippet.file_name != DEFAULT_SNIPPET_FILE_NAME
}

/// Turn a group directory name into its display form.
///
/// ```
/// use snippet_build::phases::playlist::display_group;
///
/// assert_eq!(display_group("01-basics"), "Basics");
/// assert_eq!(display_group("85-preview-apis"), "Preview APIs");
/// ```
pub fn display_group(group: &str) -> String {
    strip_numeric_prefix(group)
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            let capitalized: String = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
            GROUP_WORD_OVERRIDES
                .iter()
                .find(|(from, _)| *from == capitalized)
                .map(|(_, to)| to.to_string())
                .unwrap_or(capitalized)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sort by raw group, then order, then id.
pub fn sort_snippets(snippets: &mut [&ProcessedSnippet]) {
    snippets.sort_by(|a, b| {
        a.group
            .cmp(&b.group)
            .then(a.order.cmp(&b.order))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Group the public, listed snippets into sorted per-host playlists.
pub fn build_playlists<'a, I>(snippets: I) -> Playlists
where
    I: IntoIterator<Item = &'a ProcessedSnippet>,
{
    let mut by_host: BTreeMap<String, Vec<&ProcessedSnippet>> = BTreeMap::new();
    for snippet in snippets {
        if snippet.is_public && is_listed(snippet) {
            by_host
                .entry(snippet.host.to_lowercase())
                .or_default()
                .push(snippet);
        }
    }

    by_host
        .into_iter()
        .map(|(host, mut items)| {
            sort_snippets(&mut items);
            let entries = items
                .into_iter()
                .map(|snippet| PlaylistEntry {
                    id: snippet.id.clone(),
                    name: snippet.name.clone(),
                    file_name: snippet.file_name.clone(),
                    description: snippet.description.clone(),
                    raw_url: snippet.raw_url.clone(),
                    group: display_group(&snippet.group),
                    api_set: snippet.api_set.clone(),
                })
                .collect();
            (host, entries)
        })
        .collect()
}

/// Map every listed snippet, public or private, from id to rawUrl.
pub fn build_indexes<'a, I>(snippets: I) -> Indexes
where
    I: IntoIterator<Item = &'a ProcessedSnippet>,
{
    let mut indexes = Indexes::new();
    for snippet in snippets {
        if is_listed(snippet) {
            indexes
                .entry(snippet.host.to_lowercase())
                .or_default()
                .insert(snippet.id.clone(), snippet.raw_url.clone());
        }
    }
    indexes
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", dir.display(), e),
    })?;
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })?;
    Ok(path)
}

/// Write one YAML playlist per host.
pub fn write_playlists(playlists: &Playlists, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (host, entries) in playlists {
        let contents = serde_yaml::to_string(entries)?;
        written.push(write_file(dir, &format!("{host}.yaml"), &contents)?);
    }
    Ok(written)
}

/// Write one JSON index per host.
pub fn write_indexes(indexes: &Indexes, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (host, index) in indexes {
        let mut contents = serde_json::to_string_pretty(index)?;
        contents.push('\n');
        written.push(write_file(dir, &format!("{host}.json"), &contents)?);
    }
    Ok(written)
}

/// Executes Phase 5 of the pipeline.
pub fn execute(snippets: &[&ProcessedSnippet], ctx: &BuildContext) -> Result<Vec<PathBuf>> {
    let playlists = build_playlists(snippets.iter().copied());
    let indexes = build_indexes(snippets.iter().copied());
    let playlists_dir = ctx.playlists_path();
    let view_dir = ctx.view_path();

    let (playlist_paths, index_paths) = rayon::join(
        || write_playlists(&playlists, &playlists_dir),
        || write_indexes(&indexes, &view_dir),
    );

    let mut written = playlist_paths?;
    written.extend(index_paths?);
    info!(
        "Wrote {} playlist(s) and {} index file(s)",
        playlists.len(),
        indexes.len()
    );
    Ok(written)
}
