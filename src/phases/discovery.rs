//! Phase 1: Discovery
//!
//! This is the first phase of a snippet build. It walks the public and
//! private corpora and turns every snippet file into a [`SnippetFile`].
//!
//! ## Process
//!
//! 1.  **Walk**: Each corpus root is walked in file-name order, so results
//!     are deterministic across platforms. Hidden entries are skipped.
//!
//! 2.  **Layout**: Snippets live at `<host>/<group>/<file>.yaml` or directly at
//!     `<host>/<file>.yaml` (the group then collapses to the host). Anything
//!     nested deeper, and YAML files at the corpus root, abort the run.
//!
//! 3.  **Naming**: Every directory name and every snippet file stem must follow
//!     the naming guidelines. The first violation aborts the run.
//!
//! Files that are not `.yaml` are ignored. A missing public corpus is an
//! error; a missing private corpus is not.

use std::path::Path;

use log::debug;
use walkdir::{DirEntry, WalkDir};

use super::SnippetFile;
use crate::config::BuildContext;
use crate::error::{Error, Result};
use crate::naming::follows_naming_guidelines;

const SNIPPET_EXTENSION: &str = "yaml";

/// Deepest directory level a snippet may sit in (`<host>/<group>`).
const MAX_DIR_DEPTH: usize = 2;

/// Executes Phase 1 of the pipeline.
///
/// Returns public snippets first, then private ones.
pub fn execute(ctx: &BuildContext) -> Result<Vec<SnippetFile>> {
    let public_root = ctx.root.join(&ctx.samples_dir);
    if !public_root.is_dir() {
        return Err(Error::Structure {
            path: public_root.display().to_string(),
            message: "snippet directory not found".to_string(),
        });
    }
    let mut files = discover_corpus(&public_root, &ctx.samples_dir, true)?;

    let private_root = ctx.root.join(&ctx.private_samples_dir);
    if private_root.is_dir() {
        files.extend(discover_corpus(
            &private_root,
            &ctx.private_samples_dir,
            false,
        )?);
    } else {
        debug!("No private corpus at {}", private_root.display());
    }

    debug!("Discovered {} snippet files", files.len());
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Discover the snippet files of a single corpus rooted at `root`.
pub fn discover_corpus(root: &Path, corpus_dir: &str, is_public: bool) -> Result<Vec<SnippetFile>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Structure {
            path: e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| root.display().to_string()),
            message: format!("cannot read directory entry: {e}"),
        })?;

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::Structure {
                path: entry.path().display().to_string(),
                message: e.to_string(),
            })?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let display_path = format!("{}/{}", corpus_dir, segments.join("/"));

        if entry.file_type().is_dir() {
            if entry.depth() > MAX_DIR_DEPTH {
                return Err(Error::Structure {
                    path: display_path,
                    message: format!(
                        "snippets may only be nested {MAX_DIR_DEPTH} directories deep (<host>/<group>)"
                    ),
                });
            }
            if !follows_naming_guidelines(&segments[segments.len() - 1]) {
                return Err(Error::Naming { path: display_path });
            }
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SNIPPET_EXTENSION) {
            debug!("Ignoring non-snippet file {display_path}");
            continue;
        }
        if entry.depth() == 1 {
            return Err(Error::Structure {
                path: display_path,
                message: "snippets must be inside a host directory".to_string(),
            });
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !follows_naming_guidelines(&stem) {
            return Err(Error::Naming { path: display_path });
        }

        let host_dir = segments[0].clone();
        let group = if segments.len() == 3 {
            segments[1].clone()
        } else {
            host_dir.clone()
        };

        files.push(SnippetFile {
            full_path: path.to_path_buf(),
            corpus_dir: corpus_dir.to_string(),
            relative_path: segments.join("/"),
            host_dir,
            group,
            file_name: segments[segments.len() - 1].clone(),
            is_public,
        });
    }

    Ok(files)
}
