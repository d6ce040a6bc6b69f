//! Implementation of the phases of a snippet build.
//!
//! ## Overview
//!
//! A build runs these phases in order:
//! 1. Discovery - Walk the public and private corpora, enforce the tree layout
//! 2. Processing - Validate and correct every snippet file in parallel
//! 3. Uniqueness - Reject ids shared by more than one snippet
//! 4. Writing - Flush the queued canonical rewrites in one parallel pass
//! 5. Playlists - Emit per-host playlists and id indexes concurrently
//! 6. Extraction - Pull reference-doc excerpts out of snippet scripts
//!
//! Phase 1 is the only one that aborts the run. Later phases report problems
//! as [`Diagnostic`] values or stage errors collected into a [`BuildReport`],
//! and the caller decides the exit status once everything has run.

use std::path::PathBuf;

use crate::snippet::ApiSet;

// Phase modules
pub mod discovery;
pub mod extraction;
pub mod orchestrator;
pub mod playlist;
pub mod processing;
pub mod uniqueness;
pub mod write;

pub use discovery as phase1;
pub use extraction as phase6;
pub use playlist as phase5;
pub use processing as phase2;
pub use uniqueness as phase3;
pub use write as phase4;

/// A snippet file found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetFile {
    /// Absolute (or root-joined) path on disk.
    pub full_path: PathBuf,
    /// Corpus directory name, such as `samples`.
    pub corpus_dir: String,
    /// `/`-separated path below the corpus directory.
    pub relative_path: String,
    /// Host directory segment as written on disk (lowercase).
    pub host_dir: String,
    /// Group directory segment; the host segment for files directly under it.
    pub group: String,
    pub file_name: String,
    pub is_public: bool,
}

impl SnippetFile {
    /// Path shown to users, relative to the repository root.
    pub fn display_path(&self) -> String {
        format!("{}/{}", self.corpus_dir, self.relative_path)
    }
}

/// How serious a per-file finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// An automatic correction or note; does not fail the build.
    Info,
    /// Fails the build, but the file is still projected.
    Error,
}

/// One finding about one snippet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The projection of a validated snippet used by the cross-file phases.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSnippet {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub relative_path: String,
    pub full_path: PathBuf,
    pub description: String,
    pub host: String,
    pub raw_url: String,
    pub group: String,
    pub order: i64,
    pub api_set: ApiSet,
    pub is_public: bool,
    /// Script source, kept for excerpt extraction.
    pub script: String,
}

/// A canonical rewrite queued during processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything processing learned about one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file: SnippetFile,
    pub diagnostics: Vec<Diagnostic>,
    /// `None` when the file failed validation outright.
    pub processed: Option<ProcessedSnippet>,
    pub pending_write: Option<PendingWrite>,
}

impl FileOutcome {
    pub fn has_errors(&self) -> bool {
        self.processed.is_none() || self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// A snippet whose id is also claimed by other snippets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub id: String,
    /// Display path of the snippet being reported.
    pub path: String,
    /// Display paths of the other snippets sharing the id.
    pub others: Vec<String>,
}

/// Aggregate result of a build or check run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub files: Vec<FileOutcome>,
    pub collisions: Vec<Collision>,
    /// Errors raised by whole stages (writing, playlists, extraction).
    pub errors: Vec<String>,
    /// Snippet files rewritten in canonical form.
    pub written: Vec<PathBuf>,
    /// Snippet files that differ from their canonical form but were not written.
    pub pending: Vec<PathBuf>,
    /// Playlist and index files emitted.
    pub playlists: Vec<PathBuf>,
    pub excerpts: Option<PathBuf>,
}

impl BuildReport {
    /// Files that failed validation or carry an error-class diagnostic.
    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|outcome| outcome.has_errors())
    }

    pub fn error_count(&self) -> usize {
        self.failed_files().count() + self.collisions.len() + self.errors.len()
    }

    /// Whether the build produced no errors and no id collisions.
    pub fn succeeded(&self) -> bool {
        self.error_count() == 0
    }

    /// Projected snippets in discovery order.
    pub fn processed(&self) -> impl Iterator<Item = &ProcessedSnippet> {
        self.files
            .iter()
            .filter_map(|outcome| outcome.processed.as_ref())
    }
}
