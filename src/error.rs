//! # Error Handling
//!
//! This module defines the centralized error type for `snippet-build`. It uses
//! the `thiserror` library to describe every failure mode the pipeline can hit,
//! with enough context (paths, messages, hints) to print a useful diagnostic.
//!
//! ## Error classes
//!
//! Errors fall into three groups, matching how the build reacts to them:
//!
//! - **Structural** (`Structure`, `Naming`, `Io` during discovery): the corpus
//!   layout itself is wrong. The run aborts before any playlist is generated.
//! - **Per-file** (`SnippetParse`, `Snippet`, `Library`): one snippet cannot be
//!   processed. The file is dropped from the projection set and the message is
//!   accumulated, while other files continue.
//! - **Everything else** (`Config`, `Extraction`, `Filesystem`, wrapped library
//!   errors): reported as build errors by whichever stage hit them.
//!
//! Non-fatal findings (auto-corrections, substituted defaults) are not errors
//! at all; they travel as [`crate::phases::Diagnostic`] values.

use thiserror::Error;

/// Main error type for snippet-build operations
#[derive(Error, Debug)]
pub enum Error {
    /// The snippet tree has an invalid shape (too deep, unreadable, ...).
    #[error("Invalid snippet tree at {path}: {message}")]
    Structure { path: String, message: String },

    /// A path segment does not follow the naming guidelines.
    #[error("Invalid name at {path}. Name must only contain lowercase letters, numbers, and hyphens.")]
    Naming { path: String },

    /// A snippet file could not be parsed as YAML.
    #[error("Failed to parse {path}: {message}")]
    SnippetParse { path: String, message: String },

    /// A snippet failed a validation that cannot be auto-corrected.
    #[error("{message}")]
    Snippet { path: String, message: String },

    /// A `libraries` entry is structurally invalid.
    #[error("Library reference error: {message}")]
    Library { message: String },

    /// The build configuration could not be loaded.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Reference-doc excerpt extraction failed.
    #[error("Excerpt extraction error: {message}")]
    Extraction { message: String },

    /// A filesystem write or directory creation failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),
}

impl Error {
    /// Shorthand for a per-file validation failure.
    pub fn snippet(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Snippet {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run rather than a single file.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::Structure { .. } | Error::Naming { .. } | Error::Io(_)
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
