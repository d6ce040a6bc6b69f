//! # Snippet Build Library
//!
//! This library validates, canonicalizes, and publishes the sample snippets of
//! a documentation-sample repository for a multi-host add-in platform. It is
//! designed to be used by the `snippet-build` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use snippet_build::canonical::canonicalize;
//! use snippet_build::naming::normalize_id;
//! use snippet_build::snippet;
//!
//! assert_eq!(normalize_id("excel/01-basics/Basic Call.yaml"), "excel-01-basics-basic-call");
//!
//! let parsed = snippet::parse("excel/basics/a.yaml", "name: A\nid: a\nhost: EXCEL\n").unwrap();
//! assert_eq!(
//!     canonicalize(&parsed, "Microsoft"),
//!     "id: a\nname: A\nauthor: Microsoft\nhost: EXCEL\n"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Naming (`naming`)**: slug rules for paths and ids, id normalization.
//! - **Libraries (`libraries`)**: classification, canonicalization, and
//!   version pinning of a snippet's library references, plus
//!   [`libraries::process_libraries`] for renderers that resolve them to URLs.
//! - **Snippets (`snippet`, `canonical`)**: the document model, field
//!   visibility, and the deterministic YAML layout snippets are stored in.
//! - **Configuration (`config`, `defaults`)**: the optional
//!   `.snippet-build.yaml` and the compiled-in tables it overrides.
//! - **Phases (`phases`)**: the build pipeline.
//!
//! ## Execution Flow
//!
//! The main entry point is [`phases::orchestrator::execute_build`]:
//!
//! 1.  **Discovery**: Walk the corpora and enforce the tree layout.
//! 2.  **Processing**: Validate and correct every snippet in parallel.
//! 3.  **Uniqueness**: Reject duplicated ids.
//! 4.  **Writing**: Flush canonical rewrites.
//! 5.  **Playlists**: Emit per-host playlists and indexes.
//! 6.  **Extraction**: Emit reference-doc excerpts.

pub mod canonical;
pub mod config;
pub mod defaults;
pub mod error;
pub mod libraries;
pub mod naming;
pub mod output;
pub mod phases;
pub mod snippet;
pub mod suggestions;

// Property-based tests
#[cfg(test)]
mod canonical_proptest;
#[cfg(test)]
mod naming_proptest;
