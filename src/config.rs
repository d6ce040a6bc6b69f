//! # Build Configuration
//!
//! This module defines the optional `.snippet-build.yaml` file that may sit at
//! the repository root, and the [`BuildContext`] that the pipeline receives.
//!
//! Every field of the file is optional. Anything left out falls back to the
//! compiled-in values in [`crate::defaults`]; the two tables (`api_set_defaults`
//! and `library_pins`) are merged entry by entry, so a config only needs to
//! list what it changes.
//!
//! ```yaml
//! samples_dir: samples
//! author: Microsoft
//! github:
//!   account: OfficeDev
//!   repo: office-js-snippets
//!   branch: main
//! library_pins:
//!   lodash: lodash@4.17.21
//! ```
//!
//! Repository coordinates given on the command line (or through `GH_ACCOUNT`,
//! `GH_REPO`, `GH_BRANCH`) take precedence over the `github` section.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::snippet::ApiSet;
use crate::suggestions;

/// Repository coordinates used to build `rawUrl`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoCoordinates {
    pub account: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
}

impl RepoCoordinates {
    /// Fill unset coordinates from `fallback`.
    pub fn or(self, fallback: RepoCoordinates) -> RepoCoordinates {
        RepoCoordinates {
            account: self.account.or(fallback.account),
            repo: self.repo.or(fallback.repo),
            branch: self.branch.or(fallback.branch),
        }
    }
}

/// Contents of `.snippet-build.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    pub samples_dir: Option<String>,
    pub private_samples_dir: Option<String>,
    pub playlists_dir: Option<String>,
    pub view_dir: Option<String>,
    pub extractor_metadata_dir: Option<String>,
    pub extractor_output_dir: Option<String>,
    pub author: Option<String>,
    pub raw_url_base: Option<String>,
    #[serde(default)]
    pub github: RepoCoordinates,
    #[serde(default)]
    pub api_set_defaults: BTreeMap<String, ApiSet>,
    #[serde(default)]
    pub library_pins: BTreeMap<String, String>,
}

/// Parse a configuration file's contents.
pub fn parse(yaml_content: &str) -> Result<BuildConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(BuildConfig::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: unknown_field_hint(&e.to_string()),
    })
}

/// Load the configuration file, if it exists.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("No configuration at {}, using defaults", path.display());
        return Ok(BuildConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Top-level fields accepted in `.snippet-build.yaml`.
pub const CONFIG_FIELDS: &[&str] = &[
    "samples_dir",
    "private_samples_dir",
    "playlists_dir",
    "view_dir",
    "extractor_metadata_dir",
    "extractor_output_dir",
    "author",
    "raw_url_base",
    "github",
    "api_set_defaults",
    "library_pins",
];

/// serde reports "unknown field `x`, expected ..."; suggest the closest field.
fn unknown_field_hint(message: &str) -> Option<String> {
    let rest = message.strip_prefix("unknown field `").or_else(|| {
        message
            .find("unknown field `")
            .map(|pos| &message[pos + "unknown field `".len()..])
    })?;
    let field = rest.split('`').next()?;
    Some(suggestions::unknown_config_field(field))
}

/// Everything the pipeline needs to know about where it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildContext {
    pub root: PathBuf,
    pub samples_dir: String,
    pub private_samples_dir: String,
    pub playlists_dir: String,
    pub view_dir: String,
    pub extractor_metadata_dir: String,
    pub extractor_output_dir: String,
    pub author: String,
    pub raw_url_base: String,
    pub account: String,
    pub repo: String,
    pub branch: String,
    pub api_set_defaults: BTreeMap<String, ApiSet>,
    pub library_pins: BTreeMap<String, String>,
}

impl BuildContext {
    /// Resolve a context from the loaded config and command-line coordinates.
    pub fn new(
        root: impl Into<PathBuf>,
        config: BuildConfig,
        coordinates: RepoCoordinates,
    ) -> Result<Self> {
        let coordinates = coordinates.or(config.github);

        let raw_url_base = config
            .raw_url_base
            .unwrap_or_else(|| defaults::RAW_URL_BASE.to_string());
        let parsed = url::Url::parse(&raw_url_base)?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("raw_url_base \"{raw_url_base}\" cannot be used as a base URL"),
                hint: Some("use an absolute http(s) URL".to_string()),
            });
        }

        let mut api_set_defaults = defaults::api_set_defaults();
        api_set_defaults.extend(config.api_set_defaults);
        let mut library_pins = defaults::library_pins();
        library_pins.extend(config.library_pins);

        Ok(Self {
            root: root.into(),
            samples_dir: config
                .samples_dir
                .unwrap_or_else(|| defaults::SAMPLES_DIR.to_string()),
            private_samples_dir: config
                .private_samples_dir
                .unwrap_or_else(|| defaults::PRIVATE_SAMPLES_DIR.to_string()),
            playlists_dir: config
                .playlists_dir
                .unwrap_or_else(|| defaults::PLAYLISTS_DIR.to_string()),
            view_dir: config
                .view_dir
                .unwrap_or_else(|| defaults::VIEW_DIR.to_string()),
            extractor_metadata_dir: config
                .extractor_metadata_dir
                .unwrap_or_else(|| defaults::EXTRACTOR_METADATA_DIR.to_string()),
            extractor_output_dir: config
                .extractor_output_dir
                .unwrap_or_else(|| defaults::EXTRACTOR_OUTPUT_DIR.to_string()),
            author: config
                .author
                .unwrap_or_else(|| defaults::AUTHOR.to_string()),
            raw_url_base: raw_url_base.trim_end_matches('/').to_string(),
            account: coordinates
                .account
                .unwrap_or_else(|| defaults::ACCOUNT_PLACEHOLDER.to_string()),
            repo: coordinates
                .repo
                .unwrap_or_else(|| defaults::REPO_PLACEHOLDER.to_string()),
            branch: coordinates
                .branch
                .unwrap_or_else(|| defaults::BRANCH_PLACEHOLDER.to_string()),
            api_set_defaults,
            library_pins,
        })
    }

    /// Context with compiled-in defaults rooted at `root`.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Result<Self> {
        Self::new(root, BuildConfig::default(), RepoCoordinates::default())
    }

    /// Load `.snippet-build.yaml` from `root` and resolve a context.
    pub fn load(root: impl Into<PathBuf>, coordinates: RepoCoordinates) -> Result<Self> {
        let root = root.into();
        let config = from_file(root.join(defaults::CONFIG_FILE_NAME))?;
        Self::new(root, config, coordinates)
    }

    pub fn playlists_path(&self) -> PathBuf {
        self.root.join(&self.playlists_dir)
    }

    pub fn view_path(&self) -> PathBuf {
        self.root.join(&self.view_dir)
    }

    pub fn extractor_metadata_path(&self) -> PathBuf {
        self.root.join(&self.extractor_metadata_dir)
    }

    pub fn extractor_output_path(&self) -> PathBuf {
        self.root.join(&self.extractor_output_dir)
    }

    /// Content address of a snippet file, from its corpus directory and its
    /// `/`-separated path relative to that directory.
    pub fn raw_url(&self, corpus_dir: &str, relative_path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.raw_url_base, self.account, self.repo, self.branch, corpus_dir, relative_path
        )
    }
}
