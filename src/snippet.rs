//! # Snippet Model and Field Schema
//!
//! A snippet is a YAML document describing one sample: its metadata (`id`,
//! `name`, `description`, `host`, `api_set`), three code blocks (`script`,
//! `template`, `style`), and a newline-delimited `libraries` list.
//!
//! ## Field visibility
//!
//! Every top-level field belongs to exactly one [`FieldVisibility`] class:
//!
//! - **PUBLIC**: stored, and included when the snippet is shared.
//! - **INTERNAL**: stored, but never shared (`id`, `gist`, timestamps).
//! - **TRANSIENT**: only meaningful at runtime, never stored.
//!
//! `author`, `api_set`, and `order` are absent from the table on purpose: they
//! are always regenerated by the canonical serializer rather than copied.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitOr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// One code block of a snippet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
}

/// A requirement-set version such as `1.1` or `1.10`.
///
/// Kept as the scalar text it was written as: `1.10` and `1.1` are different
/// requirement sets, so the value never goes through a float.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion(String);

/// Requirement-set name to version.
pub type ApiSet = BTreeMap<String, ApiVersion>;

impl ApiVersion {
    pub fn new(text: impl Into<String>) -> Self {
        ApiVersion(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApiVersion {
    fn from(text: &str) -> Self {
        ApiVersion::new(text)
    }
}

impl Serialize for ApiVersion {
    /// Written as a number when the number reads back as the same text, so
    /// `1.1` stays numeric in playlists and `1.10` stays a string.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let Ok(number) = self.0.parse::<u64>() {
            if number.to_string() == self.0 {
                return serializer.serialize_u64(number);
            }
        }
        match self.0.parse::<f64>() {
            Ok(number) if number.is_finite() && number.to_string() == self.0 => {
                serializer.serialize_f64(number)
            }
            _ => serializer.serialize_str(&self.0),
        }
    }
}

struct ApiVersionVisitor;

impl Visitor<'_> for ApiVersionVisitor {
    type Value = ApiVersion;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a version number or string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ApiVersion, E> {
        Ok(ApiVersion::new(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ApiVersion, E> {
        Ok(ApiVersion::new(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ApiVersion, E> {
        Ok(ApiVersion::new(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<ApiVersion, E> {
        Ok(ApiVersion::new(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    // `serde_yaml` hands plain scalars to `deserialize_str` as their source
    // text, which keeps trailing zeros.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_str(ApiVersionVisitor)
    }
}

/// A snippet document as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_set: Option<ApiSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libraries: Option<String>,
}

/// Visibility class of a snippet field, combinable into a keep-mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldVisibility(u8);

impl FieldVisibility {
    pub const PUBLIC: Self = Self(1 << 0);
    pub const INTERNAL: Self = Self(1 << 1);
    pub const TRANSIENT: Self = Self(1 << 2);

    /// Whether the two masks share any class.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for FieldVisibility {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Visibility of every field that [`scrub`] may copy.
pub const SNIPPET_FIELDS: &[(&str, FieldVisibility)] = &[
    ("id", FieldVisibility::INTERNAL),
    ("gist", FieldVisibility::INTERNAL),
    ("name", FieldVisibility::PUBLIC),
    ("description", FieldVisibility::PUBLIC),
    ("host", FieldVisibility::PUBLIC),
    ("platform", FieldVisibility::TRANSIENT),
    ("origin", FieldVisibility::TRANSIENT),
    ("created_at", FieldVisibility::INTERNAL),
    ("modified_at", FieldVisibility::INTERNAL),
    ("script", FieldVisibility::PUBLIC),
    ("template", FieldVisibility::PUBLIC),
    ("style", FieldVisibility::PUBLIC),
    ("libraries", FieldVisibility::PUBLIC),
];

/// Look up the visibility class of a field.
pub fn field_visibility(field: &str) -> Option<FieldVisibility> {
    SNIPPET_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, visibility)| *visibility)
}

/// Return a copy of the snippet holding only the fields whose class is in `keep`.
///
/// Fields outside the visibility table (`author`, `api_set`, `order`) are
/// always dropped.
pub fn scrub(snippet: &Snippet, keep: FieldVisibility) -> Snippet {
    let kept = |field: &str| field_visibility(field).is_some_and(|v| v.intersects(keep));

    Snippet {
        order: None,
        id: snippet.id.clone().filter(|_| kept("id")),
        gist: snippet.gist.clone().filter(|_| kept("gist")),
        name: snippet.name.clone().filter(|_| kept("name")),
        description: snippet.description.clone().filter(|_| kept("description")),
        author: None,
        host: snippet.host.clone().filter(|_| kept("host")),
        api_set: None,
        platform: snippet.platform.clone().filter(|_| kept("platform")),
        origin: snippet.origin.clone().filter(|_| kept("origin")),
        created_at: snippet.created_at.filter(|_| kept("created_at")),
        modified_at: snippet.modified_at.filter(|_| kept("modified_at")),
        script: snippet.script.clone().filter(|_| kept("script")),
        template: snippet.template.clone().filter(|_| kept("template")),
        style: snippet.style.clone().filter(|_| kept("style")),
        libraries: snippet.libraries.clone().filter(|_| kept("libraries")),
    }
}

/// Prepare raw file text for parsing: drop a byte-order mark, normalize CRLF.
pub fn normalize_source(text: &str) -> String {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .replace("\r\n", "\n")
}

/// Parse a snippet from (already normalized) YAML text.
pub fn parse(path: &str, text: &str) -> Result<Snippet> {
    serde_yaml::from_str(text).map_err(|e| Error::SnippetParse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

impl Snippet {
    /// Mutable access to every multi-line text field.
    pub fn text_fields_mut(&mut self) -> Vec<&mut String> {
        let mut fields = Vec::with_capacity(4);
        for block in [&mut self.script, &mut self.template, &mut self.style]
            .into_iter()
            .flatten()
        {
            fields.push(&mut block.content);
        }
        if let Some(libraries) = self.libraries.as_mut() {
            fields.push(libraries);
        }
        fields
    }
}
