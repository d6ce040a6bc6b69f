//! Library reference processing
//!
//! A snippet's `libraries` field is a newline-delimited list mixing comments,
//! bare npm package references (`jquery@3.1.1`), DefinitelyTyped typings
//! (`@types/jquery`, legacy `dt~jquery`), direct URLs, and the host-runtime
//! reference (`office.js`). This module classifies those lines, rewrites them
//! into canonical form, and enforces the rules that cannot be auto-corrected.
//!
//! Every rewrite works line by line so the author's ordering, blank lines, and
//! comments survive untouched.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::defaults::{
    OFFICE_JS, OFFICE_JS_HOSTS, OFFICE_JS_PREVIEW, OFFICE_TYPINGS, OFFICE_TYPINGS_PREVIEW,
    PREVIEW_GROUP,
};
use crate::error::{Error, Result};
use crate::naming::strip_numeric_prefix;

const UNPKG_PREFIX: &str = "https://unpkg.com/";

/// `[@scope/]name[@version][/path]`
static PACKAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>(?:@[^/@\s]+/)?[^/@\s]+)(?:@(?P<version>[^/\s]+))?(?P<path>/\S*)?$")
        .expect("package reference pattern is valid")
});

/// Resolved references, as consumed by a snippet renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryReferences {
    /// Script URLs loaded inside the sandboxed frame.
    pub script_references: Vec<String>,
    /// Stylesheet URLs.
    pub link_references: Vec<String>,
    /// The host-runtime script, which must be loaded outside the sandbox.
    pub office_js: Option<String>,
}

/// A package reference split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
    pub path: Option<&'a str>,
}

impl<'a> PackageReference<'a> {
    /// Parse `[@scope/]name[@version][/path]`.
    pub fn parse(text: &'a str) -> Option<Self> {
        let caps = PACKAGE_REFERENCE.captures(text)?;
        Some(Self {
            name: caps.name("name")?.as_str(),
            version: caps.name("version").map(|m| m.as_str()),
            path: caps.name("path").map(|m| m.as_str()),
        })
    }

    /// The reference with any version removed, as used for pin lookups.
    pub fn unversioned(&self) -> String {
        format!("{}{}", self.name, self.path.unwrap_or(""))
    }

    /// Whether the reference carries a semantic-version pin (`X.Y` or `X.Y.Z`).
    pub fn is_pinned(&self) -> bool {
        self.version.is_some_and(|v| parse_pin(v).is_ok())
    }
}

/// Parse a version pin, accepting the two-component `X.Y` shorthand.
pub fn parse_pin(version: &str) -> Result<semver::Version> {
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let padded = if version[..core_end].matches('.').count() == 1 {
        format!("{}.0{}", &version[..core_end], &version[core_end..])
    } else {
        version.to_string()
    };
    Ok(semver::Version::parse(&padded)?)
}

/// A pin substituted for an unversioned reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// Result of checking every reference for a version pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinOutcome {
    /// The rewritten `libraries` text.
    pub libraries: String,
    /// References that were replaced with a known-good pin.
    pub substitutions: Vec<Substitution>,
    /// References that lack a pin and have no known replacement.
    pub unpinned: Vec<String>,
}

/// Two references where the presence of the first requires the second.
#[derive(Debug, Clone, Copy)]
pub struct PairedReferenceRule {
    pub primary: &'static str,
    pub secondary: &'static str,
}

/// Co-occurrence rules checked by [`check_paired_references`].
///
/// The runtime/typings pairing is enforced separately by
/// [`validate_office_references`] because it also constrains the values.
pub const PAIRED_REFERENCE_RULES: &[PairedReferenceRule] = &[PairedReferenceRule {
    primary: "/dist/css/fabric.min.css",
    secondary: "/dist/css/fabric.components.min.css",
}];

fn is_comment(text: &str) -> bool {
    text.starts_with('#') || text.starts_with("//") || text.starts_with("/*") || text.ends_with("*/")
}

fn is_url(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("ftp://")
}

fn last_segment(text: &str) -> String {
    text.rsplit('/').next().unwrap_or(text).to_ascii_lowercase()
}

/// Whether a trimmed line references the host runtime script.
pub fn is_office_js_reference(text: &str) -> bool {
    matches!(last_segment(text).as_str(), "office.js" | "office.debug.js")
}

/// Whether a trimmed line references the host runtime typings.
pub fn is_office_typings_reference(text: &str) -> bool {
    text.to_ascii_lowercase().starts_with("@types/office-js") || last_segment(text) == "office.d.ts"
}

/// Non-blank, non-comment lines, trimmed.
fn reference_lines(libraries: &str) -> impl Iterator<Item = &str> {
    libraries
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_comment(line))
}

/// Apply `rewrite` to the trimmed text of each reference line, keeping the
/// line's surrounding whitespace and every other line as-is.
fn rewrite_lines<F>(libraries: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    libraries
        .split('\n')
        .map(|line| {
            let text = line.trim();
            if text.is_empty() || is_comment(text) {
                return line.to_string();
            }
            match rewrite(text) {
                Some(replacement) => {
                    let start = line.len() - line.trim_start().len();
                    let end = start + text.len();
                    format!("{}{}{}", &line[..start], replacement, &line[end..])
                }
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve the `libraries` field into script, link, and runtime references.
///
/// Typings and comments are skipped; a reference without a scheme resolves
/// against unpkg. The build itself only validates references; this is the
/// entry point for renderers that load a snippet's libraries into a page.
///
/// ```
/// use snippet_build::libraries::process_libraries;
///
/// let refs = process_libraries("jquery@3.1.1\n@types/jquery\nfabric@1.0/fabric.css");
/// assert_eq!(refs.script_references, ["https://unpkg.com/jquery@3.1.1"]);
/// assert_eq!(refs.link_references, ["https://unpkg.com/fabric@1.0/fabric.css"]);
/// assert_eq!(refs.office_js, None);
/// ```
pub fn process_libraries(libraries: &str) -> LibraryReferences {
    let mut refs = LibraryReferences::default();

    for text in reference_lines(libraries) {
        if text.starts_with("@types") || text.starts_with("dt~") || text.to_ascii_lowercase().ends_with(".d.ts") {
            continue;
        }

        let resolved = if is_url(text) {
            text.to_string()
        } else {
            format!("{UNPKG_PREFIX}{text}")
        };

        if resolved.to_ascii_lowercase().ends_with(".css") {
            refs.link_references.push(resolved);
        } else if is_office_js_reference(&resolved) {
            refs.office_js = Some(resolved);
        } else {
            refs.script_references.push(resolved);
        }
    }

    refs
}

/// Rewrite DefinitelyTyped shorthand (`dt~name`) into `@types/name`.
///
/// Returns `None` when nothing needed rewriting.
pub fn rewrite_definitely_typed(libraries: &str) -> Option<String> {
    let rewritten = rewrite_lines(libraries, |text| {
        text.strip_prefix("dt~").map(|name| format!("@types/{name}"))
    });
    (rewritten != libraries).then_some(rewritten)
}

/// Check the runtime and typings references against the host's needs.
///
/// Hosts that run inside Office.js need exactly one of each, matching the
/// canonical references (or their preview variants in a `preview-apis`
/// group). Every other host must reference neither.
pub fn validate_office_references(libraries: &str, host: &str, group: &str) -> Result<()> {
    let runtime: Vec<&str> = reference_lines(libraries)
        .filter(|text| is_office_js_reference(text))
        .collect();
    let typings: Vec<&str> = reference_lines(libraries)
        .filter(|text| is_office_typings_reference(text))
        .collect();

    if !OFFICE_JS_HOSTS.contains(&host) {
        if runtime.is_empty() && typings.is_empty() {
            return Ok(());
        }
        return Err(Error::Library {
            message: format!(
                "Host \"{host}\" does not run in Office.js, so it must not reference office.js or its typings"
            ),
        });
    }

    let preview = strip_numeric_prefix(group) == PREVIEW_GROUP;

    let runtime_ref = expect_single(&runtime, "office.js")?;
    let mut allowed_runtime = vec![OFFICE_JS];
    if preview {
        allowed_runtime.push(OFFICE_JS_PREVIEW);
    }
    if !allowed_runtime.contains(&runtime_ref) {
        return Err(Error::Library {
            message: format!(
                "Invalid office.js reference \"{runtime_ref}\"; expected \"{}\"",
                allowed_runtime.join("\" or \"")
            ),
        });
    }

    let typings_ref = expect_single(&typings, "the Office.js typings (@types/office-js)")?;
    let mut allowed_typings: Vec<&str> = OFFICE_TYPINGS.to_vec();
    if preview {
        allowed_typings.extend_from_slice(OFFICE_TYPINGS_PREVIEW);
    }
    if !allowed_typings.contains(&typings_ref) {
        return Err(Error::Library {
            message: format!(
                "Invalid typings reference \"{typings_ref}\"; expected one of \"{}\"",
                allowed_typings.join("\", \"")
            ),
        });
    }

    Ok(())
}

fn expect_single<'a>(found: &[&'a str], what: &str) -> Result<&'a str> {
    match found {
        [single] => Ok(*single),
        [] => Err(Error::Library {
            message: format!("Snippet is missing a reference to {what}"),
        }),
        _ => Err(Error::Library {
            message: format!(
                "Snippet has {} references to {what}; expected exactly one",
                found.len()
            ),
        }),
    }
}

/// Ensure every npm reference (bare or served from unpkg) carries a version.
///
/// Unversioned references found in `pins` are replaced; the rest are reported
/// in [`PinOutcome::unpinned`]. Runtime and typings references are exempt
/// since [`validate_office_references`] already fixes their exact form.
pub fn pin_library_versions(libraries: &str, pins: &BTreeMap<String, String>) -> PinOutcome {
    let mut substitutions = Vec::new();
    let mut unpinned = Vec::new();

    let rewritten = rewrite_lines(libraries, |text| {
        if is_office_js_reference(text) || is_office_typings_reference(text) {
            return None;
        }

        let (prefix, reference) = if is_url(text) {
            let lower = text.to_ascii_lowercase();
            if !lower.starts_with(UNPKG_PREFIX) {
                return None;
            }
            text.split_at(UNPKG_PREFIX.len())
        } else {
            ("", text)
        };

        let Some(package) = PackageReference::parse(reference) else {
            unpinned.push(text.to_string());
            return None;
        };
        if package.is_pinned() {
            return None;
        }

        match pins.get(&package.unversioned()) {
            Some(pinned) => {
                let replacement = format!("{prefix}{pinned}");
                substitutions.push(Substitution {
                    from: text.to_string(),
                    to: replacement.clone(),
                });
                Some(replacement)
            }
            None => {
                unpinned.push(text.to_string());
                None
            }
        }
    });

    PinOutcome {
        libraries: rewritten,
        substitutions,
        unpinned,
    }
}

/// Enforce [`PAIRED_REFERENCE_RULES`].
pub fn check_paired_references(libraries: &str) -> Result<()> {
    for rule in PAIRED_REFERENCE_RULES {
        let has = |suffix: &str| {
            reference_lines(libraries).any(|text| text.to_ascii_lowercase().ends_with(suffix))
        };
        if has(rule.primary) && !has(rule.secondary) {
            return Err(Error::Library {
                message: format!(
                    "A reference ending in \"{}\" must be accompanied by one ending in \"{}\"",
                    rule.primary.trim_start_matches('/'),
                    rule.secondary.trim_start_matches('/')
                ),
            });
        }
    }
    Ok(())
}
