//! # Canonical Snippet Serialization
//!
//! Snippets are stored in one deterministic YAML layout so that diffs between
//! revisions only show real edits. The layout is:
//!
//! - keys in a fixed order (`order`, `id`, `name`, `description`, `author`,
//!   `host`, `api_set`, `script`, `template`, `style`, `libraries`), with
//!   `content` before `language` inside code blocks;
//! - 4-space indentation and no line wrapping;
//! - multi-line text as literal block scalars, single-line text plain when
//!   unambiguous and single-quoted otherwise;
//! - no carriage returns anywhere.
//!
//! `serde_yaml` only emits 2-space indentation and picks its own scalar
//! styles, so the emitter here is hand-written. Parsing the result back still
//! goes through `serde_yaml`, and the layout is stable under that round trip:
//! `canonicalize(parse(canonicalize(s))) == canonicalize(s)`.

use std::fmt::Write as _;

use crate::defaults::DEFAULT_ORDER;
use crate::snippet::{scrub, ApiSet, ApiVersion, Content, FieldVisibility, Snippet};

const INDENT: &str = "    ";

/// Serialize a snippet into its canonical stored form.
///
/// Only public fields are kept; `id` and `api_set` are carried over, `author`
/// is forced to `author`, and `order` is written only when it differs from the
/// default.
pub fn canonicalize(snippet: &Snippet, author: &str) -> String {
    let mut canonical = scrub(snippet, FieldVisibility::PUBLIC);
    canonical.id = snippet.id.clone();
    canonical.api_set = snippet.api_set.clone();
    canonical.author = Some(author.to_string());
    canonical.order = snippet.order.filter(|order| *order != DEFAULT_ORDER);
    strip_carriage_returns(&mut canonical);

    let mut out = String::new();
    if let Some(order) = canonical.order {
        let _ = writeln!(out, "order: {order}");
    }
    for (key, value) in [
        ("id", &canonical.id),
        ("name", &canonical.name),
        ("description", &canonical.description),
        ("author", &canonical.author),
        ("host", &canonical.host),
    ] {
        if let Some(value) = value {
            emit_text(&mut out, 0, key, value);
        }
    }
    if let Some(api_set) = &canonical.api_set {
        emit_api_set(&mut out, api_set);
    }
    for (key, block) in [
        ("script", &canonical.script),
        ("template", &canonical.template),
        ("style", &canonical.style),
    ] {
        if let Some(block) = block {
            emit_content(&mut out, key, block);
        }
    }
    if let Some(libraries) = &canonical.libraries {
        emit_text(&mut out, 0, "libraries", libraries);
    }
    out
}

fn strip_carriage_returns(snippet: &mut Snippet) {
    for field in snippet.text_fields_mut() {
        field.retain(|c| c != '\r');
    }
    if let Some(description) = snippet.description.as_mut() {
        description.retain(|c| c != '\r');
    }
}

fn emit_api_set(out: &mut String, api_set: &ApiSet) {
    if api_set.is_empty() {
        out.push_str("api_set: {}\n");
        return;
    }
    out.push_str("api_set:\n");
    for (name, version) in api_set {
        let _ = writeln!(out, "{INDENT}{}: {}", inline_scalar(name), version_scalar(version));
    }
}

fn emit_content(out: &mut String, key: &str, block: &Content) {
    let _ = writeln!(out, "{key}:");
    emit_text(out, 1, "content", &block.content);
    emit_text(out, 1, "language", &block.language);
}

/// Emit `key: value` at the given nesting level.
fn emit_text(out: &mut String, level: usize, key: &str, value: &str) {
    let indent = INDENT.repeat(level);
    if value.contains('\n') && is_block_safe(value) {
        let _ = writeln!(out, "{indent}{key}: |{}", block_header(value));
        let body = value.strip_suffix('\n').unwrap_or(value);
        let inner = INDENT.repeat(level + 1);
        for line in body.split('\n') {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "{inner}{line}");
            }
        }
    } else {
        let _ = writeln!(out, "{indent}{key}: {}", inline_scalar(value));
    }
}

/// Indentation and chomping indicators for a literal block.
fn block_header(value: &str) -> String {
    let mut header = String::new();
    if value.starts_with([' ', '\n']) {
        header.push_str(&INDENT.len().to_string());
    }
    if !value.ends_with('\n') {
        header.push('-');
    } else if value.ends_with("\n\n") || value == "\n" {
        header.push('+');
    }
    header
}

/// Literal blocks cannot carry control characters other than newline and tab,
/// Unicode line or paragraph separators (YAML reads them as line breaks), nor
/// start with a tab. Such values fall back to double quotes.
fn is_block_safe(value: &str) -> bool {
    !value.chars().any(|c| c != '\n' && c != '\t' && needs_escape(c)) && !value.starts_with('\t')
}

/// Characters a YAML reader rejects or treats as line breaks when written
/// raw; they are only representable as double-quoted escapes.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{feff}' | '\u{2028}' | '\u{2029}' | '\u{fffe}' | '\u{ffff}')
}

/// Render a single-line scalar: plain, single-quoted, or double-quoted.
fn inline_scalar(value: &str) -> String {
    if value.chars().any(needs_escape) {
        return double_quoted(value);
    }
    if is_plain_safe(value) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if needs_escape(c) => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether a string can be written without quotes and read back unchanged.
fn is_plain_safe(value: &str) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ];

    let Some(first) = value.chars().next() else {
        return false;
    };
    if first.is_whitespace() || value.ends_with(char::is_whitespace) {
        return false;
    }
    if INDICATORS.contains(&first) {
        return false;
    }
    if value.contains(": ") || value.contains(" #") || value.ends_with(':') {
        return false;
    }
    if is_reserved_word(value) {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(value),
        Ok(serde_yaml::Value::String(ref parsed)) if parsed == value
    )
}

/// Words some YAML readers resolve to booleans or null.
fn is_reserved_word(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "y" | "n" | "null" | "~"
    )
}

/// Versions that read as YAML numbers stay plain, since they are parsed back
/// as their source text. Anything else is written like other text.
fn version_scalar(version: &ApiVersion) -> String {
    let text = version.as_str();
    match serde_yaml::from_str::<serde_yaml::Value>(text) {
        Ok(serde_yaml::Value::Number(_)) if !text.contains(char::is_whitespace) => text.to_string(),
        _ => inline_scalar(text),
    }
}
