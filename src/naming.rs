//! Naming and ID policy for snippet files
//!
//! Every directory and file name in the snippet tree, and every snippet `id`,
//! is a slug made of lowercase ASCII letters, digits, and hyphens. This module
//! holds the pure functions that check and produce such slugs.

/// Token removed from ids that were derived from a `preview-apis` group path.
const PREVIEW_APIS_INFIX: &str = "-preview-apis-";

/// Length of the collision-resistant ids that older tooling generated.
const MACHINE_ID_LENGTH: usize = 25;

/// Check whether a name is a valid slug (`^[a-z0-9-]+$`).
pub fn follows_naming_guidelines(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Detect ids that were generated by a machine rather than chosen by a person.
///
/// Such ids are technically valid but not memorable, so the validator replaces
/// them with one derived from the snippet's path.
pub fn looks_machine_generated(id: &str) -> bool {
    let id = id.trim();
    id.chars().count() == MACHINE_ID_LENGTH && !id.contains('-') && !id.contains('_')
}

/// Turn arbitrary text (a declared id or a relative path) into a snippet id.
///
/// The result is either empty or matches `^[a-z0-9-]+$` with no leading,
/// trailing, or doubled hyphens. Applying it twice yields the same value.
///
/// ```
/// use snippet_build::naming::normalize_id;
///
/// assert_eq!(normalize_id("excel/01-basics/Basic API Call.yaml"), "excel-01-basics-basic-api-call");
/// assert_eq!(normalize_id("01-foo"), "foo");
/// assert_eq!(normalize_id("excel/preview-apis/foo.yaml"), "excel-foo");
/// ```
pub fn normalize_id(text: &str) -> String {
    let mut id = collapse_to_hyphens(&text.to_lowercase());

    loop {
        let before = id.len();

        if id == "yaml" {
            id.clear();
        } else if let Some(stripped) = id.strip_suffix("-yaml") {
            id = stripped.to_string();
        }

        id = id.trim_matches('-').to_string();
        id = strip_numeric_prefix(&id).to_string();

        while let Some(pos) = id.find(PREVIEW_APIS_INFIX) {
            id.replace_range(pos..pos + PREVIEW_APIS_INFIX.len(), "-");
        }

        if id.len() == before {
            return id;
        }
    }
}

/// Replace every run of characters outside `[a-z0-9]` with a single hyphen.
fn collapse_to_hyphens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out
}

/// Strip a leading `NN-` ordering segment, as long as something follows it.
pub(crate) fn strip_numeric_prefix(id: &str) -> &str {
    match id.split_once('-') {
        Some((prefix, rest))
            if !prefix.is_empty() && !rest.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) =>
        {
            rest
        }
        _ => id,
    }
}
