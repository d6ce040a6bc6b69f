//! Default values for snippet-build configuration.
//!
//! This module provides the compiled-in tables and directory names used when
//! no `.snippet-build.yaml` overrides them. The pin and API-set tables record
//! the last known-good values; they carry no versioning policy of their own.

use std::collections::BTreeMap;

use crate::snippet::{ApiSet, ApiVersion};

/// Directory holding the public snippet corpus.
pub const SAMPLES_DIR: &str = "samples";

/// Directory holding the private snippet corpus.
pub const PRIVATE_SAMPLES_DIR: &str = "private-samples";

/// Output directory for per-host playlist YAML files.
pub const PLAYLISTS_DIR: &str = "playlists";

/// Output directory for per-host `id -> rawUrl` JSON indexes.
pub const VIEW_DIR: &str = "view";

/// Input directory for reference-doc excerpt mappings.
pub const EXTRACTOR_METADATA_DIR: &str = "snippet-extractor-metadata";

/// Output directory for reference-doc excerpts.
pub const EXTRACTOR_OUTPUT_DIR: &str = "snippet-extractor-output";

/// Name of the optional configuration file at the repository root.
pub const CONFIG_FILE_NAME: &str = ".snippet-build.yaml";

/// Value written to every snippet's `author` field.
pub const AUTHOR: &str = "Microsoft";

/// Sort key used for snippets that do not declare `order`.
pub const DEFAULT_ORDER: i64 = 100;

/// Template file per host; metadata only, never listed in a playlist.
pub const DEFAULT_SNIPPET_FILE_NAME: &str = "default.yaml";

/// Base of every `rawUrl`.
pub const RAW_URL_BASE: &str = "https://raw.githubusercontent.com";

/// Placeholders used in `rawUrl` when the repository coordinates are unknown.
pub const ACCOUNT_PLACEHOLDER: &str = "<ACCOUNT>";
pub const REPO_PLACEHOLDER: &str = "<REPO>";
pub const BRANCH_PLACEHOLDER: &str = "<BRANCH>";

/// Canonical host-runtime reference.
pub const OFFICE_JS: &str = "https://appsforoffice.microsoft.com/lib/1/hosted/office.js";

/// Preview host-runtime reference, allowed only in `preview-apis` groups.
pub const OFFICE_JS_PREVIEW: &str = "https://appsforoffice.microsoft.com/lib/beta/hosted/office.js";

/// Canonical typings references.
pub const OFFICE_TYPINGS: &[&str] = &[
    "@types/office-js",
    "https://appsforoffice.microsoft.com/lib/1/hosted/office.d.ts",
];

/// Preview typings references, allowed only in `preview-apis` groups.
pub const OFFICE_TYPINGS_PREVIEW: &[&str] = &[
    "@types/office-js-preview",
    "https://appsforoffice.microsoft.com/lib/beta/hosted/office.d.ts",
];

/// Group name that unlocks the preview runtime and typings.
pub const PREVIEW_GROUP: &str = "preview-apis";

/// Hosts whose snippets run inside the Office.js runtime.
pub const OFFICE_JS_HOSTS: &[&str] = &["EXCEL", "WORD", "POWERPOINT", "ONENOTE", "OUTLOOK", "PROJECT"];

/// Host identifiers mapped to the product names used in reference docs.
pub const HOST_APP_NAMES: &[(&str, &str)] = &[
    ("EXCEL", "Excel"),
    ("WORD", "Word"),
    ("POWERPOINT", "PowerPoint"),
    ("ONENOTE", "OneNote"),
    ("OUTLOOK", "Outlook"),
    ("PROJECT", "Project"),
    ("WEB", "Web"),
];

/// Capitalization overrides applied to words of playlist group names.
pub const GROUP_WORD_OVERRIDES: &[(&str, &str)] = &[
    ("Api", "API"),
    ("Apis", "APIs"),
    ("Javascript", "JavaScript"),
    ("Typescript", "TypeScript"),
    ("Onenote", "OneNote"),
    ("Powerpoint", "PowerPoint"),
    ("Pivottable", "PivotTable"),
    ("Ui", "UI"),
];

/// Default `api_set` substituted for hosts that require one.
pub fn api_set_defaults() -> BTreeMap<String, ApiSet> {
    [
        ("EXCEL", "ExcelApi"),
        ("WORD", "WordApi"),
        ("POWERPOINT", "PowerPointApi"),
        ("ONENOTE", "OneNoteApi"),
        ("OUTLOOK", "Mailbox"),
    ]
    .into_iter()
    .map(|(host, api)| {
        (
            host.to_string(),
            ApiSet::from([(api.to_string(), ApiVersion::from("1.1"))]),
        )
    })
    .collect()
}

/// Pinned replacements for library references that lack a version.
pub fn library_pins() -> BTreeMap<String, String> {
    [
        ("jquery", "jquery@3.1.1"),
        ("@types/jquery", "@types/jquery@3.3.1"),
        ("core-js", "core-js@2.4.1/client/core.min.js"),
        ("core-js/client/core.min.js", "core-js@2.4.1/client/core.min.js"),
        ("@types/core-js", "@types/core-js@2.5.0"),
        (
            "office-ui-fabric-js/dist/css/fabric.min.css",
            "office-ui-fabric-js@1.4.0/dist/css/fabric.min.css",
        ),
        (
            "office-ui-fabric-js/dist/css/fabric.components.min.css",
            "office-ui-fabric-js@1.4.0/dist/css/fabric.components.min.css",
        ),
        (
            "office-ui-fabric-js/dist/js/fabric.min.js",
            "office-ui-fabric-js@1.4.0/dist/js/fabric.min.js",
        ),
        (
            "@microsoft/office-js-helpers",
            "@microsoft/office-js-helpers@0.7.4/dist/office.helpers.min.js",
        ),
        (
            "@microsoft/office-js-helpers/dist/office.helpers.min.js",
            "@microsoft/office-js-helpers@0.7.4/dist/office.helpers.min.js",
        ),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

/// Look up the product name for an upper-case host identifier.
pub fn host_app_name(host: &str) -> Option<&'static str> {
    HOST_APP_NAMES
        .iter()
        .find(|(key, _)| *key == host)
        .map(|(_, name)| *name)
}
