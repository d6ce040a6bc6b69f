//! Phase 2: Processing Individual Snippets
//!
//! This phase validates and corrects every discovered snippet file. Files are
//! independent of each other, so they are processed on the rayon thread pool
//! and the results are collected once every file is done.
//!
//! ## Per-file steps
//!
//! 1.  Parse the YAML (byte-order mark stripped, CRLF normalized).
//! 2.  Require non-empty `name` and `description`, trimming both.
//! 3.  Resolve the `id`, falling back to one derived from the file path.
//! 4.  Check the id against the naming guidelines.
//! 5.  Check `host` against the host directory, upper-casing it.
//! 6.  Rewrite DefinitelyTyped shorthand (`dt~x`) into `@types/x`.
//! 7.  Check the runtime and typings references.
//! 8.  Substitute a default `api_set` where the host requires one.
//! 9.  Pin unversioned library references.
//! 10. Replace tabs with four spaces in every code field.
//! 11. Enforce the paired stylesheet rule.
//! 12. Queue a rewrite when the canonical form differs from the file.
//! 13. Project the snippet for the cross-file phases.
//!
//! Steps 1, 2, 5, 7 and 11 fail the file: it is dropped from the projection
//! set. The other steps record [`Diagnostic`]s and carry on.

use std::fs;

use log::{debug, trace};
use rayon::prelude::*;

use super::{Diagnostic, FileOutcome, PendingWrite, ProcessedSnippet, SnippetFile};
use crate::canonical::canonicalize;
use crate::config::BuildContext;
use crate::defaults::DEFAULT_ORDER;
use crate::error::{Error, Result};
use crate::libraries;
use crate::naming::{follows_naming_guidelines, looks_machine_generated, normalize_id};
use crate::snippet::{self, Snippet};

const TAB_REPLACEMENT: &str = "    ";

/// Executes Phase 2 of the pipeline.
///
/// The returned outcomes are in the same order as `files`.
pub fn execute(files: &[SnippetFile], ctx: &BuildContext) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|file| process_file(file, ctx))
        .collect()
}

/// Validate, correct, and project a single snippet file.
pub fn process_file(file: &SnippetFile, ctx: &BuildContext) -> FileOutcome {
    let mut diagnostics = Vec::new();
    let source = match fs::read_to_string(&file.full_path) {
        Ok(source) => source,
        Err(e) => {
            diagnostics.push(Diagnostic::error(format!("Cannot read file: {e}")));
            return FileOutcome {
                file: file.clone(),
                diagnostics,
                processed: None,
                pending_write: None,
            };
        }
    };

    match process_source(file, &source, ctx, &mut diagnostics) {
        Ok((processed, pending_write)) => FileOutcome {
            file: file.clone(),
            diagnostics,
            processed: Some(processed),
            pending_write,
        },
        Err(e) => {
            debug!("{} failed validation: {e}", file.display_path());
            diagnostics.push(Diagnostic::error(e.to_string()));
            FileOutcome {
                file: file.clone(),
                diagnostics,
                processed: None,
                pending_write: None,
            }
        }
    }
}

/// Run the per-file steps over already-read file contents.
pub fn process_source(
    file: &SnippetFile,
    source: &str,
    ctx: &BuildContext,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(ProcessedSnippet, Option<PendingWrite>)> {
    let path = file.display_path();
    let text = snippet::normalize_source(source);
    let mut snippet = snippet::parse(&path, &text)?;

    let name = required_text(&path, "name", snippet.name.as_deref())?;
    let description = required_text(&path, "description", snippet.description.as_deref())?;
    snippet.name = Some(name.clone());
    snippet.description = Some(description.clone());

    let id = resolve_id(file, snippet.id.as_deref(), diagnostics);
    if !follows_naming_guidelines(&id) {
        diagnostics.push(Diagnostic::error(format!(
            "Id \"{id}\" must only contain lowercase letters, numbers, and hyphens"
        )));
    }
    snippet.id = Some(id.clone());

    let host = resolve_host(file, snippet.host.as_deref(), diagnostics)?;
    snippet.host = Some(host.clone());

    if let Some(rewritten) = snippet
        .libraries
        .as_deref()
        .and_then(libraries::rewrite_definitely_typed)
    {
        diagnostics.push(Diagnostic::info(
            "Rewrote DefinitelyTyped references (dt~) to @types/",
        ));
        snippet.libraries = Some(rewritten);
    }

    libraries::validate_office_references(
        snippet.libraries.as_deref().unwrap_or_default(),
        &host,
        &file.group,
    )?;

    apply_api_set_default(&mut snippet, &host, ctx, diagnostics);
    pin_libraries(&mut snippet, ctx, diagnostics);

    let replaced = replace_tabs(&mut snippet);
    if replaced > 0 {
        diagnostics.push(Diagnostic::info(format!(
            "Replaced {replaced} tab character(s) with spaces"
        )));
    }

    libraries::check_paired_references(snippet.libraries.as_deref().unwrap_or_default())?;

    let canonical = canonicalize(&snippet, &ctx.author);
    let pending_write = if canonical.trim_end() != text.trim_end() {
        diagnostics.push(Diagnostic::info("Snippet is not in canonical form"));
        Some(PendingWrite {
            path: file.full_path.clone(),
            contents: canonical,
        })
    } else {
        trace!("{path} is already canonical");
        None
    };

    let processed = ProcessedSnippet {
        id,
        name,
        file_name: file.file_name.clone(),
        relative_path: file.relative_path.clone(),
        full_path: file.full_path.clone(),
        description,
        host,
        raw_url: ctx.raw_url(&file.corpus_dir, &file.relative_path),
        group: file.group.clone(),
        order: snippet.order.unwrap_or(DEFAULT_ORDER),
        api_set: snippet.api_set.clone().unwrap_or_default(),
        is_public: file.is_public,
        script: snippet
            .script
            .as_ref()
            .map(|block| block.content.clone())
            .unwrap_or_default(),
    };

    Ok((processed, pending_write))
}

fn required_text(path: &str, field: &str, value: Option<&str>) -> Result<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(Error::snippet(
            path,
            format!("Snippet {field} must be a non-empty string"),
        ));
    }
    Ok(value.to_string())
}

/// Pick the snippet's id: the declared one when usable, else one derived from
/// the file's relative path.
fn resolve_id(file: &SnippetFile, declared: Option<&str>, diagnostics: &mut Vec<Diagnostic>) -> String {
    let from_path = || normalize_id(&file.relative_path);

    let Some(declared) = declared.filter(|id| !id.trim().is_empty()) else {
        let id = from_path();
        diagnostics.push(Diagnostic::info(format!(
            "Snippet has no id; using \"{id}\""
        )));
        return id;
    };

    if looks_machine_generated(declared) {
        let id = from_path();
        diagnostics.push(Diagnostic::info(format!(
            "Replaced machine-generated id \"{}\" with \"{id}\"",
            declared.trim()
        )));
        return id;
    }

    let normalized = normalize_id(declared);
    let id = if normalized.is_empty() {
        from_path()
    } else {
        normalized
    };
    if id != declared {
        diagnostics.push(Diagnostic::info(format!(
            "Changed id from \"{declared}\" to \"{id}\""
        )));
    }
    id
}

fn resolve_host(
    file: &SnippetFile,
    declared: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let path = file.display_path();
    let expected = file.host_dir.to_uppercase();

    let declared = declared.map(str::trim).unwrap_or_default();
    if declared.is_empty() {
        return Err(Error::snippet(
            &path,
            format!("Snippet host is missing; expected \"{expected}\""),
        ));
    }
    if declared == expected {
        return Ok(expected);
    }
    if declared.to_uppercase() == expected {
        diagnostics.push(Diagnostic::info(format!(
            "Changed host from \"{declared}\" to \"{expected}\""
        )));
        return Ok(expected);
    }
    Err(Error::snippet(
        &path,
        format!(
            "Host \"{declared}\" does not match the directory \"{}\"; expected \"{expected}\"",
            file.host_dir
        ),
    ))
}

fn apply_api_set_default(
    snippet: &mut Snippet,
    host: &str,
    ctx: &BuildContext,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(default) = ctx.api_set_defaults.get(host) else {
        return;
    };
    if snippet.api_set.as_ref().is_some_and(|set| !set.is_empty()) {
        return;
    }
    let listed = default
        .iter()
        .map(|(name, version)| format!("{name} {version}"))
        .collect::<Vec<_>>()
        .join(", ");
    diagnostics.push(Diagnostic::error(format!(
        "Snippet is missing api_set; substituted the default ({listed})"
    )));
    snippet.api_set = Some(default.clone());
}

fn pin_libraries(snippet: &mut Snippet, ctx: &BuildContext, diagnostics: &mut Vec<Diagnostic>) {
    let Some(current) = snippet.libraries.as_deref() else {
        return;
    };
    let outcome = libraries::pin_library_versions(current, &ctx.library_pins);

    for substitution in &outcome.substitutions {
        diagnostics.push(Diagnostic::error(format!(
            "Library \"{}\" must specify a version; substituted \"{}\"",
            substitution.from, substitution.to
        )));
    }
    for reference in &outcome.unpinned {
        diagnostics.push(Diagnostic::error(format!(
            "Library \"{reference}\" must specify a version (for example name@1.2.3)"
        )));
    }

    if !outcome.substitutions.is_empty() {
        snippet.libraries = Some(outcome.libraries);
    }
}

/// Replace every tab in the code fields, returning how many were replaced.
pub fn replace_tabs(snippet: &mut Snippet) -> usize {
    let mut replaced = 0;
    for field in snippet.text_fields_mut() {
        let count = field.matches('\t').count();
        if count > 0 {
            *field = field.replace('\t', TAB_REPLACEMENT);
            replaced += count;
        }
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::snippet_file;
    use crate::phases::Severity;
    use crate::snippet::ApiVersion;

    const EXCEL_LIBRARIES: &str = "https://appsforoffice.microsoft.com/lib/1/hosted/office.js\n@types/office-js\n\njquery@3.1.1\n@types/jquery@3.3.1";

    fn ctx() -> BuildContext {
        BuildContext::with_defaults("/repo").unwrap()
    }

    fn excel_snippet(id: &str, libraries: &str) -> String {
        let snippet = Snippet {
            id: Some(id.to_string()),
            name: Some("Basic call".to_string()),
            description: Some("Does a basic call".to_string()),
            host: Some("EXCEL".to_string()),
            api_set: Some([("ExcelApi".to_string(), ApiVersion::from("1.1"))].into_iter().collect()),
            script: Some(crate::snippet::Content {
                content: "function run() {\n    return 1;\n}\n".to_string(),
                language: "typescript".to_string(),
            }),
            libraries: Some(libraries.to_string()),
            ..Default::default()
        };
        canonicalize(&snippet, "Microsoft")
    }

    fn run(relative_path: &str, source: &str) -> (Result<(ProcessedSnippet, Option<PendingWrite>)>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let result = process_source(&snippet_file(relative_path), source, &ctx(), &mut diagnostics);
        (result, diagnostics)
    }

    #[test]
    fn test_canonical_snippet_passes_untouched() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES);
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(pending.is_none());
        assert_eq!(processed.id, "excel-basics-call");
        assert_eq!(processed.group, "basics");
        assert_eq!(processed.order, DEFAULT_ORDER);
        assert_eq!(
            processed.raw_url,
            "https://raw.githubusercontent.com/<ACCOUNT>/<REPO>/<BRANCH>/samples/excel/basics/call.yaml"
        );
        assert!(processed.script.contains("function run()"));
    }

    #[test]
    fn test_crlf_and_trailing_whitespace_are_not_rewrites() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace('\n', "\r\n") + "\r\n\r\n";
        let (result, _) = run("excel/basics/call.yaml", &source);
        assert!(result.unwrap().1.is_none());
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let (result, _) = run("excel/basics/call.yaml", "name: [unclosed");
        assert!(matches!(result, Err(Error::SnippetParse { .. })));
    }

    #[test]
    fn test_empty_name_is_fatal() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("name: Basic call", "name: '   '");
        let (result, _) = run("excel/basics/call.yaml", &source);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("name must be a non-empty string"));
    }

    #[test]
    fn test_missing_id_derived_from_path() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("id: excel-basics-call\n", "");
        let (result, diagnostics) = run("excel/01-basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert_eq!(processed.id, "excel-01-basics-call");
        assert!(pending.unwrap().contents.contains("id: excel-01-basics-call\n"));
        assert_eq!(diagnostics[0].severity, Severity::Info);
    }

    #[test]
    fn test_machine_generated_id_replaced() {
        let source = excel_snippet("cjqb2xd4k00001xmbv3x0t3zn", EXCEL_LIBRARIES);
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        assert_eq!(result.unwrap().0.id, "excel-basics-call");
        assert!(diagnostics[0].message.contains("machine-generated"));
    }

    #[test]
    fn test_declared_id_normalized() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("id: excel-basics-call", "id: Excel Basics Call");
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        assert_eq!(result.unwrap().0.id, "excel-basics-call");
        assert!(diagnostics.iter().all(|d| !d.is_error()));
        assert!(diagnostics[0].message.contains("Changed id"));
    }

    #[test]
    fn test_host_case_corrected() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("host: EXCEL", "host: excel");
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert_eq!(processed.host, "EXCEL");
        assert!(pending.is_some());
        assert!(diagnostics.iter().any(|d| d.message.contains("Changed host")));
    }

    #[test]
    fn test_host_mismatch_is_fatal() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("host: EXCEL", "host: WORD");
        let (result, _) = run("excel/basics/call.yaml", &source);
        assert!(result.unwrap_err().to_string().contains("does not match"));
    }

    #[test]
    fn test_missing_host_is_fatal() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("host: EXCEL\n", "");
        let (result, _) = run("excel/basics/call.yaml", &source);
        assert!(result.unwrap_err().to_string().contains("host is missing"));
    }

    #[test]
    fn test_missing_office_js_is_fatal() {
        let source = excel_snippet("excel-basics-call", "@types/office-js\njquery@3.1.1");
        let (result, _) = run("excel/basics/call.yaml", &source);
        assert!(matches!(result, Err(Error::Library { .. })));
    }

    #[test]
    fn test_definitely_typed_rewritten() {
        let libraries = EXCEL_LIBRARIES.replace("@types/jquery@3.3.1", "dt~jquery@3.3.1");
        let source = excel_snippet("excel-basics-call", &libraries);
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (_, pending) = result.unwrap();
        assert!(pending.unwrap().contents.contains("@types/jquery@3.3.1"));
        assert!(diagnostics.iter().any(|d| d.message.contains("dt~")));
    }

    #[test]
    fn test_missing_api_set_substituted_and_flagged() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("api_set:\n    ExcelApi: 1.1\n", "");
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert_eq!(processed.api_set["ExcelApi"].as_str(), "1.1");
        assert!(pending.unwrap().contents.contains("api_set:\n    ExcelApi: 1.1\n"));
        assert!(diagnostics.iter().any(|d| d.is_error() && d.message.contains("api_set")));
    }

    #[test]
    fn test_api_version_with_trailing_zero_is_kept() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES)
            .replace("    ExcelApi: 1.1\n", "    ExcelApi: 1.10\n");
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(pending.is_none());
        assert_eq!(processed.api_set["ExcelApi"].as_str(), "1.10");
    }

    #[test]
    fn test_quoted_api_version_is_accepted() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES)
            .replace("    ExcelApi: 1.1\n", "    ExcelApi: '1.10'\n");
        let (result, _) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert_eq!(processed.api_set["ExcelApi"].as_str(), "1.10");
        assert!(pending.unwrap().contents.contains("api_set:\n    ExcelApi: 1.10\n"));
    }

    #[test]
    fn test_unversioned_jquery_pinned_and_flagged() {
        let libraries = EXCEL_LIBRARIES.replace("jquery@3.1.1", "jquery");
        let source = excel_snippet("excel-basics-call", &libraries);
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (_, pending) = result.unwrap();
        let contents = pending.unwrap().contents;
        assert!(contents.contains("\n    jquery@3.1.1\n"));
        let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("jquery@3.1.1"));
    }

    #[test]
    fn test_tabs_replaced() {
        let source = excel_snippet("excel-basics-call", EXCEL_LIBRARIES).replace("    return 1;", "\treturn 1;");
        let (result, diagnostics) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert!(!processed.script.contains('\t'));
        assert!(!pending.unwrap().contents.contains('\t'));
        assert!(diagnostics.iter().any(|d| d.message.contains("tab")));
    }

    #[test]
    fn test_replace_tabs_is_total() {
        let mut snippet = Snippet {
            script: Some(crate::snippet::Content {
                content: "\ta\t\tb".to_string(),
                language: "typescript".to_string(),
            }),
            style: Some(crate::snippet::Content {
                content: "\t".to_string(),
                language: "css".to_string(),
            }),
            libraries: Some("x\ty".to_string()),
            ..Default::default()
        };
        assert_eq!(replace_tabs(&mut snippet), 5);
        assert!(snippet.text_fields_mut().iter().all(|f| !f.contains('\t')));
        assert_eq!(replace_tabs(&mut snippet), 0);
    }

    #[test]
    fn test_fabric_pairing_is_fatal() {
        let libraries = format!(
            "{EXCEL_LIBRARIES}\noffice-ui-fabric-js@1.4.0/dist/css/fabric.min.css"
        );
        let source = excel_snippet("excel-basics-call", &libraries);
        let (result, _) = run("excel/basics/call.yaml", &source);
        assert!(result.unwrap_err().to_string().contains("fabric.components.min.css"));
    }

    #[test]
    fn test_order_carried_to_projection() {
        let source = format!("order: 3\n{}", excel_snippet("excel-basics-call", EXCEL_LIBRARIES));
        let (result, _) = run("excel/basics/call.yaml", &source);
        let (processed, pending) = result.unwrap();
        assert_eq!(processed.order, 3);
        assert!(pending.is_none());
    }

    #[test]
    fn test_process_file_reports_read_failure() {
        let outcome = process_file(&snippet_file("excel/basics/missing.yaml"), &ctx());
        assert!(outcome.processed.is_none());
        assert!(outcome.has_errors());
    }

    #[test]
    fn test_execute_preserves_order() {
        let temp = tempfile::tempdir().unwrap();
        let mut files = Vec::new();
        for name in ["b", "a", "c"] {
            let mut file = snippet_file(&format!("excel/basics/{name}.yaml"));
            file.full_path = temp.path().join(format!("{name}.yaml"));
            fs::write(&file.full_path, excel_snippet(&format!("excel-basics-{name}"), EXCEL_LIBRARIES)).unwrap();
            files.push(file);
        }
        let outcomes = execute(&files, &ctx());
        let ids: Vec<_> = outcomes
            .iter()
            .map(|o| o.processed.as_ref().unwrap().id.clone())
            .collect();
        assert_eq!(ids, vec!["excel-basics-b", "excel-basics-a", "excel-basics-c"]);
    }
}
