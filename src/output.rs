//! # Output Configuration
//!
//! This module controls how build reports are rendered on the terminal:
//! color detection, stage headers ("Processing X", "Testing ID of Y") and the
//! bulleted detail lists under them.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::fmt::Write as _;

use console::Style;

use crate::phases::{BuildReport, Collision, Diagnostic, FileOutcome, Severity};

/// Output configuration for controlling colors and symbols.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and symbols should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn symbol<'a>(&self, fancy: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            fancy
        } else {
            plain
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

fn bullet(config: &OutputConfig, out: &mut String, diagnostic: &Diagnostic) {
    let line = match diagnostic.severity {
        Severity::Error => config.paint(Style::new().red(), &diagnostic.message),
        Severity::Info => config.paint(Style::new().dim(), &diagnostic.message),
    };
    let _ = writeln!(out, "    - {line}");
}

/// Render one file's processing status and its details.
pub fn render_file(config: &OutputConfig, outcome: &FileOutcome) -> String {
    let mut out = String::new();
    let status = if outcome.has_errors() {
        config.paint(Style::new().red().bold(), config.symbol("✗", "[FAIL]"))
    } else if outcome.diagnostics.is_empty() {
        config.paint(Style::new().green(), config.symbol("✓", "[OK]"))
    } else {
        config.paint(Style::new().yellow(), config.symbol("~", "[FIXED]"))
    };
    let _ = writeln!(out, "{status} Processing {}", outcome.file.display_path());
    for diagnostic in &outcome.diagnostics {
        bullet(config, &mut out, diagnostic);
    }
    out
}

/// Render one collision under the uniqueness stage label.
pub fn render_collision(config: &OutputConfig, collision: &Collision) -> String {
    let mut out = String::new();
    let status = config.paint(Style::new().red().bold(), config.symbol("✗", "[FAIL]"));
    let _ = writeln!(out, "{status} Testing ID of {}", collision.path);
    bullet(
        config,
        &mut out,
        &Diagnostic::error(format!(
            "Id \"{}\" is also used by: {}",
            collision.id,
            collision.others.join(", ")
        )),
    );
    out
}

/// Render the whole report: every file, every collision, stage errors, and
/// a closing summary.
pub fn render_report(config: &OutputConfig, report: &BuildReport) -> String {
    let mut out = String::new();
    for outcome in &report.files {
        out.push_str(&render_file(config, outcome));
    }
    for collision in &report.collisions {
        out.push_str(&render_collision(config, collision));
    }
    for error in &report.errors {
        let status = config.paint(Style::new().red().bold(), config.symbol("✗", "[FAIL]"));
        let _ = writeln!(out, "{status} {error}");
    }

    out.push('\n');
    let _ = writeln!(out, "{} snippet file(s) processed", report.files.len());
    if !report.written.is_empty() {
        let _ = writeln!(out, "{} file(s) rewritten in canonical form", report.written.len());
    }
    if !report.pending.is_empty() {
        let _ = writeln!(out, "{} file(s) would be rewritten:", report.pending.len());
        for path in &report.pending {
            let _ = writeln!(out, "    - {}", path.display());
        }
    }
    if !report.playlists.is_empty() {
        let _ = writeln!(out, "{} playlist/index file(s) written", report.playlists.len());
    }
    if let Some(path) = &report.excerpts {
        let _ = writeln!(out, "Reference-doc excerpts written to {}", path.display());
    }
    if report.succeeded() {
        let _ = writeln!(out, "{}", config.paint(Style::new().green().bold(), "Build succeeded"));
    } else {
        let _ = writeln!(
            out,
            "{}",
            config.paint(
                Style::new().red().bold(),
                &format!("Build failed with {} error(s)", report.error_count())
            )
        );
    }
    out
}
