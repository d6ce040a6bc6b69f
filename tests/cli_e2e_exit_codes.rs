//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: Build or check failure, or a configuration error
//! - Exit code 2: Invalid command-line usage (handled by clap)

mod common;
use common::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("snippet-build");

    cmd.arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("normalize-id"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("snippet-build");

    cmd.arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Exit code 2 is returned for an unknown subcommand.
#[test]
fn test_exit_code_unknown_subcommand() {
    let mut cmd = cargo_bin_cmd!("snippet-build");

    cmd.arg("publish").assert().code(2);
}

/// Exit code 2 is returned for an unknown flag.
#[test]
fn test_exit_code_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("snippet-build");

    cmd.args(["build", "--no-such-flag"]).assert().code(2);
}

/// Exit code 1 is returned when there is no snippet directory.
#[test]
fn test_exit_code_missing_samples_dir() {
    let fixture = TestFixture::empty();

    fixture
        .command()
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Snippet directory not found"))
        .stderr(predicate::str::contains("hint: Run from the repository root"));
}

/// Exit code 1 is returned for a configuration file with an unknown field.
#[test]
fn test_exit_code_unknown_config_field() {
    let fixture = TestFixture::new().with_config("sample_dir: snippets\n");

    fixture
        .command()
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Did you mean `samples_dir`?"));
}

/// Exit code 1 is returned for a malformed raw URL base.
#[test]
fn test_exit_code_invalid_raw_url_base() {
    let fixture = TestFixture::new().with_config("raw_url_base: not a url\n");

    fixture.command().arg("check").assert().code(1);
}

/// Exit code 1 is returned when the corpus layout is broken, and nothing is
/// processed.
#[test]
fn test_exit_code_structural_error() {
    let fixture = TestFixture::new().with_snippet(
        "excel/Basics/a.yaml",
        &snippets::excel("excel-basics-a", "jquery@3.1.1"),
    );

    fixture
        .command()
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Build aborted"))
        .stdout(predicate::str::contains("Processing").not());
}

/// Exit code 0 is returned for an empty corpus.
#[test]
fn test_exit_code_empty_corpus() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("build")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("0 snippet file(s) processed"));
}

/// Repository coordinates are read from the environment.
#[test]
fn test_repository_coordinates_from_env() {
    let fixture = TestFixture::new().with_snippet(
        "excel/basics/a.yaml",
        &snippets::excel("excel-basics-a", "jquery@3.1.1"),
    );

    fixture
        .command()
        .env("GH_ACCOUNT", "contoso")
        .env("GH_REPO", "snippets")
        .env("GH_BRANCH", "prod")
        .arg("build")
        .assert()
        .code(0);

    assert!(fixture
        .read("view/excel.json")
        .contains("https://raw.githubusercontent.com/contoso/snippets/prod/samples/excel/basics/a.yaml"));
}
