//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a repository fixture and snippet builders so each test
//! file can describe a sample tree in a few lines.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_snippet("excel/basics/call.yaml", &snippets::excel("excel-basics-call", "jquery@3.1.1"));
//!     fixture.command().arg("build").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::snippets;
    pub use super::TestFixture;
}

/// Snippet documents used across the test suites.
#[allow(dead_code)]
pub mod snippets {
    /// Runtime and typings lines every Office.js snippet carries.
    pub const OFFICE_LIBRARIES: &str =
        "https://appsforoffice.microsoft.com/lib/1/hosted/office.js\n    @types/office-js";

    /// A canonical Excel snippet with the given id and extra library line.
    pub fn excel(id: &str, library: &str) -> String {
        format!(
            "id: {id}\nname: Basic call\ndescription: Does a basic call\nauthor: Microsoft\nhost: EXCEL\napi_set:\n    ExcelApi: 1.1\nscript:\n    content: |\n        function run() {{\n            return 1;\n        }}\n    language: typescript\nlibraries: |-\n    {OFFICE_LIBRARIES}\n    {library}\n"
        )
    }

    /// A canonical Excel snippet that declares an `order`.
    pub fn excel_ordered(id: &str, order: i64) -> String {
        format!(
            "order: {order}\nid: {id}\nname: Ordered\ndescription: Ordered snippet\nauthor: Microsoft\nhost: EXCEL\napi_set:\n    ExcelApi: 1.1\nlibraries: |-\n    {OFFICE_LIBRARIES}\n"
        )
    }

    /// A canonical snippet for a host that has no runtime reference.
    pub fn web(id: &str) -> String {
        format!(
            "id: {id}\nname: Web sample\ndescription: Runs in a browser\nauthor: Microsoft\nhost: WEB\napi_set: {{}}\nlibraries: jquery@3.1.1\n"
        )
    }
}

/// A temporary repository root holding snippet corpora.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture with an empty `samples/` directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("samples")
            .create_dir_all()
            .expect("Failed to create samples directory");
        Self { temp_dir }
    }

    /// Create a fixture with no corpus at all.
    #[allow(dead_code)]
    pub fn empty() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.snippet-build.yaml` configuration file with the given content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".snippet-build.yaml", content)
    }

    /// Add a public snippet at `samples/<relative>`.
    pub fn with_snippet(self, relative: &str, content: &str) -> Self {
        self.with_file(&format!("samples/{relative}"), content)
    }

    /// Add a private snippet at `private-samples/<relative>`.
    #[allow(dead_code)]
    pub fn with_private_snippet(self, relative: &str, content: &str) -> Self {
        self.with_file(&format!("private-samples/{relative}"), content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file under the fixture root.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// Repository coordinates from the environment are cleared so that
    /// `rawUrl` placeholders are predictable.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("snippet-build");
        cmd.current_dir(self.path())
            .env_remove("GH_ACCOUNT")
            .env_remove("GH_REPO")
            .env_remove("GH_BRANCH")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_samples_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().join("samples").is_dir());
    }

    #[test]
    fn test_fixture_with_snippet() {
        let fixture = TestFixture::new().with_snippet("excel/basics/a.yaml", "id: a\n");
        assert!(fixture.path().join("samples/excel/basics/a.yaml").exists());
    }

    #[test]
    fn test_snippets_are_valid_yaml() {
        for snippet in [
            snippets::excel("a", "jquery@3.1.1"),
            snippets::excel_ordered("b", 1),
            snippets::web("c"),
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(&snippet).expect("snippet should be valid YAML");
        }
    }
}
