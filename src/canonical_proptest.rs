//! Property-based tests for canonical snippet serialization.
//!
//! These tests use proptest to generate random snippets and verify that the
//! canonical form survives a parse round trip unchanged.

#[cfg(test)]
mod proptest_tests {
    use crate::canonical::canonicalize;
    use crate::snippet::{parse, ApiVersion, Content, Snippet};
    use proptest::prelude::*;

    /// Printable ASCII, including YAML-significant characters and newlines,
    /// mixed with non-ASCII text and the Unicode line breaks YAML recognizes.
    fn text() -> impl Strategy<Value = String> {
        "[ -~\n\t\u{85}\u{a0}\u{e9}\u{2028}\u{2029}\u{feff}\u{4e2d}\u{1f600}]{0,60}"
    }

    fn version() -> impl Strategy<Value = ApiVersion> {
        prop_oneof![
            "[0-9]{1,2}(\\.[0-9]{1,2})?",
            "[a-z]{1,6}",
        ]
        .prop_map(ApiVersion::new)
    }

    fn content() -> impl Strategy<Value = Option<Content>> {
        proptest::option::of((text(), "[a-z]{0,10}").prop_map(|(content, language)| Content {
            content,
            language,
        }))
    }

    prop_compose! {
        fn snippet()(
            order in proptest::option::of(-5i64..200),
            id in proptest::option::of("[a-z0-9-]{1,20}"),
            name in proptest::option::of(text()),
            description in proptest::option::of(text()),
            host in proptest::option::of("[A-Z]{2,10}"),
            api_set in proptest::option::of(proptest::collection::btree_map("[A-Za-z]{1,12}", version(), 0..3)),
            script in content(),
            template in content(),
            style in content(),
            libraries in proptest::option::of(text()),
        ) -> Snippet {
            Snippet {
                order,
                id,
                name,
                description,
                host,
                api_set,
                script,
                template,
                style,
                libraries,
                ..Default::default()
            }
        }
    }

    proptest! {
        /// Property: canonicalize(parse(canonicalize(s))) == canonicalize(s)
        #[test]
        fn canonicalize_is_idempotent(snippet in snippet()) {
            let first = canonicalize(&snippet, "Microsoft");
            let parsed = parse("generated.yaml", &first)
                .map_err(|e| TestCaseError::fail(format!("{e}\n{first}")))?;
            let second = canonicalize(&parsed, "Microsoft");
            prop_assert_eq!(second, first);
        }

        /// Property: canonical output never contains a carriage return or a tab
        /// outside of content
        #[test]
        fn canonical_output_has_no_carriage_returns(
            content in "[ -~\r\n]{0,60}",
        ) {
            let snippet = Snippet {
                libraries: Some(content),
                ..Default::default()
            };
            let output = canonicalize(&snippet, "Microsoft");
            prop_assert!(!output.contains('\r'));
        }

        /// Property: api_set versions are reproduced exactly after a round trip
        #[test]
        fn api_versions_survive_roundtrip(value in version()) {
            let snippet = Snippet {
                api_set: Some([("ExcelApi".to_string(), value.clone())].into_iter().collect()),
                ..Default::default()
            };
            let output = canonicalize(&snippet, "Microsoft");
            let parsed = parse("generated.yaml", &output)
                .map_err(|e| TestCaseError::fail(format!("{e}\n{output}")))?;
            prop_assert_eq!(parsed.api_set.unwrap()["ExcelApi"].clone(), value);
        }

        /// Property: text fields are reproduced exactly after a round trip
        #[test]
        fn text_fields_survive_roundtrip(value in text()) {
            let snippet = Snippet {
                name: Some(value.clone()),
                libraries: Some(value.clone()),
                ..Default::default()
            };
            let output = canonicalize(&snippet, "Microsoft");
            let parsed = parse("generated.yaml", &output)
                .map_err(|e| TestCaseError::fail(format!("{e}\n{output}")))?;
            prop_assert_eq!(parsed.name, Some(value.clone()));
            prop_assert_eq!(parsed.libraries, Some(value));
        }
    }
}
