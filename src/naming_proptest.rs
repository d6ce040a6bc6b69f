//! Property-based tests for the naming and ID policy.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::naming::{follows_naming_guidelines, looks_machine_generated, normalize_id};
    use proptest::prelude::*;

    // ============================================================================
    // normalize_id property tests
    // ============================================================================

    proptest! {
        /// Property: normalize_id is a projection (applying it twice changes nothing)
        #[test]
        fn normalize_id_is_idempotent(input in ".*") {
            let once = normalize_id(&input);
            let twice = normalize_id(&once);
            prop_assert_eq!(twice, once);
        }

        /// Property: non-empty output always follows the naming guidelines
        #[test]
        fn normalize_id_output_is_a_slug(input in ".*") {
            let result = normalize_id(&input);
            if !result.is_empty() {
                prop_assert!(
                    follows_naming_guidelines(&result),
                    "normalize_id produced '{}' from input '{}'",
                    result,
                    input
                );
            }
        }

        /// Property: output never starts or ends with a hyphen, nor doubles one
        #[test]
        fn normalize_id_has_clean_hyphens(input in "[a-zA-Z0-9 ./_-]{0,40}") {
            let result = normalize_id(&input);
            prop_assert!(!result.starts_with('-'));
            prop_assert!(!result.ends_with('-'));
            prop_assert!(!result.contains("--"));
        }

        /// Property: paths built from snippet-like segments never normalize to nothing
        #[test]
        fn normalize_id_keeps_relative_paths(
            host in "[a-z]{3,10}",
            group in "[a-z]{3,10}",
            file in "[a-z]{3,10}",
        ) {
            let path = format!("{}/{}/{}.yaml", host, group, file);
            let result = normalize_id(&path);
            prop_assert!(!result.is_empty());
            prop_assert!(result.ends_with(&file) || file == "yaml");
        }
    }

    // ============================================================================
    // follows_naming_guidelines / looks_machine_generated property tests
    // ============================================================================

    proptest! {
        /// Property: any slug of allowed characters passes the guideline check
        #[test]
        fn slugs_follow_guidelines(name in "[a-z0-9-]{1,30}") {
            prop_assert!(follows_naming_guidelines(&name));
        }

        /// Property: an uppercase letter anywhere fails the guideline check
        #[test]
        fn uppercase_fails_guidelines(prefix in "[a-z0-9-]{0,10}", upper in "[A-Z]", suffix in "[a-z0-9-]{0,10}") {
            let name = format!("{}{}{}", prefix, upper, suffix);
            prop_assert!(!follows_naming_guidelines(&name));
        }

        /// Property: 25 alphanumerics always look machine generated
        #[test]
        fn cuid_like_ids_detected(id in "[a-z0-9]{25}") {
            prop_assert!(looks_machine_generated(&id));
        }

        /// Property: hyphenated ids never look machine generated
        #[test]
        fn hyphenated_ids_not_detected(left in "[a-z0-9]{1,12}", right in "[a-z0-9]{1,12}") {
            let id = format!("{}-{}", left, right);
            prop_assert!(!looks_machine_generated(&id));
        }
    }
}
