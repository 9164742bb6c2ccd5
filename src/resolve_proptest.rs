//! Property-based tests for remote masking, credential redaction and PR file
//! aggregation.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::config::Config;
    use crate::environment::EnvMap;
    use crate::registry::tests::record;
    use crate::resolve::{mask_remote, redact_credentials, Resolver};
    use crate::synthesis::{aggregate_files, CommitLookup};
    use proptest::prelude::*;
    use std::collections::HashSet;

    // ============================================================================
    // mask_remote property tests
    // ============================================================================

    proptest! {
        /// Property: a credential in the authority never survives masking
        #[test]
        fn mask_remote_hides_credential(
            scheme in "https?|ssh",
            token in "[A-Za-z0-9_]{4,40}",
            host in "[a-z]{3,10}\\.(com|org)",
            path in "[a-z0-9/]{0,20}",
        ) {
            let remote = format!("{}://{}@{}/{}", scheme, token, host, path);
            let masked = mask_remote(&remote);
            prop_assert!(!masked.contains(&token));
            prop_assert_eq!(masked, format!("{}://***@{}/{}", scheme, host, path));
        }

        /// Property: remotes without a credential pass through unchanged
        #[test]
        fn mask_remote_is_identity_without_credential(
            host in "[a-z]{3,10}\\.com",
            path in "[a-z0-9@/]{0,20}",
        ) {
            let remote = format!("https://{}/{}", host, path);
            prop_assert_eq!(mask_remote(&remote), remote);
        }

        /// Property: plain remote names pass through unchanged
        #[test]
        fn mask_remote_keeps_names(name in "[a-z][a-z0-9_-]{0,15}") {
            prop_assert_eq!(mask_remote(&name), name);
        }

        /// Property: masking is idempotent
        #[test]
        fn mask_remote_is_idempotent(input in ".*") {
            let once = mask_remote(&input);
            prop_assert_eq!(mask_remote(&once), once.clone());
        }
    }

    // ============================================================================
    // redact_credentials property tests
    // ============================================================================

    proptest! {
        /// Property: credentials embedded in free text are removed
        #[test]
        fn redact_removes_embedded_tokens(
            prefix in "[a-z ]{0,20}",
            token in "ghp_[A-Za-z0-9]{8,20}",
            suffix in "[a-z ]{0,20}",
        ) {
            let text = format!("{}'https://{}@github.com/o/r.git'{}", prefix, token, suffix);
            let redacted = redact_credentials(&text);
            prop_assert!(!redacted.contains(&token));
            prop_assert!(redacted.contains("https://***@github.com/o/r.git"));
        }

        /// Property: text without URLs is untouched
        #[test]
        fn redact_is_identity_without_urls(text in "[A-Za-z0-9 .,@]*") {
            prop_assert_eq!(redact_credentials(&text), text);
        }
    }

    // ============================================================================
    // Branch precedence property tests
    // ============================================================================

    proptest! {
        /// Property: an explicit argument always wins
        #[test]
        fn branch_argument_wins(
            arg in "[a-z]{1,10}",
            env_branch in "[a-z]{1,10}",
            cfg_branch in "[a-z]{1,10}",
        ) {
            let env = EnvMap::new().with("SYNTHETIC_GIT_BRANCH", env_branch);
            let mut config = Config::default();
            config.synthetic_git.branch = Some(cfg_branch);
            prop_assert_eq!(Resolver::new(&env, &config).branch(Some(&arg)), arg);
        }
    }

    // ============================================================================
    // aggregate_files property tests
    // ============================================================================

    fn file_lists() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(
            prop::collection::vec("[a-e]{1,2}\\.py", 0..5),
            0..6,
        )
    }

    proptest! {
        /// Property: the union has no duplicates and covers exactly the input files
        #[test]
        fn aggregate_is_a_duplicate_free_union(lists in file_lists()) {
            let records: Vec<_> = lists
                .iter()
                .enumerate()
                .map(|(i, files)| {
                    let files: Vec<&str> = files.iter().map(String::as_str).collect();
                    record("svc", &i.to_string(), &format!("m{}", i), &files)
                })
                .collect();
            let lookups: Vec<_> = records.iter().map(CommitLookup::Found).collect();

            let union = aggregate_files(&lookups);
            let unique: HashSet<&String> = union.iter().collect();
            prop_assert_eq!(unique.len(), union.len());

            let expected: HashSet<&String> = lists.iter().flatten().collect();
            prop_assert_eq!(unique, expected);
        }

        /// Property: the union starts with the first commit's files, in order
        #[test]
        fn aggregate_keeps_first_seen_order(lists in file_lists()) {
            let records: Vec<_> = lists
                .iter()
                .enumerate()
                .map(|(i, files)| {
                    let files: Vec<&str> = files.iter().map(String::as_str).collect();
                    record("svc", &i.to_string(), &format!("m{}", i), &files)
                })
                .collect();
            let lookups: Vec<_> = records.iter().map(CommitLookup::Found).collect();
            let union = aggregate_files(&lookups);

            let mut seen = HashSet::new();
            let expected: Vec<&String> = lists
                .iter()
                .flatten()
                .filter(|path| seen.insert(*path))
                .collect();
            let actual: Vec<&String> = union.iter().collect();
            prop_assert_eq!(actual, expected);
        }

        /// Property: missing lookups contribute nothing
        #[test]
        fn aggregate_ignores_missing(messages in prop::collection::vec("[a-z]{1,8}", 0..5)) {
            let lookups: Vec<_> = messages
                .iter()
                .map(|m| CommitLookup::Missing(m.as_str()))
                .collect();
            prop_assert!(aggregate_files(&lookups).is_empty());
        }
    }
}
