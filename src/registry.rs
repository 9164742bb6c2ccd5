//! # Commit Registry
//!
//! Remembers every [`CommitRecord`] produced during a generation run. Records
//! are reachable two ways:
//!
//! - by `(repository, commit message)`, which is how PR templates refer to
//!   commits since they are written before any hash exists;
//! - as one flat list in plan/commit order, which is what the exporter
//!   serializes.
//!
//! When a repository has two commits with the same message, the later one
//! wins the message lookup. Both stay in the flat list.

use crate::records::CommitRecord;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct CommitRegistry {
    records: Vec<CommitRecord>,
    by_repo: HashMap<String, HashMap<String, usize>>,
}

impl CommitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `repo` as built, even before it has any commits.
    pub fn register_repo(&mut self, repo: &str) {
        self.by_repo.entry(repo.to_string()).or_default();
    }

    /// Adds a record under its repository and message.
    pub fn register(&mut self, record: CommitRecord) {
        let index = self.records.len();
        self.by_repo
            .entry(record.repo.clone())
            .or_default()
            .insert(record.message.clone(), index);
        self.records.push(record);
    }

    pub fn contains_repo(&self, repo: &str) -> bool {
        self.by_repo.contains_key(repo)
    }

    /// Finds the record created for `message` in `repo`.
    pub fn lookup(&self, repo: &str, message: &str) -> Option<&CommitRecord> {
        self.by_repo
            .get(repo)
            .and_then(|messages| messages.get(message))
            .map(|&index| &self.records[index])
    }

    /// All records in the order they were registered.
    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::SourceType;

    pub(crate) fn record(repo: &str, hash: &str, message: &str, files: &[&str]) -> CommitRecord {
        CommitRecord {
            id: CommitRecord::make_id(repo, hash),
            source_type: SourceType::GitCommit,
            repo: repo.to_string(),
            repo_url: format!("https://example.com/{}", repo),
            branch: "main".to_string(),
            commit_hash: hash.to_string(),
            author: "alice".to_string(),
            timestamp: "2025-11-24T09:00:00Z".to_string(),
            message: message.to_string(),
            files_changed: files.iter().map(|f| f.to_string()).collect(),
            embedding_text: format!("{}\n\nsummary", message),
            service_ids: vec![],
            component_ids: vec![],
            changed_apis: vec![],
            is_doc_change: false,
        }
    }

    #[test]
    fn test_lookup_by_repo_and_message() {
        let mut registry = CommitRegistry::new();
        registry.register(record("a", "111", "feat: x", &["x.py"]));
        registry.register(record("b", "222", "feat: x", &["y.py"]));

        assert_eq!(
            registry.lookup("a", "feat: x").unwrap().commit_hash,
            "111"
        );
        assert_eq!(
            registry.lookup("b", "feat: x").unwrap().commit_hash,
            "222"
        );
        assert!(registry.lookup("a", "feat: y").is_none());
        assert!(registry.lookup("c", "feat: x").is_none());
    }

    #[test]
    fn test_records_keep_registration_order() {
        let mut registry = CommitRegistry::new();
        registry.register(record("b", "1", "one", &[]));
        registry.register(record("a", "2", "two", &[]));
        registry.register(record("b", "3", "three", &[]));

        let hashes: Vec<_> = registry
            .records()
            .iter()
            .map(|r| r.commit_hash.as_str())
            .collect();
        assert_eq!(hashes, vec!["1", "2", "3"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_message_last_wins() {
        let mut registry = CommitRegistry::new();
        registry.register(record("a", "1", "same", &["first.txt"]));
        registry.register(record("a", "2", "same", &["second.txt"]));

        assert_eq!(
            registry.lookup("a", "same").unwrap().commit_hash,
            "2"
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registered_repo_without_commits() {
        let mut registry = CommitRegistry::new();
        registry.register_repo("empty");
        assert!(registry.contains_repo("empty"));
        assert!(!registry.contains_repo("other"));
        assert!(registry.is_empty());
    }
}
