//! Persisted dataset records.
//!
//! These are the shapes written to `git_events.json` and `git_prs.json`. Field
//! names on the wire are snake_case and match what downstream consumers
//! already read (`commit_sha`, `text_for_embedding`, `source_type`).

use serde::{Deserialize, Serialize};

/// Discriminates the two record kinds in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    GitCommit,
    GitPr,
}

/// A commit that was actually created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// `git_commit:<repo>:<sha>`
    pub id: String,
    pub source_type: SourceType,
    pub repo: String,
    pub repo_url: String,
    pub branch: String,
    #[serde(rename = "commit_sha")]
    pub commit_hash: String,
    pub author: String,
    pub timestamp: String,
    pub message: String,
    pub files_changed: Vec<String>,
    #[serde(rename = "text_for_embedding")]
    pub embedding_text: String,
    pub service_ids: Vec<String>,
    pub component_ids: Vec<String>,
    pub changed_apis: Vec<String>,
    pub is_doc_change: bool,
}

impl CommitRecord {
    pub fn make_id(repo: &str, commit_hash: &str) -> String {
        format!("git_commit:{}:{}", repo, commit_hash)
    }
}

/// A pull request fixture with its file list resolved from commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrRecord {
    /// `git_pr:<repo>:<pr_number>`
    pub id: String,
    pub source_type: SourceType,
    pub repo: String,
    pub repo_url: String,
    pub branch: String,
    pub pr_number: u64,
    pub author: String,
    pub timestamp: String,
    pub title: String,
    pub body: String,
    pub merged: bool,
    pub files_changed: Vec<String>,
    #[serde(rename = "text_for_embedding")]
    pub embedding_text: String,
    pub service_ids: Vec<String>,
    pub component_ids: Vec<String>,
    pub changed_apis: Vec<String>,
    pub labels: Vec<String>,
}

impl PrRecord {
    pub fn make_id(repo: &str, pr_number: u64) -> String {
        format!("git_pr:{}:{}", repo, pr_number)
    }
}
