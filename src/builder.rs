//! # Repository Builder
//!
//! Turns a [`RepoPlan`] into a real repository on disk, one commit per
//! [`CommitSpec`], and reports what was created as [`CommitRecord`]s.
//!
//! Determinism comes from pinning everything git would otherwise take from
//! the machine: the committer identity is fixed per repository, author and
//! committer name/email/date are forced from the commit spec on every
//! commit, and commit signing is disabled. Two builds of the same plan therefore produce
//! the same hashes.

use crate::error::{Error, Result};
use crate::git::GitExecutor;
use crate::plan::{CommitSpec, RepoPlan};
use crate::records::{CommitRecord, SourceType};
use chrono::DateTime;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Committer identity configured in every generated repository.
pub const BOT_NAME: &str = "Synthetic Git Bot";
pub const BOT_EMAIL: &str = "synthetic@example.com";

/// Builds synthetic repositories through a [`GitExecutor`].
pub struct RepositoryBuilder<'a> {
    git: &'a dyn GitExecutor,
}

impl<'a> RepositoryBuilder<'a> {
    pub fn new(git: &'a dyn GitExecutor) -> Self {
        Self { git }
    }

    /// Creates `dir` and initializes an empty repository on `branch`.
    pub fn initialize(&self, dir: &Path, branch: &str) -> Result<()> {
        fs::create_dir_all(dir)?;
        self.git.run(dir, &["init", "-q", "-b", branch], &[])?;
        self.git.run(dir, &["config", "user.name", BOT_NAME], &[])?;
        self.git.run(dir, &["config", "user.email", BOT_EMAIL], &[])?;
        self.git.run(dir, &["config", "commit.gpgsign", "false"], &[])?;
        debug!("Initialized {} on branch {}", dir.display(), branch);
        Ok(())
    }

    /// Writes the files of `spec`, stages exactly those paths and commits
    /// them with the spec's author, email and timestamp.
    ///
    /// Not idempotent: applying the same spec twice creates two commits.
    pub fn apply_commit(
        &self,
        dir: &Path,
        plan: &RepoPlan,
        spec: &CommitSpec,
    ) -> Result<CommitRecord> {
        let paths = spec.paths();
        for file in &spec.files {
            let target = dir.join(&file.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.content)?;
        }

        let mut add_args = vec!["add", "--"];
        add_args.extend(paths.iter().map(String::as_str));
        self.git.run(dir, &add_args, &[])?;

        let date = git_date(&spec.timestamp)?;
        let identity = [
            ("GIT_AUTHOR_NAME", spec.author.as_str()),
            ("GIT_AUTHOR_EMAIL", spec.author_email.as_str()),
            ("GIT_AUTHOR_DATE", date.as_str()),
            ("GIT_COMMITTER_NAME", spec.author.as_str()),
            ("GIT_COMMITTER_EMAIL", spec.author_email.as_str()),
            ("GIT_COMMITTER_DATE", date.as_str()),
        ];
        self.git
            .run(dir, &["commit", "-q", "-m", &spec.message], &identity)?;
        let commit_hash = self.git.run(dir, &["rev-parse", "HEAD"], &[])?;

        debug!("{}: {} {}", plan.name, &commit_hash, spec.message);

        Ok(CommitRecord {
            id: CommitRecord::make_id(&plan.name, &commit_hash),
            source_type: SourceType::GitCommit,
            repo: plan.name.clone(),
            repo_url: plan.repo_url.clone(),
            branch: plan.default_branch.clone(),
            commit_hash,
            author: spec.author.clone(),
            timestamp: spec.timestamp.clone(),
            message: spec.message.clone(),
            files_changed: paths,
            embedding_text: format!("{}\n\n{}", spec.message, spec.summary),
            service_ids: spec.service_ids.clone(),
            component_ids: spec.component_ids.clone(),
            changed_apis: spec.changed_apis.clone(),
            is_doc_change: spec.is_doc_change,
        })
    }

    /// Initializes `dir` and applies every commit of `plan` in order.
    pub fn build(&self, dir: &Path, plan: &RepoPlan) -> Result<Vec<CommitRecord>> {
        info!("Building {} ({} commits)", plan.name, plan.commits.len());
        self.initialize(dir, &plan.default_branch)?;
        plan.commits
            .iter()
            .map(|spec| self.apply_commit(dir, plan, spec))
            .collect()
    }
}

/// Converts an RFC 3339 timestamp to git's raw `<epoch> <offset>` date
/// format so the result never depends on the local timezone.
fn git_date(timestamp: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).map_err(|e| Error::InvalidPlan {
        subject: timestamp.to_string(),
        message: format!("timestamp is not RFC 3339: {}", e),
    })?;
    Ok(format!("{} {}", parsed.timestamp(), parsed.format("%z")))
}
