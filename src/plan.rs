//! # Plan Model
//!
//! The plan is the immutable description of everything `synth-git` will
//! build: one [`RepoPlan`] per synthetic repository, each with an ordered list
//! of [`CommitSpec`]s, plus the [`PrTemplate`]s that narrate those commits as
//! pull requests.
//!
//! Plans come from two places:
//!
//! - [`Plan::builtin`] assembles the payments/VAT breaking-change story from a
//!   [`ContentCatalog`].
//! - [`Plan::from_file`] reads a YAML (or JSON) document with the same shape,
//!   which is what `synth-git plan` prints.
//!
//! [`Plan::validate`] runs before anything touches the filesystem.

use crate::catalog::ContentCatalog;
use crate::error::{Error, Result};
use chrono::DateTime;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// One file's full text at one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    pub content: String,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A commit as intended, before it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSpec {
    /// Commit message. Also the key PR templates use to reference the commit.
    pub message: String,
    pub summary: String,
    pub author: String,
    pub author_email: String,
    /// RFC 3339 timestamp used for both author and committer dates.
    pub timestamp: String,
    pub files: Vec<FileSpec>,
    #[serde(default)]
    pub service_ids: Vec<String>,
    #[serde(default)]
    pub component_ids: Vec<String>,
    #[serde(default)]
    pub changed_apis: Vec<String>,
    #[serde(default)]
    pub is_doc_change: bool,
}

impl CommitSpec {
    /// Starts a commit with no files and no tags.
    pub fn new(
        message: impl Into<String>,
        summary: impl Into<String>,
        author: (&str, &str),
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            summary: summary.into(),
            author: author.0.to_string(),
            author_email: author.1.to_string(),
            timestamp: timestamp.into(),
            files: Vec::new(),
            service_ids: Vec::new(),
            component_ids: Vec::new(),
            changed_apis: Vec::new(),
            is_doc_change: false,
        }
    }

    pub fn with_files(mut self, files: Vec<FileSpec>) -> Self {
        self.files = files;
        self
    }

    pub fn with_services(mut self, ids: &[&str]) -> Self {
        self.service_ids = to_strings(ids);
        self
    }

    pub fn with_components(mut self, ids: &[&str]) -> Self {
        self.component_ids = to_strings(ids);
        self
    }

    pub fn with_apis(mut self, apis: &[&str]) -> Self {
        self.changed_apis = to_strings(apis);
        self
    }

    pub fn doc_change(mut self) -> Self {
        self.is_doc_change = true;
        self
    }

    /// Paths written by this commit, in plan order.
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// The full intended lifecycle of one synthetic repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPlan {
    /// Directory name under the base directory and the `repo` field of every
    /// record.
    pub name: String,
    pub repo_url: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub commits: Vec<CommitSpec>,
}

fn default_branch() -> String {
    "main".to_string()
}

/// An intended pull request, referencing commits by message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrTemplate {
    pub repo: String,
    pub repo_url: String,
    pub branch: String,
    pub pr_number: u64,
    pub author: String,
    pub timestamp: String,
    pub title: String,
    pub body: String,
    pub merged: bool,
    #[serde(rename = "text_for_embedding", alias = "embedding_text")]
    pub embedding_text: String,
    #[serde(default)]
    pub service_ids: Vec<String>,
    #[serde(default)]
    pub component_ids: Vec<String>,
    #[serde(default)]
    pub changed_apis: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub commit_messages: Vec<String>,
}

/// Everything to generate: repositories in build order, then PR templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub repos: Vec<RepoPlan>,
    #[serde(default)]
    pub pull_requests: Vec<PrTemplate>,
}

impl Plan {
    /// Reads a plan from a YAML or JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the plan for problems that would otherwise surface halfway
    /// through generation. Nothing on disk is touched.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();

        for repo in &self.repos {
            if !is_single_component(&repo.name) {
                return Err(invalid(
                    &repo.name,
                    "repository name must be a single, non-empty path component",
                ));
            }
            if !names.insert(repo.name.as_str()) {
                return Err(invalid(&repo.name, "repository name is used more than once"));
            }
            if repo.default_branch.trim().is_empty() {
                return Err(invalid(&repo.name, "default branch is empty"));
            }

            let mut messages = HashSet::new();
            for commit in &repo.commits {
                let subject = format!("{} commit '{}'", repo.name, commit.message);
                if commit.message.trim().is_empty() {
                    return Err(invalid(&repo.name, "commit message is empty"));
                }
                if commit.files.is_empty() {
                    return Err(invalid(&subject, "commit writes no files"));
                }
                check_timestamp(&subject, &commit.timestamp)?;
                for file in &commit.files {
                    if !is_relative_inside(&file.path) {
                        let message = format!(
                            "file path '{}' must be relative and stay inside the repository",
                            file.path
                        );
                        return Err(invalid(&subject, &message));
                    }
                }
                if !messages.insert(commit.message.as_str()) {
                    warn!(
                        "{}: commit message '{}' appears more than once; \
                         pull requests will resolve to the last one",
                        repo.name, commit.message
                    );
                }
            }
        }

        for template in &self.pull_requests {
            let subject = format!("{}#{}", template.repo, template.pr_number);
            check_timestamp(&subject, &template.timestamp)?;
        }

        Ok(())
    }

    /// The built-in dataset: a breaking change to the core payments API and
    /// the uneven way three dependent repositories catch up with it.
    pub fn builtin(catalog: &ContentCatalog) -> Result<Self> {
        let file = |repo: &str, path: &str, version: &str| -> Result<FileSpec> {
            let text = catalog.get(&format!("{}/{}", repo, path), version)?;
            Ok(FileSpec::new(path, text))
        };

        let alice = ("alice", "alice@oqoqo.local");
        let bob = ("bob", "bob@oqoqo.local");
        let carol = ("carol", "carol@oqoqo.local");
        let dave = ("dave", "dave@oqoqo.local");
        let eve = ("eve", "eve@oqoqo.local");
        let payments_api = ["/v1/payments/create"];

        let core_api = RepoPlan {
            name: "core-api".to_string(),
            repo_url: "https://github.com/acme/core-api".to_string(),
            default_branch: default_branch(),
            commits: vec![
                CommitSpec::new(
                    "feat: add payments endpoint",
                    "Bootstrap the shared payments module and OpenAPI spec.",
                    alice,
                    "2025-11-24T09:00:00Z",
                )
                .with_files(vec![
                    file("core-api", "README.md", "v1")?,
                    file("core-api", "src/auth.py", "v1")?,
                    file("core-api", "src/payments.py", "initial")?,
                    file("core-api", "openapi/payments.yaml", "initial")?,
                    file("core-api", "docs/payments.md", "v1")?,
                ]),
                CommitSpec::new(
                    "feat: allow optional vat_code",
                    "Allow downstream callers to pass vat_code without enforcing it.",
                    alice,
                    "2025-11-24T16:00:00Z",
                )
                .with_files(vec![
                    file("core-api", "src/payments.py", "optional-vat")?,
                    file("core-api", "openapi/payments.yaml", "optional-vat")?,
                ]),
                CommitSpec::new(
                    "feat!: require vat_code for EU",
                    "Breaking change: vat_code must be provided for EU payments.",
                    alice,
                    "2025-11-25T10:15:00Z",
                )
                .with_files(vec![
                    file("core-api", "src/payments.py", "required-vat")?,
                    file("core-api", "openapi/payments.yaml", "required-vat")?,
                ]),
            ]
            .into_iter()
            .map(|c| {
                c.with_services(&["core-api-service"])
                    .with_components(&["core.payments"])
                    .with_apis(&payments_api)
            })
            .collect(),
        };

        let billing = RepoPlan {
            name: "billing-service".to_string(),
            repo_url: "https://github.com/acme/billing-service".to_string(),
            default_branch: default_branch(),
            commits: vec![
                CommitSpec::new(
                    "feat: initial checkout integration",
                    "Initial billing->core-api wiring without vat_code.",
                    bob,
                    "2025-11-24T11:30:00Z",
                )
                .with_files(vec![
                    file("billing-service", "README.md", "v1")?,
                    file("billing-service", "src/core_api_client.py", "initial")?,
                    file("billing-service", "src/checkout.py", "initial")?,
                    file("billing-service", "config/core_api.yml", "v1")?,
                    file("billing-service", "docs/billing_onboarding.md", "v1")?,
                    file("billing-service", "docs/api_usage.md", "initial")?,
                ]),
                CommitSpec::new(
                    "feat: expand checkout rules",
                    "Add invoice path but still rely on old API contract.",
                    bob,
                    "2025-11-24T18:45:00Z",
                )
                .with_files(vec![file("billing-service", "src/checkout.py", "expanded")?]),
                CommitSpec::new(
                    "fix: include vat_code for EU carts",
                    "Patch checkout to pass vat_code but only for invoice flows.",
                    bob,
                    "2025-11-26T09:10:00Z",
                )
                .with_files(vec![
                    file("billing-service", "src/core_api_client.py", "with-vat")?,
                    file("billing-service", "src/checkout.py", "partial-fix")?,
                ]),
                CommitSpec::new(
                    "docs: refresh onboarding",
                    "Update API usage notes but onboarding doc still omits vat_code.",
                    carol,
                    "2025-11-26T16:00:00Z",
                )
                .with_files(vec![file("billing-service", "docs/api_usage.md", "updated")?])
                .doc_change(),
            ]
            .into_iter()
            .map(|c| {
                c.with_services(&["billing-service"])
                    .with_components(&["billing.checkout"])
                    .with_apis(&payments_api)
            })
            .collect(),
        };

        let notifications = RepoPlan {
            name: "notifications-service".to_string(),
            repo_url: "https://github.com/acme/notifications-service".to_string(),
            default_branch: default_branch(),
            commits: vec![
                CommitSpec::new(
                    "feat: send payment receipt notifications",
                    "Wire notifications to call /v1/notifications/send.",
                    dave,
                    "2025-11-24T12:15:00Z",
                )
                .with_files(vec![
                    file("notifications-service", "README.md", "v1")?,
                    file("notifications-service", "src/notifications.py", "v1")?,
                    file("notifications-service", "src/scheduler.py", "interval-60")?,
                    file(
                        "notifications-service",
                        "docs/notification_playbook.md",
                        "v1",
                    )?,
                ])
                .with_apis(&["/v1/notifications/send"]),
                CommitSpec::new(
                    "chore: tweak scheduler interval",
                    "Increase polling interval to reduce load.",
                    dave,
                    "2025-11-24T18:00:00Z",
                )
                .with_files(vec![file(
                    "notifications-service",
                    "src/scheduler.py",
                    "interval-120",
                )?]),
            ]
            .into_iter()
            .map(|c| {
                c.with_services(&["notifications-service"])
                    .with_components(&["notifications.dispatch"])
            })
            .collect(),
        };

        let docs_portal = RepoPlan {
            name: "docs-portal".to_string(),
            repo_url: "https://github.com/acme/docs-portal".to_string(),
            default_branch: default_branch(),
            commits: vec![
                CommitSpec::new(
                    "docs: document payments API",
                    "Initial docs portal entry without vat_code.",
                    eve,
                    "2025-11-24T13:00:00Z",
                )
                .with_files(vec![
                    file("docs-portal", "docs/payments_api.md", "initial")?,
                    file("docs-portal", "docs/billing_flows.md", "initial")?,
                    file("docs-portal", "docs/changelog.md", "initial")?,
                ]),
                CommitSpec::new(
                    "docs: partial VAT update",
                    "Payments doc references VAT but billing flows remain stale.",
                    eve,
                    "2025-11-26T11:00:00Z",
                )
                .with_files(vec![
                    file("docs-portal", "docs/payments_api.md", "vat-note")?,
                    file("docs-portal", "docs/changelog.md", "vat-note")?,
                ]),
            ]
            .into_iter()
            .map(|c| {
                c.with_services(&["docs-portal"])
                    .with_components(&["docs.payments"])
                    .with_apis(&payments_api)
                    .doc_change()
            })
            .collect(),
        };

        Ok(Self {
            repos: vec![core_api, billing, notifications, docs_portal],
            pull_requests: builtin_pull_requests(),
        })
    }
}

fn builtin_pull_requests() -> Vec<PrTemplate> {
    vec![
        PrTemplate {
            repo: "core-api".to_string(),
            repo_url: "https://github.com/acme/core-api".to_string(),
            branch: "main".to_string(),
            pr_number: 2041,
            author: "alice".to_string(),
            timestamp: "2025-11-25T14:00:00Z".to_string(),
            title: "Add required vat_code to /v1/payments/create".to_string(),
            body: "Breaking change: /v1/payments/create now requires vat_code for EU customers. \
                   Downstream services must update their integrations and doc owners should refresh guides."
                .to_string(),
            merged: true,
            embedding_text: "PR #2041: Add required vat_code to /v1/payments/create. \
                             Breaking change requiring vat_code for EU customers."
                .to_string(),
            service_ids: to_strings(&["core-api-service"]),
            component_ids: to_strings(&["core.payments"]),
            changed_apis: to_strings(&["/v1/payments/create"]),
            labels: to_strings(&["breaking_change", "api_contract"]),
            commit_messages: to_strings(&["feat!: require vat_code for EU"]),
        },
        PrTemplate {
            repo: "billing-service".to_string(),
            repo_url: "https://github.com/acme/billing-service".to_string(),
            branch: "main".to_string(),
            pr_number: 118,
            author: "bob".to_string(),
            timestamp: "2025-11-26T12:30:00Z".to_string(),
            title: "Fix 400 errors by adding vat_code to payments API calls".to_string(),
            body: "We are seeing 400s from core-api after vat_code became mandatory. \
                   This PR threads vat_code through checkout and notes that docs still need a deeper refresh."
                .to_string(),
            merged: true,
            embedding_text: "PR #118: Fix 400 errors by adding vat_code to payments API calls. \
                             Adds vat_code payloads for EU carts but onboarding doc is still incomplete."
                .to_string(),
            service_ids: to_strings(&["billing-service"]),
            component_ids: to_strings(&["billing.checkout"]),
            changed_apis: to_strings(&["/v1/payments/create"]),
            labels: to_strings(&["incident", "docs_followup"]),
            commit_messages: to_strings(&[
                "fix: include vat_code for EU carts",
                "docs: refresh onboarding",
            ]),
        },
    ]
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn invalid(subject: &str, message: &str) -> Error {
    Error::InvalidPlan {
        subject: subject.to_string(),
        message: message.to_string(),
    }
}

fn check_timestamp(subject: &str, timestamp: &str) -> Result<()> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|_| ())
        .map_err(|e| {
            let message = format!("timestamp '{}' is not RFC 3339: {}", timestamp, e);
            invalid(subject, &message)
        })
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn is_relative_inside(path: &str) -> bool {
    let path = Path::new(path);
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}
