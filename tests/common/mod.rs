//! Shared test utilities for integration and E2E tests.
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
//!     let project = ProjectFixture::new();
//!     synth_git_cmd().arg("generate").arg("--project-root").arg(project.root()).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::plans;
    #[allow(unused_imports)]
    pub use super::{git, synth_git_cmd, ProjectFixture};
}

/// Variables that change how `synth-git` resolves branches, remotes and
/// configuration. Tests clear them so the host environment cannot leak in.
pub const RESOLUTION_VARS: &[&str] = &[
    "SYNTHETIC_GIT_BRANCH",
    "GIT_DATA_BRANCH",
    "SYNTHETIC_GIT_REMOTE",
    "SYNTHETIC_GIT_REMOTE_URL",
    "GIT_DATA_REMOTE",
    "SYNTHETIC_GIT_TOKEN",
    "GITHUB_TOKEN",
    "SYNTHETIC_GIT_REPO_OWNER",
    "SYNTHETIC_GIT_REPO_NAME",
    "GITHUB_REPO_OWNER",
    "GITHUB_REPO_NAME",
    "SYNTH_GIT_CONFIG",
    "GIT_DIR",
    "GIT_WORK_TREE",
    "RUST_LOG",
];

/// A `synth-git` command with resolution variables cleared and colors off.
#[allow(dead_code)]
pub fn synth_git_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("synth-git");
    for var in RESOLUTION_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Runs the system `git` in `dir` and returns trimmed stdout. Panics on
/// failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A host project repository with one commit on `main`, plus an optional
/// bare remote next to it.
#[allow(dead_code)]
pub struct ProjectFixture {
    pub temp_dir: TempDir,
    root: PathBuf,
    remote: Option<PathBuf>,
}

#[allow(dead_code)]
impl ProjectFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.child("project");
        project.create_dir_all().unwrap();
        let root = project.path().to_path_buf();

        git(&root, &["init", "-q", "-b", "main"]);
        git(&root, &["config", "user.name", "Fixture"]);
        git(&root, &["config", "user.email", "fixture@example.com"]);
        git(&root, &["config", "commit.gpgsign", "false"]);
        project
            .child("README.md")
            .write_str("# host project\n")
            .unwrap();
        git(&root, &["add", "README.md"]);
        git(&root, &["commit", "-q", "-m", "initial"]);

        Self {
            temp_dir,
            root,
            remote: None,
        }
    }

    /// Adds a bare repository and registers it as `origin`.
    pub fn with_remote(mut self) -> Self {
        let remote = self.temp_dir.child("remote.git");
        remote.create_dir_all().unwrap();
        git(remote.path(), &["init", "-q", "--bare"]);
        let url = remote.path().to_string_lossy().to_string();
        git(&self.root, &["remote", "add", "origin", &url]);
        self.remote = Some(remote.path().to_path_buf());
        self
    }

    /// Writes `config.yaml` in the project root.
    pub fn with_config(self, yaml: &str) -> Self {
        std::fs::write(self.root.join("config.yaml"), yaml).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn remote(&self) -> &Path {
        self.remote.as_deref().expect("fixture has no remote")
    }

    pub fn base_dir(&self) -> PathBuf {
        self.root.join("data/synthetic_git")
    }

    /// Number of commits on `branch` in the project.
    pub fn commit_count(&self, branch: &str) -> usize {
        git(&self.root, &["rev-list", "--count", branch])
            .parse()
            .unwrap()
    }
}

/// Plan documents for tests.
#[allow(dead_code)]
pub mod plans {
    /// One repository, three commits, two PRs. The second PR references a
    /// commit message that does not exist.
    pub const SMALL: &str = r##"
repos:
  - name: svc
    repo_url: https://example.com/acme/svc
    default_branch: main
    commits:
      - message: "feat: add api"
        summary: Adds the first endpoint.
        author: Alice
        author_email: alice@example.com
        timestamp: "2025-03-01T09:00:00Z"
        files:
          - path: src/api.py
            content: "def handler():\n    return 1\n"
          - path: README.md
            content: "# svc\n"
        service_ids: [svc]
        component_ids: [svc.api]
        changed_apis: [/v1/api]
      - message: "docs: describe api"
        summary: Documents the endpoint.
        author: Bob
        author_email: bob@example.com
        timestamp: "2025-03-02T10:30:00+02:00"
        files:
          - path: docs/api.md
            content: "Call /v1/api.\n"
        is_doc_change: true
      - message: "fix: handler returns 2"
        summary: Bumps the return value.
        author: Alice
        author_email: alice@example.com
        timestamp: "2025-03-03T08:15:00Z"
        files:
          - path: src/api.py
            content: "def handler():\n    return 2\n"
pull_requests:
  - repo: svc
    repo_url: https://example.com/acme/svc
    branch: main
    pr_number: 7
    author: alice
    timestamp: "2025-03-03T12:00:00Z"
    title: Ship the api
    body: Adds and fixes the handler.
    merged: true
    text_for_embedding: "PR #7 ships the api"
    labels: [api]
    commit_messages:
      - "fix: handler returns 2"
      - "feat: add api"
  - repo: svc
    repo_url: https://example.com/acme/svc
    branch: main
    pr_number: 8
    author: bob
    timestamp: "2025-03-04T12:00:00Z"
    title: Dangling
    body: References a commit that never happened.
    merged: false
    text_for_embedding: "PR #8"
    commit_messages:
      - "docs: describe api"
      - "chore: never committed"
"##;

    /// A plan whose first commit has an unparseable timestamp.
    pub const BAD_TIMESTAMP: &str = r##"
repos:
  - name: svc
    repo_url: https://example.com/acme/svc
    commits:
      - message: "feat: add api"
        summary: x
        author: Alice
        author_email: alice@example.com
        timestamp: "yesterday"
        files:
          - path: a.txt
            content: "a\n"
"##;

    /// Two commits sharing one message.
    pub const DUPLICATE_MESSAGE: &str = r##"
repos:
  - name: svc
    repo_url: https://example.com/acme/svc
    commits:
      - message: "chore: tweak"
        summary: First tweak.
        author: Alice
        author_email: alice@example.com
        timestamp: "2025-03-01T09:00:00Z"
        files:
          - path: a.txt
            content: "a\n"
      - message: "chore: tweak"
        summary: Second tweak.
        author: Alice
        author_email: alice@example.com
        timestamp: "2025-03-02T09:00:00Z"
        files:
          - path: a.txt
            content: "b\n"
"##;
}
