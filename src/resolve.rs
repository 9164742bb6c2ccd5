//! # Branch and Remote Resolution
//!
//! Every push setting follows the same precedence chain:
//!
//! 1. the explicit value given on the command line;
//! 2. the first non-empty variable from a fixed, ordered list;
//! 3. a field from the configuration file;
//! 4. a hard-coded default.
//!
//! | Setting | Environment | Configuration | Default |
//! |---|---|---|---|
//! | branch | `SYNTHETIC_GIT_BRANCH`, `GIT_DATA_BRANCH` | `synthetic_git.branch`, `github.base_branch` | `main` |
//! | remote | `SYNTHETIC_GIT_REMOTE`, `SYNTHETIC_GIT_REMOTE_URL`, `GIT_DATA_REMOTE` | `synthetic_git.remote_url`, then a token remote | `origin` |
//!
//! A token remote is `https://<token>@github.com/<owner>/<repo>.git` and is
//! only built when a token, an owner and a repository name all resolve. It
//! carries the credential in clear text, so anything shown to a user or
//! written to a log goes through [`mask_remote`] or [`redact_credentials`]
//! first.

use crate::config::Config;
use crate::environment::EnvMap;
use crate::synthesis::Strictness;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const BRANCH_ENV_VARS: &[&str] = &["SYNTHETIC_GIT_BRANCH", "GIT_DATA_BRANCH"];
pub const REMOTE_ENV_VARS: &[&str] = &[
    "SYNTHETIC_GIT_REMOTE",
    "SYNTHETIC_GIT_REMOTE_URL",
    "GIT_DATA_REMOTE",
];
pub const TOKEN_ENV_VARS: &[&str] = &["SYNTHETIC_GIT_TOKEN", "GITHUB_TOKEN"];

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BASE_DIR: &str = "data/synthetic_git";
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore(synthetic-git): refresh dataset";

/// Resolves push settings from arguments, an environment snapshot and the
/// configuration file.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    env: &'a EnvMap,
    config: &'a Config,
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a EnvMap, config: &'a Config) -> Self {
        Self { env, config }
    }

    /// Branch the dataset is committed and pushed to.
    pub fn branch(&self, arg: Option<&str>) -> String {
        non_empty(arg)
            .or_else(|| self.env.first_of(BRANCH_ENV_VARS))
            .or_else(|| configured(&self.config.synthetic_git.branch))
            .or_else(|| configured(&self.config.github.base_branch))
            .unwrap_or(DEFAULT_BRANCH)
            .to_string()
    }

    /// Branch a missing target branch is created from.
    pub fn base_branch(&self) -> String {
        configured(&self.config.synthetic_git.base_branch)
            .or_else(|| configured(&self.config.github.base_branch))
            .unwrap_or(DEFAULT_BRANCH)
            .to_string()
    }

    /// Remote name or URL to push to. May contain a credential; mask before
    /// display.
    pub fn remote(&self, arg: Option<&str>) -> String {
        if let Some(remote) = non_empty(arg)
            .or_else(|| self.env.first_of(REMOTE_ENV_VARS))
            .or_else(|| configured(&self.config.synthetic_git.remote_url))
        {
            return remote.to_string();
        }
        self.token_remote()
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string())
    }

    /// Builds an authenticated GitHub HTTPS remote when a token, owner and
    /// repository name are all available.
    pub fn token_remote(&self) -> Option<String> {
        let synthetic = &self.config.synthetic_git;
        let github = &self.config.github;

        let token = self
            .env
            .first_of(TOKEN_ENV_VARS)
            .or_else(|| configured(&synthetic.token))?;
        let owner = self
            .env
            .get("SYNTHETIC_GIT_REPO_OWNER")
            .or_else(|| configured(&synthetic.repo_owner))
            .or_else(|| self.env.get("GITHUB_REPO_OWNER"))
            .or_else(|| configured(&github.repo_owner))?;
        let repo_name = self
            .env
            .get("SYNTHETIC_GIT_REPO_NAME")
            .or_else(|| configured(&synthetic.repo_name))
            .or_else(|| self.env.get("GITHUB_REPO_NAME"))
            .or_else(|| configured(&github.repo_name))?;

        Some(format!(
            "https://{}@github.com/{}/{}.git",
            token, owner, repo_name
        ))
    }

    /// Output directory for the dataset. Relative paths are anchored at
    /// `project_root`; a leading `~` expands to the home directory.
    pub fn base_dir(&self, arg: Option<&Path>, project_root: &Path) -> PathBuf {
        let raw = arg
            .map(Path::to_path_buf)
            .or_else(|| configured(&self.config.synthetic_git.base_dir).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));
        let expanded = self.expand_home(&raw);
        if expanded.is_absolute() {
            expanded
        } else {
            project_root.join(expanded)
        }
    }

    fn expand_home(&self, path: &Path) -> PathBuf {
        let Ok(rest) = path.strip_prefix("~") else {
            return path.to_path_buf();
        };
        let home = self
            .env
            .get("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir);
        match home {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        }
    }

    /// Commit message for the dataset commit in the host project.
    pub fn commit_message(&self, now: DateTime<Utc>) -> String {
        let base = configured(&self.config.synthetic_git.commit_message)
            .unwrap_or(DEFAULT_COMMIT_MESSAGE);
        format!("{} @ {}", base, now.format("%Y-%m-%dT%H:%M:%SZ"))
    }

    /// Strict PR synthesis if the flag is set or the configuration asks for it.
    pub fn strictness(&self, strict_flag: bool) -> Strictness {
        if strict_flag || self.config.synthetic_git.strict_prs {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn configured(value: &Option<String>) -> Option<&str> {
    non_empty(value.as_deref())
}

/// Replaces the credential in `scheme://credential@host/path` with `***`.
/// Anything without a credential in the authority passes through unchanged.
pub fn mask_remote(remote: &str) -> String {
    let Some((scheme, rest)) = remote.split_once("://") else {
        return remote.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => remote.to_string(),
    }
}

/// Masks every credential-bearing URL inside free text, such as git's error
/// output.
pub fn redact_credentials(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"([A-Za-z][A-Za-z0-9+.\-]*://)[^\s/@]+@").expect("static pattern is valid")
    });
    pattern.replace_all(text, "${1}***@").into_owned()
}

/// Whether `remote` is a URL rather than the name of a configured remote.
/// scp-style addresses (`git@host:path`) count as URLs.
pub fn is_url(remote: &str) -> bool {
    if url::Url::parse(remote).is_ok_and(|url| !url.cannot_be_a_base()) {
        return true;
    }
    remote.contains('@') && remote.contains(':')
}
