//! # Error Handling
//!
//! This module defines the centralized error type for `synth-git`. It uses
//! `thiserror` to describe every failure mode of the generation and push
//! pipeline with enough context to act on the message.
//!
//! Failures fall into three groups:
//!
//! - **Tool failures** (`GitCommand`, `GitSpawn`): any `git` invocation that
//!   cannot be started or exits non-zero. These are fatal and never retried.
//! - **Pre-flight failures** (`BaseDirExists`, `OutsideProjectRoot`,
//!   `RelativeProjectRoot`, `InvalidPlan`, `ConfigParse`): detected before
//!   anything on disk is touched.
//! - **State failures** (`PushState`, `UnresolvedPullRequest`): the caller
//!   asked for something the current state does not allow, or strict PR
//!   synthesis found a dangling reference.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for synth-git operations
#[derive(Error, Debug)]
pub enum Error {
    /// A `git` invocation ran but exited unsuccessfully.
    #[error("Git command failed in {}: git {command} - {stderr}", dir.display())]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// The `git` binary could not be started at all.
    #[error("Failed to run git {command}: {message}")]
    GitSpawn { command: String, message: String },

    /// The base output directory exists and `--force` was not given.
    #[error("{} already exists. Re-run with --force to overwrite.", path.display())]
    BaseDirExists { path: PathBuf },

    /// Selective staging was requested for a directory outside the project.
    #[error("{} is outside the repository root {}; cannot stage selectively", path.display(), root.display())]
    OutsideProjectRoot { path: PathBuf, root: PathBuf },

    /// The project root was given as a relative path.
    #[error("Project root {} must be an absolute path", root.display())]
    RelativeProjectRoot { root: PathBuf },

    /// The plan failed pre-flight validation.
    #[error("Invalid plan for {subject}: {message}")]
    InvalidPlan { subject: String, message: String },

    /// No payload is registered in the content catalog under this key.
    #[error("Unknown content {name}@{version}")]
    UnknownContent { name: String, version: String },

    /// Strict PR synthesis hit a reference it could not resolve.
    #[error("Pull request {repo}#{pr_number} cannot be resolved: {reason}")]
    UnresolvedPullRequest {
        repo: String,
        pr_number: u64,
        reason: String,
    },

    /// A push coordinator step was invoked out of order.
    #[error("Push step '{step}' requires state {expected}, but coordinator is {actual}")]
    PushState {
        step: &'static str,
        expected: String,
        actual: String,
    },

    /// The configuration file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "commit -m msg".to_string(),
            dir: PathBuf::from("/tmp/repo"),
            stderr: "nothing to commit".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("/tmp/repo"));
        assert!(display.contains("git commit -m msg"));
        assert!(display.contains("nothing to commit"));
    }

    #[test]
    fn test_error_display_base_dir_exists() {
        let error = Error::BaseDirExists {
            path: PathBuf::from("data/synthetic_git"),
        };
        let display = format!("{}", error);
        assert!(display.contains("data/synthetic_git already exists"));
        assert!(display.contains("--force"));
    }

    #[test]
    fn test_error_display_outside_project_root() {
        let error = Error::OutsideProjectRoot {
            path: PathBuf::from("/elsewhere/out"),
            root: PathBuf::from("/work/project"),
        };
        let display = format!("{}", error);
        assert!(display.contains("/elsewhere/out"));
        assert!(display.contains("cannot stage selectively"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "invalid type: sequence".to_string(),
            hint: Some("synthetic_git must be a mapping".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("must be a mapping"));
    }

    #[test]
    fn test_error_display_push_state() {
        let error = Error::PushState {
            step: "push",
            expected: "Committed".to_string(),
            actual: "OnBranch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Push step 'push' requires state Committed, but coordinator is OnBranch"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let error: Error = json_error.into();
        assert!(error.to_string().starts_with("JSON error"));
    }
}
