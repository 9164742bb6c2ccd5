//! # Push Coordinator
//!
//! Commits the generated dataset into the host project and pushes it. The
//! coordinator is a small state machine; each step checks the state it needs
//! and fails with [`Error::PushState`] when called out of order:
//!
//! ```text
//! NotOnBranch --ensure_branch_checked_out--> OnBranch
//! OnBranch    --stage-->                     Staged
//! Staged      --commit-->                    Committed | NothingToCommit
//! Committed   --push-->                      Pushed
//! ```
//!
//! `NothingToCommit` is terminal: a re-run over an unchanged dataset stops
//! there and never pushes.

use crate::error::{Error, Result};
use crate::git::GitExecutor;
use crate::resolve::mask_remote;
use log::{debug, info};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Where the coordinator is in the push sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
    NotOnBranch,
    OnBranch,
    Staged,
    NothingToCommit,
    Committed,
    Pushed,
}

impl fmt::Display for PushState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PushState::NotOnBranch => "NotOnBranch",
            PushState::OnBranch => "OnBranch",
            PushState::Staged => "Staged",
            PushState::NothingToCommit => "NothingToCommit",
            PushState::Committed => "Committed",
            PushState::Pushed => "Pushed",
        };
        f.write_str(name)
    }
}

/// Drives branch checkout, staging, committing and pushing in the project
/// repository.
pub struct PushCoordinator<'a> {
    git: &'a dyn GitExecutor,
    project_root: PathBuf,
    state: PushState,
}

impl<'a> PushCoordinator<'a> {
    pub fn new(git: &'a dyn GitExecutor, project_root: impl Into<PathBuf>) -> Self {
        Self {
            git,
            project_root: project_root.into(),
            state: PushState::NotOnBranch,
        }
    }

    pub fn state(&self) -> PushState {
        self.state
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn require(&self, step: &'static str, expected: PushState) -> Result<()> {
        if self.state != expected {
            return Err(Error::PushState {
                step,
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        self.git.run(&self.project_root, args, &[])
    }

    /// Puts the project on `target`, creating it from `base` when it does not
    /// exist locally. `base` is ignored when empty or equal to the current or
    /// target branch.
    pub fn ensure_branch_checked_out(&mut self, target: &str, base: &str) -> Result<()> {
        self.require("ensure_branch_checked_out", PushState::NotOnBranch)?;

        let current = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if current == target {
            debug!("Already on branch {}", target);
            self.state = PushState::OnBranch;
            return Ok(());
        }

        if !self.git(&["branch", "--list", target])?.is_empty() {
            info!("Switching to existing branch {}", target);
            self.git(&["switch", target])?;
            self.state = PushState::OnBranch;
            return Ok(());
        }

        if !base.is_empty() && base != current && base != target {
            info!("Switching to base branch {}", base);
            self.git(&["switch", base])?;
        }

        info!("Creating branch {}", target);
        if let Err(err) = self.git(&["switch", "-c", target]) {
            debug!(
                "git switch -c failed ({}), falling back to checkout -b",
                err
            );
            self.git(&["checkout", "-b", target])?;
        }
        self.state = PushState::OnBranch;
        Ok(())
    }

    /// Stages the whole project when `include_all` is set, otherwise only
    /// `base_dir`, which must then live inside the project root.
    pub fn stage(&mut self, base_dir: &Path, include_all: bool) -> Result<()> {
        self.require("stage", PushState::OnBranch)?;

        let target = if include_all {
            PathBuf::from(".")
        } else {
            relative_to_root(base_dir, &self.project_root)?
        };
        let target = target.to_string_lossy();
        info!("Staging {}", target);
        self.git(&["add", "-A", "--", &target])?;
        self.state = PushState::Staged;
        Ok(())
    }

    /// Commits the staged changes. Returns `false`, and moves to
    /// `NothingToCommit`, when nothing is staged.
    pub fn commit(&mut self, message: &str) -> Result<bool> {
        self.require("commit", PushState::Staged)?;

        match self
            .git
            .exit_code(&self.project_root, &["diff", "--cached", "--quiet"])?
        {
            0 => {
                info!("No dataset changes to commit");
                self.state = PushState::NothingToCommit;
                Ok(false)
            }
            1 => {
                self.git(&["commit", "-q", "-m", message])?;
                info!("Committed dataset: {}", message);
                self.state = PushState::Committed;
                Ok(true)
            }
            code => Err(Error::GitCommand {
                command: "diff --cached --quiet".to_string(),
                dir: self.project_root.clone(),
                stderr: format!("unexpected exit code {}", code),
            }),
        }
    }

    /// [`stage`](Self::stage) followed by [`commit`](Self::commit).
    pub fn stage_and_commit(
        &mut self,
        base_dir: &Path,
        include_all: bool,
        message: &str,
    ) -> Result<bool> {
        self.stage(base_dir, include_all)?;
        self.commit(message)
    }

    /// Pushes `branch` to `remote` and sets it as upstream.
    pub fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.require("push", PushState::Committed)?;

        info!("Pushing {} to {}", branch, mask_remote(remote));
        self.git(&["push", "--set-upstream", remote, branch])?;
        self.state = PushState::Pushed;
        Ok(())
    }
}

/// `path` relative to `root`, or `.` when they are the same directory.
///
/// `root` must be absolute; a relative `path` is taken relative to it.
/// Symlinks in the existing part of either path are resolved before the
/// comparison; the not-yet-created remainder is compared lexically.
pub fn relative_to_root(path: &Path, root: &Path) -> Result<PathBuf> {
    if !root.is_absolute() {
        return Err(Error::RelativeProjectRoot {
            root: root.to_path_buf(),
        });
    }
    let root_abs = absolutize(root);
    let path_abs = absolutize(&root_abs.join(path));

    match path_abs.strip_prefix(&root_abs) {
        Ok(rel) if rel.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Ok(rel) => Ok(rel.to_path_buf()),
        Err(_) => Err(Error::OutsideProjectRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        }),
    }
}

/// Lexically normalizes `path`, then canonicalizes its deepest existing
/// ancestor.
fn absolutize(path: &Path) -> PathBuf {
    let normalized = normalize(path);
    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(mut resolved) = existing.canonicalize() {
            resolved.extend(missing.iter().rev());
            return resolved;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return normalized,
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
