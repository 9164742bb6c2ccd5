//! # Git Invocation
//!
//! Every repository mutation in `synth-git` goes through the system `git`
//! binary. [`GitExecutor`] is the seam: [`SystemGit`] runs real processes, and
//! tests substitute recording fakes.
//!
//! Invocations never inherit ambient state. Each call names its working
//! directory, and [`SystemGit`] replaces the child environment with the
//! [`EnvMap`] it was built from plus any per-call overrides. Arguments and
//! error output are passed through [`redact_credentials`] before they reach a
//! log line or an error message.

use crate::environment::EnvMap;
use crate::error::{Error, Result};
use crate::resolve::redact_credentials;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for git operations - allows mocking in tests
pub trait GitExecutor {
    /// Runs `git <args>` in `dir` and returns its trimmed stdout.
    ///
    /// `extra_env` is layered over the executor's environment for this call
    /// only. A non-zero exit is an error.
    fn run(&self, dir: &Path, args: &[&str], extra_env: &[(&str, &str)]) -> Result<String>;

    /// Runs `git <args>` in `dir` and returns the exit code without treating
    /// a non-zero code as failure.
    fn exit_code(&self, dir: &Path, args: &[&str]) -> Result<i32>;
}

/// Runs the `git` found on the `PATH` of the given environment.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    env: EnvMap,
}

impl SystemGit {
    pub fn new(env: EnvMap) -> Self {
        Self {
            program: PathBuf::from("git"),
            env,
        }
    }

    /// Uses a specific git binary instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, dir: &Path, args: &[&str], extra_env: &[(&str, &str)]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            .env_clear()
            .envs(self.env.iter())
            .envs(extra_env.iter().copied());
        cmd
    }
}

impl GitExecutor for SystemGit {
    fn run(&self, dir: &Path, args: &[&str], extra_env: &[(&str, &str)]) -> Result<String> {
        let display = describe(args);
        debug!("git {} (in {})", display, dir.display());

        let output = self
            .command(dir, args, extra_env)
            .output()
            .map_err(|e| Error::GitSpawn {
                command: display.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GitCommand {
                command: display,
                dir: dir.to_path_buf(),
                stderr: redact_credentials(stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn exit_code(&self, dir: &Path, args: &[&str]) -> Result<i32> {
        let display = describe(args);
        debug!("git {} (in {})", display, dir.display());

        let output = self
            .command(dir, args, &[])
            .output()
            .map_err(|e| Error::GitSpawn {
                command: display.clone(),
                message: e.to_string(),
            })?;

        output.status.code().ok_or_else(|| Error::GitCommand {
            command: display,
            dir: dir.to_path_buf(),
            stderr: "terminated by signal".to_string(),
        })
    }
}

fn describe(args: &[&str]) -> String {
    redact_credentials(&args.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git() -> SystemGit {
        SystemGit::new(EnvMap::from_process())
    }

    #[test]
    fn test_run_returns_trimmed_stdout() {
        let temp = TempDir::new().unwrap();
        let git = git();
        git.run(temp.path(), &["init", "-q"], &[]).unwrap();
        let inside = git
            .run(temp.path(), &["rev-parse", "--is-inside-work-tree"], &[])
            .unwrap();
        assert_eq!(inside, "true");
    }

    #[test]
    fn test_run_failure_carries_stderr() {
        let temp = TempDir::new().unwrap();
        let err = git()
            .run(temp.path(), &["rev-parse", "HEAD"], &[])
            .unwrap_err();
        match err {
            Error::GitCommand { command, dir, .. } => {
                assert_eq!(command, "rev-parse HEAD");
                assert_eq!(dir, temp.path());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_describe_redacts_credentials() {
        let display = describe(&[
            "push",
            "--set-upstream",
            "https://ghp_secret@github.com/o/r.git",
            "main",
        ]);
        assert_eq!(
            display,
            "push --set-upstream https://***@github.com/o/r.git main"
        );
    }

    #[test]
    fn test_exit_code_reports_nonzero_without_error() {
        let temp = TempDir::new().unwrap();
        let code = git().exit_code(temp.path(), &["rev-parse", "HEAD"]).unwrap();
        assert_ne!(code, 0);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let err = git()
            .with_program(temp.path().join("no-such-git"))
            .run(temp.path(), &["status"], &[])
            .unwrap_err();
        assert!(matches!(err, Error::GitSpawn { .. }));
    }

    #[test]
    fn test_extra_env_is_visible_to_git() {
        let temp = TempDir::new().unwrap();
        let git = git();
        git.run(temp.path(), &["init", "-q"], &[]).unwrap();
        let ident = git
            .run(
                temp.path(),
                &["var", "GIT_AUTHOR_IDENT"],
                &[
                    ("GIT_AUTHOR_NAME", "Probe"),
                    ("GIT_AUTHOR_EMAIL", "probe@example.com"),
                    ("GIT_AUTHOR_DATE", "2025-01-01T00:00:00Z"),
                ],
            )
            .unwrap();
        assert!(ident.starts_with("Probe <probe@example.com> 1735689600"));
    }
}
