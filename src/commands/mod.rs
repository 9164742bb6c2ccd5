//! # CLI Command Implementations
//!
//! Each subcommand of `synth-git` lives in its own file with:
//! - an `Args` struct derived using `clap`;
//! - an `execute` function that performs the command's logic by calling into
//!   the `synth_git` library.
//!
//! The helpers below are shared by commands that need the project root and
//! its configuration.

pub mod generate;
pub mod plan;
pub mod remote;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use synth_git::config::{self, Config};
use synth_git::environment::EnvMap;

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE: &str = "config.yaml";

/// The project root as an absolute path; the current directory by default.
pub fn project_root(arg: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(match arg {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

/// Loads `path`, or `config.yaml` in the project root. A missing file yields
/// the defaults.
pub fn load_config(path: Option<&Path>, project_root: &Path, env: &EnvMap) -> Result<Config> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_root.join(CONFIG_FILE));
    config::from_file(&path, env)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
