//! # Remote Command Implementation
//!
//! Prints the push settings `generate --push` would use without touching any
//! repository. The remote is always masked.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use synth_git::environment::EnvMap;
use synth_git::output::{Marker, OutputConfig};
use synth_git::resolve::{is_url, mask_remote, Resolver};

/// Show the resolved push branch and remote
#[derive(Args, Debug)]
pub struct RemoteArgs {
    /// Target branch override
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Remote name or URL override
    #[arg(long, value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Path to config file (default: config.yaml in the project root)
    #[arg(short, long, value_name = "FILE", env = "SYNTH_GIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the host project repository (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Also print the base directory
    #[arg(long)]
    pub base_dir: bool,
}

/// Execute the remote command
pub fn execute(args: RemoteArgs, env: &EnvMap, out: OutputConfig) -> Result<()> {
    let project_root = super::project_root(args.project_root.as_deref())?;
    let config = super::load_config(args.config.as_deref(), &project_root, env)?;
    let resolver = Resolver::new(env, &config);

    let remote = resolver.remote(args.remote.as_deref());
    let kind = if is_url(&remote) { "url" } else { "named remote" };

    out.status(Marker::Info, "Push settings:");
    out.detail(format!("branch: {}", resolver.branch(args.branch.as_deref())));
    out.detail(format!("base branch: {}", resolver.base_branch()));
    out.detail(format!("remote: {} ({})", mask_remote(&remote), kind));
    if args.base_dir {
        out.detail(format!(
            "base dir: {}",
            resolver.base_dir(None, &project_root).display()
        ));
    }
    Ok(())
}
