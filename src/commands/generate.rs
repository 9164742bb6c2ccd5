//! # Generate Command Implementation
//!
//! Builds the synthetic repositories, exports `git_events.json` and
//! `git_prs.json`, and with `--push` commits the dataset into the host
//! project and pushes it.
//!
//! ## Order of Operations
//!
//! 1. Load configuration and resolve the base directory, branch and remote.
//! 2. Pre-flight: load and validate the plan, check PR references under
//!    `--strict`, check the base directory, and check that selective staging
//!    is possible. Nothing on disk changes if any of these fail.
//! 3. With `--push`: put the project on the target branch.
//! 4. Unless `--skip-generate`: generate the dataset.
//! 5. With `--push`: stage, commit and push. An unchanged dataset skips the
//!    push.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use synth_git::catalog::ContentCatalog;
use synth_git::dataset::{self, GenerateOptions};
use synth_git::environment::EnvMap;
use synth_git::git::SystemGit;
use synth_git::output::{Marker, OutputConfig};
use synth_git::plan::Plan;
use synth_git::push::{relative_to_root, PushCoordinator};
use synth_git::resolve::{mask_remote, Resolver};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory to create the synthetic repositories in
    /// (default: config synthetic_git.base_dir, then data/synthetic_git)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Overwrite the base directory if it already exists
    #[arg(short, long)]
    pub force: bool,

    /// Skip regeneration and only push existing artifacts
    #[arg(long)]
    pub skip_generate: bool,

    /// Commit and push dataset changes after generation
    #[arg(long)]
    pub push: bool,

    /// Target branch override for pushing
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Remote name or URL override for pushing
    #[arg(long, value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Stage the entire project instead of just the dataset directory
    #[arg(long)]
    pub include_all: bool,

    /// Fail on PR templates that reference unknown repositories or commits
    #[arg(long)]
    pub strict: bool,

    /// Plan file (YAML) to generate instead of the built-in plan
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Path to config file (default: config.yaml in the project root)
    #[arg(short, long, value_name = "FILE", env = "SYNTH_GIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the host project repository (defaults to current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the generate command
pub fn execute(args: GenerateArgs, env: &EnvMap, out: OutputConfig) -> Result<()> {
    let out = out.quiet(args.quiet);
    let start_time = Instant::now();

    let project_root = super::project_root(args.project_root.as_deref())?;
    let config = super::load_config(args.config.as_deref(), &project_root, env)?;
    let resolver = Resolver::new(env, &config);

    let base_dir = resolver.base_dir(args.base_dir.as_deref(), &project_root);
    let branch = resolver.branch(args.branch.as_deref());
    let base_branch = resolver.base_branch();
    let options = GenerateOptions {
        force: args.force,
        strictness: resolver.strictness(args.strict),
    };

    let plan = if args.skip_generate {
        None
    } else {
        Some(load_plan(args.plan.as_deref())?)
    };
    let checked = plan
        .as_ref()
        .map(|plan| dataset::preflight(&base_dir, plan, options))
        .transpose()?;
    if args.push && !args.include_all {
        relative_to_root(&base_dir, &project_root)?;
    }

    let git = SystemGit::new(env.clone());
    let mut coordinator = PushCoordinator::new(&git, &project_root);

    if args.push {
        coordinator.ensure_branch_checked_out(&branch, &base_branch)?;
    }

    match checked {
        Some(checked) => {
            let spinner = spinner(&out, "Generating synthetic repositories...")?;
            let result = dataset::build(&base_dir, checked, &git);
            spinner.finish_and_clear();
            let report = result?;

            out.status(
                Marker::Ok,
                format!(
                    "Generated synthetic repos under {}",
                    out.emphasis(report.base_dir.display())
                ),
            );
            out.detail(format!("git_events.json: {}", report.events_path.display()));
            out.detail(format!("git_prs.json: {}", report.prs_path.display()));
            out.detail(format!(
                "{} repositories, {} commits, {} pull requests",
                report.repo_dirs.len(),
                report.commit_count,
                report.pr_count
            ));
        }
        None => out.status(
            Marker::Skip,
            "Skipping generation step; assuming artifacts already exist.",
        ),
    }

    if args.push {
        let remote = resolver.remote(args.remote.as_deref());
        let message = resolver.commit_message(Utc::now());
        if !coordinator.stage_and_commit(&base_dir, args.include_all, &message)? {
            out.status(Marker::Skip, "No staged changes to commit; skipping push.");
            return Ok(());
        }
        out.status(
            Marker::Push,
            format!(
                "Pushing {} to {} ({})...",
                base_dir.display(),
                mask_remote(&remote),
                branch
            ),
        );
        coordinator.push(&remote, &branch)?;
        out.status(Marker::Ok, "Push complete.");
    }

    if !out.quiet {
        println!("   Completed in {:.2?}", start_time.elapsed());
    }
    Ok(())
}

/// Reads `--plan` or assembles the built-in plan.
fn load_plan(path: Option<&Path>) -> Result<Plan> {
    Ok(match path {
        Some(path) => Plan::from_file(path)
            .with_context(|| format!("Failed to load plan from {}", path.display()))?,
        None => Plan::builtin(&ContentCatalog::builtin())?,
    })
}

/// A spinner on stderr, or a hidden bar when output is quiet.
fn spinner(out: &OutputConfig, message: &str) -> Result<ProgressBar> {
    if out.quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
