//! # Dataset Generation
//!
//! Runs the full generation pipeline for a [`Plan`]:
//!
//! 1. **Pre-flight**: validate the plan, check PR references in strict mode,
//!    and refuse to touch an existing base directory unless forced.
//! 2. **Build**: one repository per [`RepoPlan`](crate::plan::RepoPlan),
//!    recording each commit in a [`CommitRegistry`].
//! 3. **Export events**: `git_events.json`.
//! 4. **Synthesize** PR records from the registry.
//! 5. **Export PRs**: `git_prs.json`.
//!
//! [`preflight`] runs step 1 alone and hands back a [`CheckedPlan`];
//! [`build`] runs the rest for it. [`generate`] does both.
//!
//! Everything after pre-flight mutates disk without rollback. A git failure
//! mid-run leaves a partially built base directory behind; the next run needs
//! `force`.

use crate::builder::RepositoryBuilder;
use crate::error::{Error, Result};
use crate::export::{export_commits, export_prs};
use crate::git::GitExecutor;
use crate::plan::Plan;
use crate::registry::CommitRegistry;
use crate::synthesis::{synthesize, Strictness};
use log::info;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Options for a generation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Delete an existing base directory instead of failing.
    pub force: bool,
    pub strictness: Strictness,
}

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerationReport {
    pub base_dir: PathBuf,
    pub events_path: PathBuf,
    pub prs_path: PathBuf,
    pub repo_dirs: Vec<PathBuf>,
    pub commit_count: usize,
    pub pr_count: usize,
}

/// Fails if `base_dir` exists and `force` is not set. Never touches disk.
pub fn check_base_dir(base_dir: &Path, force: bool) -> Result<()> {
    if base_dir.exists() && !force {
        return Err(Error::BaseDirExists {
            path: base_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Clears (when forced) and creates `base_dir`.
pub fn prepare_base_dir(base_dir: &Path, force: bool) -> Result<()> {
    check_base_dir(base_dir, force)?;
    if base_dir.exists() {
        info!("Removing existing {}", base_dir.display());
        fs::remove_dir_all(base_dir)?;
    }
    fs::create_dir_all(base_dir)?;
    Ok(())
}

/// Fails on the first PR template whose repository or commit messages do
/// not exist in `plan`.
pub fn check_references(plan: &Plan) -> Result<()> {
    let mut messages: HashMap<&str, HashSet<&str>> = HashMap::new();
    for repo in &plan.repos {
        messages
            .entry(repo.name.as_str())
            .or_default()
            .extend(repo.commits.iter().map(|c| c.message.as_str()));
    }

    for template in &plan.pull_requests {
        let unresolved = |reason: String| Error::UnresolvedPullRequest {
            repo: template.repo.clone(),
            pr_number: template.pr_number,
            reason,
        };
        let known = messages
            .get(template.repo.as_str())
            .ok_or_else(|| {
                unresolved(format!(
                    "repository '{}' is not in the plan",
                    template.repo
                ))
            })?;
        if let Some(missing) = template
            .commit_messages
            .iter()
            .find(|message| !known.contains(message.as_str()))
        {
            return Err(unresolved(format!("no commit with message '{}'", missing)));
        }
    }
    Ok(())
}

/// A plan that passed [`preflight`] for one set of [`GenerateOptions`].
#[derive(Debug, Clone, Copy)]
pub struct CheckedPlan<'a> {
    plan: &'a Plan,
    options: GenerateOptions,
}

/// Validates `plan`, checks PR references in strict mode, and checks
/// `base_dir`. Never touches disk.
pub fn preflight<'a>(
    base_dir: &Path,
    plan: &'a Plan,
    options: GenerateOptions,
) -> Result<CheckedPlan<'a>> {
    plan.validate()?;
    if options.strictness == Strictness::Strict {
        check_references(plan)?;
    }
    check_base_dir(base_dir, options.force)?;
    Ok(CheckedPlan { plan, options })
}

/// Generates every repository of `plan` under `base_dir` and exports the
/// commit and PR datasets.
pub fn generate(
    base_dir: &Path,
    plan: &Plan,
    git: &dyn GitExecutor,
    options: GenerateOptions,
) -> Result<GenerationReport> {
    let checked = preflight(base_dir, plan, options)?;
    build(base_dir, checked, git)
}

/// [`generate`] for a plan that already passed [`preflight`].
pub fn build(
    base_dir: &Path,
    checked: CheckedPlan<'_>,
    git: &dyn GitExecutor,
) -> Result<GenerationReport> {
    let CheckedPlan { plan, options } = checked;
    prepare_base_dir(base_dir, options.force)?;

    let builder = RepositoryBuilder::new(git);
    let mut registry = CommitRegistry::new();
    let mut repo_dirs = Vec::with_capacity(plan.repos.len());

    for repo in &plan.repos {
        let dir = base_dir.join(&repo.name);
        registry.register_repo(&repo.name);
        for record in builder.build(&dir, repo)? {
            registry.register(record);
        }
        repo_dirs.push(dir);
    }

    let events_path = export_commits(base_dir, &registry)?;
    let pr_records = synthesize(&plan.pull_requests, &registry, options.strictness)?;
    let prs_path = export_prs(base_dir, &pr_records)?;

    info!(
        "Generated {} commits across {} repositories and {} pull requests",
        registry.len(),
        repo_dirs.len(),
        pr_records.len()
    );

    Ok(GenerationReport {
        base_dir: base_dir.to_path_buf(),
        events_path,
        prs_path,
        repo_dirs,
        commit_count: registry.len(),
        pr_count: pr_records.len(),
    })
}
