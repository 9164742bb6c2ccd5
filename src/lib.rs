//! # Synthetic Git Dataset Library
//!
//! `synth-git` builds small, fully deterministic git repositories from a
//! declarative plan and exports what happened in them as JSON: one record per
//! commit (`git_events.json`) and one per narrated pull request
//! (`git_prs.json`). The result is a fixture for tools that ingest repository
//! history, with known content, known authors and known timestamps.
//!
//! ## Quick Example
//!
//! ```
//! use synth_git::catalog::ContentCatalog;
//! use synth_git::plan::Plan;
//!
//! let plan = Plan::builtin(&ContentCatalog::builtin()).unwrap();
//! plan.validate().unwrap();
//!
//! let names: Vec<_> = plan.repos.iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(
//!     names,
//!     ["core-api", "billing-service", "notifications-service", "docs-portal"]
//! );
//! assert_eq!(plan.pull_requests.len(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Content (`catalog`)**: versioned file payloads keyed by name.
//! - **Plan (`plan`)**: repositories, their commits in order, and PR templates
//!   that refer to commits by message.
//! - **Building (`builder`, `git`)**: turns each repository plan into a real
//!   repository with pinned authors and dates, through the [`git::GitExecutor`]
//!   seam.
//! - **Records (`records`, `registry`, `synthesis`, `export`)**: the commit
//!   records produced while building, the PR records derived from them, and
//!   their JSON form.
//! - **Publishing (`resolve`, `push`)**: resolving the target branch and
//!   remote, then committing and pushing the dataset from the host project.
//!
//! ## Execution Flow
//!
//! [`dataset::generate`] runs the whole pipeline:
//!
//! 1.  **Pre-flight**: validate the plan and check the base directory.
//! 2.  **Build**: create every repository and record its commits.
//! 3.  **Export**: write `git_events.json`.
//! 4.  **Synthesize**: derive PR records from the recorded commits.
//! 5.  **Export**: write `git_prs.json`.
//!
//! Nothing reads the process environment implicitly; callers pass an
//! [`environment::EnvMap`] wherever variables matter.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod environment;
pub mod error;
pub mod export;
pub mod git;
pub mod output;
pub mod plan;
pub mod push;
pub mod records;
pub mod registry;
pub mod resolve;
pub mod synthesis;

#[cfg(test)]
mod resolve_proptest;
