//! # Pull Request Synthesis
//!
//! Resolves [`PrTemplate`]s against the [`CommitRegistry`] and produces
//! [`PrRecord`]s whose `files_changed` is derived from the commits the
//! template names.
//!
//! Resolution happens in two visible steps:
//!
//! 1. [`resolve_commits`] turns each referenced message into a
//!    [`CommitLookup`], either `Found` or `Missing`.
//! 2. [`aggregate_files`] takes the union of the found commits' file lists,
//!    keeping the order in which paths were first seen.
//!
//! In [`Strictness::Lenient`] mode (the default) a template whose repository
//! was never built is dropped, and missing messages contribute nothing. In
//! [`Strictness::Strict`] mode either situation is an error.

use crate::error::{Error, Result};
use crate::plan::PrTemplate;
use crate::records::{CommitRecord, PrRecord, SourceType};
use crate::registry::CommitRegistry;
use log::debug;
use std::collections::HashSet;

/// How unresolved references are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Drop or skip what cannot be resolved.
    #[default]
    Lenient,
    /// Fail on the first unresolved repository or commit message.
    Strict,
}

/// Outcome of looking up one commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitLookup<'a> {
    Found(&'a CommitRecord),
    Missing(&'a str),
}

impl<'a> CommitLookup<'a> {
    pub fn record(&self) -> Option<&'a CommitRecord> {
        match self {
            CommitLookup::Found(record) => Some(record),
            CommitLookup::Missing(_) => None,
        }
    }
}

/// Looks up every message of `template` in its repository. Returns `None`
/// when the repository is not in the registry at all.
pub fn resolve_commits<'a>(
    template: &'a PrTemplate,
    registry: &'a CommitRegistry,
) -> Option<Vec<CommitLookup<'a>>> {
    if !registry.contains_repo(&template.repo) {
        return None;
    }

    let lookups = template
        .commit_messages
        .iter()
        .map(|message| match registry.lookup(&template.repo, message) {
            Some(record) => CommitLookup::Found(record),
            None => CommitLookup::Missing(message.as_str()),
        })
        .collect();
    Some(lookups)
}

/// First-seen-order union of the files of every found commit.
pub fn aggregate_files(lookups: &[CommitLookup<'_>]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut files = Vec::new();
    for record in lookups.iter().filter_map(CommitLookup::record) {
        for path in &record.files_changed {
            if seen.insert(path.as_str()) {
                files.push(path.clone());
            }
        }
    }
    files
}

/// Resolves one template. `Ok(None)` means the template was dropped.
pub fn synthesize_one(
    template: &PrTemplate,
    registry: &CommitRegistry,
    strictness: Strictness,
) -> Result<Option<PrRecord>> {
    let Some(lookups) = resolve_commits(template, registry) else {
        if strictness == Strictness::Strict {
            return Err(unresolved(
                template,
                format!("repository '{}' was not built", template.repo),
            ));
        }
        debug!(
            "Dropping PR {}#{}: repository was not built",
            template.repo, template.pr_number
        );
        return Ok(None);
    };

    for lookup in &lookups {
        if let CommitLookup::Missing(message) = lookup {
            if strictness == Strictness::Strict {
                return Err(unresolved(
                template,
                format!("no commit with message '{}'", message),
            ));
            }
            debug!(
                "PR {}#{}: skipping unknown commit '{}'",
                template.repo, template.pr_number, message
            );
        }
    }

    Ok(Some(PrRecord {
        id: PrRecord::make_id(&template.repo, template.pr_number),
        source_type: SourceType::GitPr,
        repo: template.repo.clone(),
        repo_url: template.repo_url.clone(),
        branch: template.branch.clone(),
        pr_number: template.pr_number,
        author: template.author.clone(),
        timestamp: template.timestamp.clone(),
        title: template.title.clone(),
        body: template.body.clone(),
        merged: template.merged,
        files_changed: aggregate_files(&lookups),
        embedding_text: template.embedding_text.clone(),
        service_ids: template.service_ids.clone(),
        component_ids: template.component_ids.clone(),
        changed_apis: template.changed_apis.clone(),
        labels: template.labels.clone(),
    }))
}

/// Resolves all templates, in order.
pub fn synthesize(
    templates: &[PrTemplate],
    registry: &CommitRegistry,
    strictness: Strictness,
) -> Result<Vec<PrRecord>> {
    let mut records = Vec::with_capacity(templates.len());
    for template in templates {
        if let Some(record) = synthesize_one(template, registry, strictness)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn unresolved(template: &PrTemplate, reason: String) -> Error {
    Error::UnresolvedPullRequest {
        repo: template.repo.clone(),
        pr_number: template.pr_number,
        reason,
    }
}
