//! # Dataset Export
//!
//! Writes the two JSON artifacts that sit next to the generated repositories:
//!
//! - `git_events.json`: every [`CommitRecord`] in plan/commit order;
//! - `git_prs.json`: every [`PrRecord`] in template order.
//!
//! Both are pretty-printed with two-space indentation and end with a newline,
//! so regenerating an unchanged plan yields byte-identical files.

use crate::error::Result;
use crate::records::{CommitRecord, PrRecord};
use crate::registry::CommitRegistry;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const EVENTS_FILE: &str = "git_events.json";
pub const PRS_FILE: &str = "git_prs.json";

/// Serializes `records` as a pretty JSON array with a trailing newline.
pub fn to_json<T: Serialize>(records: &[T]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    fs::write(path, to_json(records)?)?;
    Ok(())
}

/// Writes all commit records of `registry` to `<base_dir>/git_events.json`.
pub fn export_commits(base_dir: &Path, registry: &CommitRegistry) -> Result<PathBuf> {
    let path = base_dir.join(EVENTS_FILE);
    write_json::<CommitRecord>(&path, registry.records())?;
    Ok(path)
}

/// Writes `records` to `<base_dir>/git_prs.json`.
pub fn export_prs(base_dir: &Path, records: &[PrRecord]) -> Result<PathBuf> {
    let path = base_dir.join(PRS_FILE);
    write_json(&path, records)?;
    Ok(path)
}

/// Reads a previously exported artifact back.
pub fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
