//! # Plan Command Implementation
//!
//! Prints the built-in plan as YAML. The output is a valid `--plan` file and
//! the usual starting point for a custom dataset.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use synth_git::catalog::ContentCatalog;
use synth_git::plan::Plan;

/// Print the built-in plan
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Write the plan to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the plan command
pub fn execute(args: PlanArgs) -> Result<()> {
    let yaml = Plan::builtin(&ContentCatalog::builtin())?.to_yaml()?;
    match args.output {
        Some(path) => std::fs::write(&path, yaml)
            .with_context(|| format!("Failed to write plan to {}", path.display()))?,
        None => print!("{}", yaml),
    }
    Ok(())
}
