//! # Configuration Schema and Parsing
//!
//! `synth-git` reads an optional YAML file (by default `config.yaml` in the
//! project root) that supplies fallback values for branch/remote resolution,
//! the base output directory and the push commit message.
//!
//! ```yaml
//! synthetic_git:
//!   branch: synthetic-data
//!   base_dir: data/synthetic_git
//!   remote_url: ${DATASET_REMOTE}
//! github:
//!   base_branch: main
//!   repo_owner: acme
//! ```
//!
//! Every section and field is optional. String values may reference
//! environment variables as `$VAR` or `${VAR}`; they are expanded against the
//! [`EnvMap`] passed in, and references to unset variables are left as they
//! are.

use crate::environment::EnvMap;
use crate::error::{Error, Result};
use log::debug;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Settings specific to the synthetic dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticGitConfig {
    /// Branch the dataset is pushed to.
    #[serde(default)]
    pub branch: Option<String>,
    /// Branch a new dataset branch is created from.
    #[serde(default)]
    pub base_branch: Option<String>,
    /// Remote name or URL to push to.
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub repo_owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    /// Credential used to synthesize an HTTPS remote.
    #[serde(default)]
    pub token: Option<String>,
    /// Output directory, relative to the project root unless absolute.
    #[serde(default)]
    pub base_dir: Option<String>,
    /// Prefix of the commit message used when pushing the dataset.
    #[serde(default)]
    pub commit_message: Option<String>,
    /// Fail instead of skipping unresolved PR references.
    #[serde(default)]
    pub strict_prs: bool,
}

/// Settings shared with other GitHub tooling in the host project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub base_branch: Option<String>,
    #[serde(default)]
    pub repo_owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
}

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub synthetic_git: SyntheticGitConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

/// Parses a YAML document into a [`Config`], expanding environment
/// references in string values.
pub fn parse(yaml_content: &str, env: &EnvMap) -> Result<Config> {
    // An empty or comment-only document deserializes as null.
    let raw: serde_yaml::Value = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })?;
    if raw.is_null() {
        return Ok(Config::default());
    }

    let expanded = expand_value(raw, env);
    serde_yaml::from_value(expanded).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: Some(
            "expected top-level 'synthetic_git' and 'github' mappings of string values".to_string(),
        ),
    })
}

/// Loads the configuration file at `path`. A missing file yields the
/// default configuration.
pub fn from_file<P: AsRef<Path>>(path: P, env: &EnvMap) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("No configuration at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content, env)
}

fn expand_value(value: serde_yaml::Value, env: &EnvMap) -> serde_yaml::Value {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Value::String(expand_env_vars(&s, env)),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(|v| expand_value(v, env)).collect())
        }
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, expand_value(v, env)))
                .collect(),
        ),
        other => other,
    }
}

/// Replaces `$VAR` and `${VAR}` with values from `env`. Unset variables are
/// kept verbatim.
pub fn expand_env_vars(input: &str, env: &EnvMap) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
            .expect("static pattern is valid")
    });

    pattern
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match env.get(name) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
