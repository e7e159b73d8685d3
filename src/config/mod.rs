use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::github::{UnknownStatePolicy, DEFAULT_API_BASE};

/// Looked up in the working directory with any extension `config` understands.
pub const DEFAULT_CONFIG_FILE: &str = "repo-pulse";
pub const ENV_PREFIX: &str = "REPO_PULSE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub token: Option<String>,
    pub branch: String,
    pub authors_count: usize,
    pub pull_days: u32,
    pub issue_days: u32,
    pub timeout_secs: u64,
    pub unknown_state: UnknownStatePolicy,
    pub log_file: Option<PathBuf>,
    pub output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            token: None,
            branch: "master".to_string(),
            authors_count: 30,
            pull_days: 30,
            issue_days: 14,
            timeout_secs: 30,
            unknown_state: UnknownStatePolicy::Reject,
            log_file: None,
            output_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `repo-pulse.*` in the working directory, then the
    /// explicit file if one is given, then `REPO_PULSE_*` variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_classic_report() {
        let config = Config::default();
        assert_eq!(config.branch, "master");
        assert_eq!(config.authors_count, 30);
        assert_eq!(config.pull_days, 30);
        assert_eq!(config.issue_days, 14);
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.unknown_state, UnknownStatePolicy::Reject);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "branch = \"main\"\nauthors_count = 5\nunknown_state = \"skip\"\nlog_file = \"pulse.log\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.branch, "main");
        assert_eq!(config.authors_count, 5);
        assert_eq!(config.unknown_state, UnknownStatePolicy::Skip);
        assert_eq!(config.log_file, Some(PathBuf::from("pulse.log")));
        assert_eq!(config.pull_days, 30);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(err.is_err());
    }
}
