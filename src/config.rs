//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.repostats.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Counting API settings.
    #[serde(default)]
    pub countloc: CountlocConfig,

    /// Local scc settings.
    #[serde(default)]
    pub scc: SccConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default report path (stdout when unset).
    #[serde(default)]
    pub output: Option<String>,

    /// Fail with exit code 2 on degraded results.
    #[serde(default)]
    pub strict: bool,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API base URL.
    #[serde(default = "default_github_api")]
    pub api_url: String,

    /// API token; the GITHUB_TOKEN environment variable takes precedence.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_github_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api(),
            token: None,
            timeout_seconds: default_github_timeout(),
        }
    }
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_github_timeout() -> u64 {
    30
}

/// Remote counting API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountlocConfig {
    /// Endpoint queried with `?github=owner/name`.
    #[serde(default = "default_countloc_api")]
    pub api_url: String,

    /// Request timeout in seconds; counting a large repo takes a while.
    #[serde(default = "default_countloc_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CountlocConfig {
    fn default() -> Self {
        Self {
            api_url: default_countloc_api(),
            timeout_seconds: default_countloc_timeout(),
        }
    }
}

fn default_countloc_api() -> String {
    "https://api.codetabs.com/v1/loc".to_string()
}

fn default_countloc_timeout() -> u64 {
    120
}

/// Local scc invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SccConfig {
    /// Name or path of the scc binary.
    #[serde(default = "default_scc_binary")]
    pub binary: String,

    /// Directories passed to scc as --exclude-dir.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
}

impl Default for SccConfig {
    fn default() -> Self {
        Self {
            binary: default_scc_binary(),
            excludes: default_excludes(),
        }
    }
}

fn default_scc_binary() -> String {
    "scc".to_string()
}

fn default_excludes() -> Vec<String> {
    vec![
        ".git",
        "node_modules",
        "vendor",
        "target",
        "dist",
        "build",
        "__pycache__",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".repostats.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence; config fields only survive where the
    /// CLI left the corresponding option unset.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.github_api {
            self.github.api_url = url.clone();
        }
        if let Some(ref token) = args.token {
            self.github.token = Some(token.clone());
        }
        if let Some(timeout) = args.timeout {
            self.github.timeout_seconds = timeout;
            self.countloc.timeout_seconds = timeout;
        }
        if let Some(ref url) = args.countloc_api {
            self.countloc.api_url = url.clone();
        }
        if let Some(ref binary) = args.scc_bin {
            self.scc.binary = binary.clone();
        }
        if let Some(ref excludes) = args.exclude {
            self.scc.excludes = excludes.clone();
        }
        if args.strict {
            self.general.strict = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
