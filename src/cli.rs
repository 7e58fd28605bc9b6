//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::AnalysisMethod;
use clap::Parser;
use std::path::PathBuf;

/// Repostats - per-language line statistics for GitHub repos
///
/// Fetches repository metadata from the GitHub API and per-language line
/// counts from either a remote counting API or a local scc run, then emits
/// a combined JSON or Markdown report.
///
/// Examples:
///   repostats --repo rust-lang/rust
///   repostats --repo https://github.com/rust-lang/rust.git --method countloc-api
///   repostats --repo rust-lang/rust --local ./rust --format markdown
///   repostats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// GitHub repository to analyze
    ///
    /// Accepts `owner/name`, an HTTPS URL, or an SSH URL.
    /// Not required when using --init-config.
    #[arg(short, long, value_name = "REPO", required_unless_present = "init_config")]
    pub repo: Option<String>,

    /// Statistics provider to use
    #[arg(short, long, default_value = "scc-local", value_name = "METHOD")]
    pub method: MethodArg,

    /// Output format (json, markdown)
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// GitHub API token for authenticated requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL
    #[arg(long, value_name = "URL")]
    pub github_api: Option<String>,

    /// Counting API endpoint for --method countloc-api
    #[arg(long, value_name = "URL")]
    pub countloc_api: Option<String>,

    /// Path to the scc binary for --method scc-local
    #[arg(long, value_name = "PATH")]
    pub scc_bin: Option<String>,

    /// Local checkout to analyze instead of cloning (scc-local only)
    #[arg(long, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Specific branch to analyze
    ///
    /// If not specified, uses the default branch
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Directories to exclude from local analysis (comma-separated)
    ///
    /// Example: --exclude "vendor,third_party"
    #[arg(long, value_name = "DIRS", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .repostats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fail with exit code 2 when the result is degraded
    ///
    /// Useful for CI pipelines that must not consume partial statistics.
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .repostats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Statistics provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MethodArg {
    /// Remote counting API
    CountlocApi,
    /// Local scc invocation (default)
    #[default]
    SccLocal,
}

impl From<MethodArg> for AnalysisMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::CountlocApi => AnalysisMethod::CountlocApi,
            MethodArg::SccLocal => AnalysisMethod::SccLocal,
        }
    }
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON format (default)
    #[default]
    Json,
    /// Markdown format
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the repository reference (empty if not set; validated first).
    pub fn repo_ref(&self) -> &str {
        self.repo.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let repo = self.repo_ref();
        if !repo.contains('/') && !repo.starts_with("git@") {
            return Err(format!(
                "Repository must be owner/name or a GitHub URL, got '{}'",
                repo
            ));
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref local_path) = self.local {
            if self.method == MethodArg::CountlocApi {
                return Err("--local requires --method scc-local".to_string());
            }
            if self.branch.is_some() {
                return Err("--branch cannot be combined with --local".to_string());
            }
            if !local_path.exists() {
                return Err(format!(
                    "Local directory does not exist: {}",
                    local_path.display()
                ));
            }
            if !local_path.is_dir() {
                return Err(format!(
                    "Local path is not a directory: {}",
                    local_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
