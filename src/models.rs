//! Data models for repository statistics.
//!
//! This module contains the core data structures shared by the metadata
//! provider, the statistics providers, and the aggregator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved bucket name for records without a recognizable language.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Identity of a repository within its hosting namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryKey {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepositoryKey {
    /// Creates a new repository key.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the canonical `owner/name` form.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Hosting metadata for a repository.
///
/// Fetched once per analysis run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Numeric identifier assigned by the hosting system.
    pub id: u64,
    /// Repository description (may be empty).
    pub description: String,
    /// Primary language as reported by the host (may be empty).
    pub language: String,
    /// Star count.
    pub n_stars: u64,
    /// Fork count.
    pub n_forks: u64,
    /// Watcher count.
    pub n_watchers: u64,
    /// Commit count on the default branch.
    pub n_commits: u64,
    /// Repository size in the host's storage units (KB for GitHub).
    pub size: u64,
    /// Creation timestamp as supplied by the host (ISO-8601 expected).
    pub created_at: String,
    /// Topic tags, in the order supplied by the host.
    pub tags: Vec<String>,
}

impl Repository {
    /// Returns the `owner/name` form.
    #[allow(dead_code)] // Utility accessor (the result envelope carries the display string)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// One raw statistics record as produced by a statistics provider.
///
/// Per-file records carry `files == 1`; pre-grouped provider output
/// carries the explicit group file count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStats {
    /// Language name as reported by the provider (may be empty).
    pub language: String,
    /// Total line count.
    pub lines: u64,
    /// Lines of code.
    pub code: u64,
    /// Comment lines.
    pub comments: u64,
    /// Blank lines.
    pub blanks: u64,
    /// Complexity score (units defined by the provider).
    pub complexity: u64,
    /// Size in bytes.
    pub bytes: u64,
    /// File count covered by this record.
    pub files: u64,
}

impl RawStats {
    /// Creates a record describing a single file.
    pub fn per_file(
        language: impl Into<String>,
        lines: u64,
        code: u64,
        comments: u64,
        blanks: u64,
        complexity: u64,
        bytes: u64,
    ) -> Self {
        Self {
            language: language.into(),
            lines,
            code,
            comments,
            blanks,
            complexity,
            bytes,
            files: 1,
        }
    }
}

/// Aggregated statistics for one language within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Language name.
    pub name: String,
    /// Total line count.
    pub lines: u64,
    /// Lines of code.
    pub code: u64,
    /// Comment lines.
    pub comments: u64,
    /// Blank lines.
    pub blanks: u64,
    /// Summed complexity score.
    pub complexity: u64,
    /// Size in bytes.
    pub bytes: u64,
    /// Number of files.
    pub files: u64,
}

impl LanguageStats {
    /// Creates an all-zero entry for the given language.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: 0,
            code: 0,
            comments: 0,
            blanks: 0,
            complexity: 0,
            bytes: 0,
            files: 0,
        }
    }
}

/// Which upstream mechanism produced the raw statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    /// Stats came from a remote counting API call.
    CountlocApi,
    /// Stats were computed by a local `scc` invocation.
    SccLocal,
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMethod::CountlocApi => write!(f, "countloc_api"),
            AnalysisMethod::SccLocal => write!(f, "scc_local"),
        }
    }
}

/// The complete analysis result for one repository.
///
/// A result carrying `error` is degraded but still fully formed: consumers
/// must check `error` before trusting `languages` and the totals as complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryResult {
    /// Display name, `owner/name`.
    pub repository: String,
    /// Hosting metadata.
    pub metadata: Repository,
    /// Per-language statistics, highest line count first.
    pub languages: Vec<LanguageStats>,
    /// Sum of `lines` across all languages.
    pub total_lines: u64,
    /// Sum of `files` across all languages.
    pub total_files: u64,
    /// Which provider produced the raw statistics.
    pub analysis_method: AnalysisMethod,
    /// Description of the missing piece when the result is partial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepositoryResult {
    /// Whether this result is partial.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
