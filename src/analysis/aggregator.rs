//! Language statistics aggregation.
//!
//! This module turns raw provider records into the per-language result
//! envelope. It is a pure computation: no I/O, no shared state.

use crate::models::{
    AnalysisMethod, LanguageStats, RawStats, Repository, RepositoryKey, RepositoryResult,
    UNKNOWN_LANGUAGE,
};
use std::collections::BTreeMap;

/// Aggregate raw statistics records into a [`RepositoryResult`].
///
/// Records are grouped by exact (case-sensitive) language name; records with
/// an empty language name land in the "Unknown" bucket rather than being
/// dropped. Numeric fields are summed per group, and the resulting languages
/// are sorted by line count descending with name ascending as the tie-break.
/// Empty input is valid and yields an empty, non-degraded result.
pub fn aggregate(
    key: &RepositoryKey,
    metadata: Repository,
    raw_stats: &[RawStats],
    method: AnalysisMethod,
) -> RepositoryResult {
    let mut groups: BTreeMap<&str, LanguageStats> = BTreeMap::new();

    for record in raw_stats {
        let name = if record.language.is_empty() {
            UNKNOWN_LANGUAGE
        } else {
            record.language.as_str()
        };

        let entry = groups
            .entry(name)
            .or_insert_with(|| LanguageStats::empty(name));
        entry.lines += record.lines;
        entry.code += record.code;
        entry.comments += record.comments;
        entry.blanks += record.blanks;
        entry.complexity += record.complexity;
        entry.bytes += record.bytes;
        entry.files += record.files;
    }

    let mut languages: Vec<LanguageStats> = groups.into_values().collect();
    languages.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.name.cmp(&b.name)));

    let total_lines = languages.iter().map(|l| l.lines).sum();
    let total_files = languages.iter().map(|l| l.files).sum();

    RepositoryResult {
        repository: key.full_name(),
        metadata,
        languages,
        total_lines,
        total_files,
        analysis_method: method,
        error: None,
    }
}

/// Build a degraded result for a run whose statistics are unavailable.
///
/// The envelope is fully formed (metadata present, empty languages, zero
/// totals) with `error` describing the missing piece.
pub fn degraded(
    key: &RepositoryKey,
    metadata: Repository,
    method: AnalysisMethod,
    error: impl Into<String>,
) -> RepositoryResult {
    RepositoryResult {
        repository: key.full_name(),
        metadata,
        languages: Vec::new(),
        total_lines: 0,
        total_files: 0,
        analysis_method: method,
        error: Some(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> RepositoryKey {
        RepositoryKey::new("octocat", "hello-world")
    }

    fn test_metadata() -> Repository {
        Repository {
            owner: "octocat".to_string(),
            name: "hello-world".to_string(),
            id: 1296269,
            description: "My first repo".to_string(),
            language: "Go".to_string(),
            n_stars: 80,
            n_forks: 9,
            n_watchers: 80,
            n_commits: 12,
            size: 108,
            created_at: "2011-01-26T19:01:12Z".to_string(),
            tags: vec!["example".to_string()],
        }
    }

    #[test]
    fn test_two_languages_with_merging() {
        let raw = vec![
            RawStats::per_file("Go", 100, 80, 10, 10, 5, 2000),
            RawStats::per_file("Go", 50, 40, 5, 5, 2, 900),
            RawStats::per_file("Rust", 100, 90, 5, 5, 8, 2500),
        ];

        let result = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::SccLocal);

        assert_eq!(result.repository, "octocat/hello-world");
        assert_eq!(result.languages.len(), 2);

        let go = &result.languages[0];
        assert_eq!(go.name, "Go");
        assert_eq!(go.lines, 150);
        assert_eq!(go.code, 120);
        assert_eq!(go.comments, 15);
        assert_eq!(go.blanks, 15);
        assert_eq!(go.complexity, 7);
        assert_eq!(go.bytes, 2900);
        assert_eq!(go.files, 2);

        let rust = &result.languages[1];
        assert_eq!(rust.name, "Rust");
        assert_eq!(rust.lines, 100);
        assert_eq!(rust.files, 1);

        assert_eq!(result.total_lines, 250);
        assert_eq!(result.total_files, 3);
        assert_eq!(result.analysis_method, AnalysisMethod::SccLocal);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let result = aggregate(&test_key(), test_metadata(), &[], AnalysisMethod::CountlocApi);

        assert!(result.languages.is_empty());
        assert_eq!(result.total_lines, 0);
        assert_eq!(result.total_files, 0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_sort_by_lines_desc_then_name_asc() {
        let raw = vec![
            RawStats::per_file("Rust", 100, 90, 5, 5, 1, 100),
            RawStats::per_file("Go", 100, 90, 5, 5, 1, 100),
            RawStats::per_file("Python", 200, 180, 10, 10, 1, 100),
        ];

        let result = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::SccLocal);

        let names: Vec<&str> = result.languages.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Go", "Rust"]);
    }

    #[test]
    fn test_grouping_is_case_sensitive() {
        let raw = vec![
            RawStats::per_file("go", 10, 8, 1, 1, 0, 100),
            RawStats::per_file("Go", 10, 8, 1, 1, 0, 100),
        ];

        let result = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::SccLocal);
        assert_eq!(result.languages.len(), 2);
    }

    #[test]
    fn test_empty_language_goes_to_unknown_bucket() {
        let raw = vec![
            RawStats::per_file("", 10, 8, 1, 1, 0, 100),
            RawStats::per_file("", 20, 16, 2, 2, 0, 200),
        ];

        let result = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::SccLocal);

        assert_eq!(result.languages.len(), 1);
        assert_eq!(result.languages[0].name, UNKNOWN_LANGUAGE);
        assert_eq!(result.languages[0].lines, 30);
        assert_eq!(result.languages[0].files, 2);
        assert_eq!(result.total_files, 2);
    }

    #[test]
    fn test_totals_match_language_sums() {
        let raw = vec![
            RawStats::per_file("C", 7, 5, 1, 1, 2, 70),
            RawStats::per_file("C", 13, 9, 2, 2, 1, 130),
            RawStats::per_file("Zig", 5, 5, 0, 0, 0, 50),
        ];

        let result = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::SccLocal);

        let lines: u64 = result.languages.iter().map(|l| l.lines).sum();
        let files: u64 = result.languages.iter().map(|l| l.files).sum();
        assert_eq!(result.total_lines, lines);
        assert_eq!(result.total_files, files);
        assert_eq!(result.total_lines, 25);
        assert_eq!(result.total_files, 3);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let raw = vec![
            RawStats::per_file("Go", 100, 80, 10, 10, 5, 2000),
            RawStats::per_file("Rust", 100, 90, 5, 5, 8, 2500),
        ];

        let first = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::CountlocApi);
        let second = aggregate(&test_key(), test_metadata(), &raw, AnalysisMethod::CountlocApi);
        assert_eq!(first, second);
    }

    #[test]
    fn test_degraded_result() {
        let result = degraded(
            &test_key(),
            test_metadata(),
            AnalysisMethod::CountlocApi,
            "statistics unavailable: request timed out",
        );

        assert!(result.is_degraded());
        assert!(result.languages.is_empty());
        assert_eq!(result.total_lines, 0);
        assert_eq!(result.total_files, 0);
        assert_eq!(
            result.error.as_deref(),
            Some("statistics unavailable: request timed out")
        );
    }
}
