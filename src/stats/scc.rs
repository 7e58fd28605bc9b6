//! Local `scc` tool provider.
//!
//! Runs the `scc` binary against a working tree and parses its JSON output
//! into raw per-file records. With `--by-file`, each language group carries
//! the individual file entries; groups without per-file detail fall back to
//! one pre-grouped record.

use crate::error::ProviderError;
use crate::models::RawStats;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// One language group in scc's JSON output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SccLanguage {
    name: String,
    bytes: u64,
    lines: u64,
    code: u64,
    comment: u64,
    blank: u64,
    complexity: u64,
    count: u64,
    #[serde(default)]
    files: Vec<SccFile>,
}

/// One file entry within a language group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SccFile {
    #[serde(default)]
    language: String,
    bytes: u64,
    lines: u64,
    code: u64,
    comment: u64,
    blank: u64,
    complexity: u64,
}

/// Runs `scc` against a local working tree.
pub struct SccRunner {
    binary: String,
    excludes: Vec<String>,
}

impl SccRunner {
    /// Creates a runner for the given binary and exclude directories.
    pub fn new(binary: impl Into<String>, excludes: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            excludes,
        }
    }

    /// Run scc on `repo_path` and return per-file records.
    pub async fn run(&self, repo_path: &Path) -> Result<Vec<RawStats>, ProviderError> {
        info!("Running {} on {}", self.binary, repo_path.display());

        let mut command = Command::new(&self.binary);
        command.arg("--format").arg("json").arg("--by-file");
        for dir in &self.excludes {
            command.arg("--exclude-dir").arg(dir);
        }
        command.arg(repo_path);

        let output = command.output().await.map_err(|e| {
            ProviderError::Tool(format!("failed to launch {}: {}", self.binary, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Tool(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        debug!("scc produced {} bytes of output", output.stdout.len());
        parse_scc_output(&output.stdout)
    }
}

/// Parse scc JSON into raw records, flattening per-file entries.
fn parse_scc_output(stdout: &[u8]) -> Result<Vec<RawStats>, ProviderError> {
    let groups: Vec<SccLanguage> = serde_json::from_slice(stdout)
        .map_err(|e| ProviderError::Parse(format!("scc JSON: {}", e)))?;

    let mut records = Vec::new();
    for group in groups {
        if group.files.is_empty() {
            // Summary-only output: keep the group as one pre-grouped record.
            records.push(RawStats {
                language: group.name,
                lines: group.lines,
                code: group.code,
                comments: group.comment,
                blanks: group.blank,
                complexity: group.complexity,
                bytes: group.bytes,
                files: group.count,
            });
        } else {
            for file in group.files {
                let language = if file.language.is_empty() {
                    group.name.clone()
                } else {
                    file.language
                };
                records.push(RawStats::per_file(
                    language,
                    file.lines,
                    file.code,
                    file.comment,
                    file.blank,
                    file.complexity,
                    file.bytes,
                ));
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BY_FILE: &str = r#"[
        {
            "Name": "Go",
            "Bytes": 2900,
            "Lines": 150,
            "Code": 120,
            "Comment": 15,
            "Blank": 15,
            "Complexity": 7,
            "Count": 2,
            "Files": [
                {"Language": "Go", "Filename": "main.go", "Bytes": 2000, "Lines": 100, "Code": 80, "Comment": 10, "Blank": 10, "Complexity": 5},
                {"Language": "Go", "Filename": "util.go", "Bytes": 900, "Lines": 50, "Code": 40, "Comment": 5, "Blank": 5, "Complexity": 2}
            ]
        },
        {
            "Name": "Rust",
            "Bytes": 2500,
            "Lines": 100,
            "Code": 90,
            "Comment": 5,
            "Blank": 5,
            "Complexity": 8,
            "Count": 1,
            "Files": [
                {"Language": "Rust", "Filename": "lib.rs", "Bytes": 2500, "Lines": 100, "Code": 90, "Comment": 5, "Blank": 5, "Complexity": 8}
            ]
        }
    ]"#;

    const SUMMARY_ONLY: &str = r#"[
        {"Name": "Python", "Bytes": 500, "Lines": 40, "Code": 30, "Comment": 5, "Blank": 5, "Complexity": 2, "Count": 3}
    ]"#;

    #[test]
    fn test_parse_by_file_output() {
        let records = parse_scc_output(BY_FILE.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.files == 1));

        let first = &records[0];
        assert_eq!(first.language, "Go");
        assert_eq!(first.lines, 100);
        assert_eq!(first.complexity, 5);
        assert_eq!(first.bytes, 2000);
    }

    #[test]
    fn test_parse_summary_only_output() {
        let records = parse_scc_output(SUMMARY_ONLY.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let python = &records[0];
        assert_eq!(python.language, "Python");
        assert_eq!(python.files, 3);
        assert_eq!(python.lines, 40);
    }

    #[test]
    fn test_parse_file_without_language_inherits_group() {
        let json = r#"[
            {"Name": "Go", "Bytes": 10, "Lines": 1, "Code": 1, "Comment": 0, "Blank": 0, "Complexity": 0, "Count": 1,
             "Files": [{"Bytes": 10, "Lines": 1, "Code": 1, "Comment": 0, "Blank": 0, "Complexity": 0}]}
        ]"#;

        let records = parse_scc_output(json.as_bytes()).unwrap();
        assert_eq!(records[0].language, "Go");
    }

    #[test]
    fn test_parse_rejects_malformed_output() {
        let err = parse_scc_output(b"not json").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_parse_empty_tree() {
        let records = parse_scc_output(b"[]").unwrap();
        assert!(records.is_empty());
    }
}
