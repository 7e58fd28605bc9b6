//! Remote counting API provider.
//!
//! Queries a countloc-style HTTP API that counts lines for a public GitHub
//! repository server-side. The API returns records already grouped per
//! language, with an explicit file count and no complexity or byte sizes.

use crate::error::ProviderError;
use crate::models::{RawStats, RepositoryKey};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One per-language entry in the API response.
#[derive(Debug, Deserialize)]
struct CountlocEntry {
    language: String,
    files: u64,
    lines: u64,
    blanks: u64,
    comments: u64,
    #[serde(rename = "linesOfCode")]
    lines_of_code: u64,
}

/// Client for a countloc-style line counting API.
pub struct CountlocClient {
    client: reqwest::Client,
    api_url: String,
}

impl CountlocClient {
    /// Creates a client against the given endpoint.
    pub fn new(api_url: &str, timeout_seconds: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    /// Fetch per-language statistics for a repository.
    pub async fn fetch_stats(&self, key: &RepositoryKey) -> Result<Vec<RawStats>, ProviderError> {
        debug!("Requesting counts for {} from {}", key, self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("github", key.full_name())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(key.full_name()));
        }
        if !status.is_success() {
            return Err(ProviderError::Api(format!(
                "counting API returned {} for {}",
                status,
                key.full_name()
            )));
        }

        let entries: Vec<CountlocEntry> = response.json().await?;
        Ok(entries_to_raw(entries))
    }
}

/// Convert API entries into raw records, dropping the synthetic `Total` row.
fn entries_to_raw(entries: Vec<CountlocEntry>) -> Vec<RawStats> {
    entries
        .into_iter()
        .filter(|entry| entry.language != "Total")
        .map(|entry| RawStats {
            language: entry.language,
            lines: entry.lines,
            code: entry.lines_of_code,
            comments: entry.comments,
            blanks: entry.blanks,
            // The API reports neither complexity nor byte sizes.
            complexity: 0,
            bytes: 0,
            files: entry.files,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"language": "Go", "files": 14, "lines": 1574, "blanks": 60, "comments": 111, "linesOfCode": 1403},
        {"language": "Makefile", "files": 1, "lines": 22, "blanks": 5, "comments": 0, "linesOfCode": 17},
        {"language": "Total", "files": 15, "lines": 1596, "blanks": 65, "comments": 111, "linesOfCode": 1420}
    ]"#;

    #[test]
    fn test_entries_to_raw_drops_total_row() {
        let entries: Vec<CountlocEntry> = serde_json::from_str(SAMPLE).unwrap();
        let records = entries_to_raw(entries);

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.language != "Total"));
    }

    #[test]
    fn test_entries_to_raw_field_mapping() {
        let entries: Vec<CountlocEntry> = serde_json::from_str(SAMPLE).unwrap();
        let records = entries_to_raw(entries);

        let go = &records[0];
        assert_eq!(go.language, "Go");
        assert_eq!(go.files, 14);
        assert_eq!(go.lines, 1574);
        assert_eq!(go.code, 1403);
        assert_eq!(go.comments, 111);
        assert_eq!(go.blanks, 60);
        assert_eq!(go.complexity, 0);
        assert_eq!(go.bytes, 0);
    }

    #[test]
    fn test_empty_response() {
        let entries: Vec<CountlocEntry> = serde_json::from_str("[]").unwrap();
        assert!(entries_to_raw(entries).is_empty());
    }
}
