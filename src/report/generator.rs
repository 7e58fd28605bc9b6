//! Report rendering for analysis results.
//!
//! Serializes a result envelope to pretty JSON or renders it as a
//! human-readable Markdown document.

use crate::models::{LanguageStats, Repository, RepositoryResult};
use anyhow::{Context, Result};
use chrono::Utc;

/// Serialize a result to pretty-printed JSON.
pub fn generate_json_report(result: &RepositoryResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize result to JSON")
}

/// Render a result as a Markdown document.
pub fn generate_markdown_report(result: &RepositoryResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Repository Statistics: {}\n\n", result.repository));
    output.push_str(&generate_metadata_section(&result.metadata));

    if let Some(ref error) = result.error {
        output.push_str(&generate_error_section(error));
    }

    output.push_str(&generate_languages_section(
        &result.languages,
        result.total_lines,
        result.total_files,
    ));
    output.push_str(&generate_footer(result));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &Repository) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if !metadata.description.is_empty() {
        section.push_str(&format!("- **Description:** {}\n", metadata.description));
    }
    if !metadata.language.is_empty() {
        section.push_str(&format!("- **Primary Language:** {}\n", metadata.language));
    }
    section.push_str(&format!(
        "- **Stars:** {} | **Forks:** {} | **Watchers:** {}\n",
        metadata.n_stars, metadata.n_forks, metadata.n_watchers
    ));
    section.push_str(&format!("- **Commits:** {}\n", metadata.n_commits));
    section.push_str(&format!("- **Size:** {} KB\n", metadata.size));
    if !metadata.created_at.is_empty() {
        section.push_str(&format!("- **Created:** {}\n", metadata.created_at));
    }
    if !metadata.tags.is_empty() {
        section.push_str(&format!("- **Topics:** {}\n", metadata.tags.join(", ")));
    }
    section.push('\n');

    section
}

/// Generate the warning block for a degraded result.
fn generate_error_section(error: &str) -> String {
    format!("> ⚠️ **Partial result:** {}\n\n", error)
}

/// Generate the per-language table with a totals row.
fn generate_languages_section(
    languages: &[LanguageStats],
    total_lines: u64,
    total_files: u64,
) -> String {
    let mut section = String::new();

    section.push_str("## Languages\n\n");

    if languages.is_empty() {
        section.push_str("_No language statistics available._\n\n");
        return section;
    }

    section.push_str(
        "| Language | Files | Lines | Code | Comments | Blanks | Complexity | Bytes |\n",
    );
    section.push_str("|:---|---:|---:|---:|---:|---:|---:|---:|\n");

    for lang in languages {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            lang.name,
            lang.files,
            lang.lines,
            lang.code,
            lang.comments,
            lang.blanks,
            lang.complexity,
            lang.bytes
        ));
    }

    let code: u64 = languages.iter().map(|l| l.code).sum();
    let comments: u64 = languages.iter().map(|l| l.comments).sum();
    let blanks: u64 = languages.iter().map(|l| l.blanks).sum();
    let complexity: u64 = languages.iter().map(|l| l.complexity).sum();
    let bytes: u64 = languages.iter().map(|l| l.bytes).sum();

    section.push_str(&format!(
        "| **Total** | **{}** | **{}** | **{}** | **{}** | **{}** | **{}** | **{}** |\n\n",
        total_files, total_lines, code, comments, blanks, complexity, bytes
    ));

    section
}

/// Generate the report footer.
fn generate_footer(result: &RepositoryResult) -> String {
    format!(
        "---\n\n*Generated by repostats v{} on {} via `{}`*\n",
        env!("CARGO_PKG_VERSION"),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        result.analysis_method
    )
}
