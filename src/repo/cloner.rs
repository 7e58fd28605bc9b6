//! Git clone support for local statistics runs.
//!
//! The scc provider needs a working tree on disk. This module clones the
//! target repository into a temporary directory and parses repository
//! references into their owner/name key.

use crate::models::RepositoryKey;
use anyhow::{Context, Result};
use git2::{FetchOptions, Progress, RemoteCallbacks};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// A cloned working tree.
///
/// Holding the value keeps the checkout alive; dropping it removes the
/// temporary directory.
pub struct CloneResult {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl CloneResult {
    /// Path to the working tree root.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Options for cloning a repository.
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Branch to checkout (None for the default branch).
    pub branch: Option<String>,
    /// Depth for shallow clone (None for a full clone).
    pub depth: Option<i32>,
    /// Whether to show transfer progress.
    pub show_progress: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            branch: None,
            depth: Some(1), // Shallow clone by default for speed
            show_progress: true,
        }
    }
}

/// Clone a repository into a temporary directory.
pub fn clone_repository(url: &str, options: CloneOptions) -> Result<CloneResult> {
    info!("Cloning repository: {}", url);

    let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
    let path = temp_dir.path().to_path_buf();
    debug!("Clone target: {}", path.display());

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(move |progress: Progress<'_>| {
        if let Some(ref pb) = pb_clone {
            pb.set_length(progress.total_objects() as u64);
            pb.set_position(progress.received_objects() as u64);
        }
        true
    });

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);
    if let Some(depth) = options.depth {
        fetch_opts.depth(depth);
    }

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);
    if let Some(ref branch) = options.branch {
        builder.branch(branch);
    }

    builder
        .clone(url, &path)
        .with_context(|| format!("Failed to clone repository: {}", url))?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Clone complete");
    }

    info!("Cloned {} to {}", url, path.display());

    Ok(CloneResult {
        path,
        _temp_dir: temp_dir,
    })
}

/// Parse a repository reference into its key.
///
/// Accepts `owner/name`, `https://github.com/owner/name[.git]`, and
/// `git@github.com:owner/name[.git]`.
pub fn parse_repo_ref(reference: &str) -> Option<RepositoryKey> {
    let reference = reference.trim().trim_end_matches(".git");

    if reference.contains("://")
        && !reference.starts_with("https://github.com/")
        && !reference.starts_with("http://github.com/")
    {
        return None;
    }

    let rest = reference
        .strip_prefix("https://github.com/")
        .or_else(|| reference.strip_prefix("http://github.com/"))
        .or_else(|| reference.strip_prefix("git@github.com:"))
        .unwrap_or(reference);

    let mut parts = rest.split('/');
    let owner = parts.next()?;
    let name = parts.next()?;
    if owner.is_empty() || name.is_empty() {
        return None;
    }

    Some(RepositoryKey::new(owner, name))
}

/// HTTPS clone URL for a repository key.
pub fn https_url(key: &RepositoryKey) -> String {
    format!("https://github.com/{}/{}.git", key.owner, key.name)
}
