//! Repository checkout support.

pub mod cloner;

pub use cloner::{clone_repository, https_url, parse_repo_ref, CloneOptions, CloneResult};
