//! GitHub metadata provider.

pub mod client;

pub use client::GithubClient;
