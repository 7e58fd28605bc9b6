//! Typed errors for the metadata and statistics providers.

use thiserror::Error;

/// Errors produced at the provider seam.
///
/// The aggregator itself never fails; these describe why a provider could
/// not deliver its inputs. Metadata and statistics failures are independent,
/// and the caller decides whether a failure aborts the run or degrades the
/// result.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The repository does not exist or is not visible with the current token.
    #[error("repository not found: {0}")]
    NotFound(String),

    /// The API refused the request due to rate limiting.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The API answered with an unexpected status.
    #[error("API error: {0}")]
    Api(String),

    /// The HTTP request itself failed.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// A local tool invocation failed.
    #[error("tool error: {0}")]
    Tool(String),

    /// Provider output could not be parsed.
    #[error("malformed provider output: {0}")]
    Parse(String),
}
