//! GitHub REST API metadata client.
//!
//! Fetches hosting metadata for a repository and maps it onto the
//! [`Repository`] model. Commit counting uses the pagination trick: request
//! one commit per page and read the last page number from the `Link` header.

use crate::error::ProviderError;
use crate::models::{Repository, RepositoryKey};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// GitHub `GET /repos/{owner}/{name}` payload, reduced to what we map.
#[derive(Debug, Deserialize)]
struct GithubRepoResponse {
    id: u64,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    /// Mirrors the star count on GitHub.
    watchers_count: u64,
    /// The actual watcher count; absent from some list endpoints.
    subscribers_count: Option<u64>,
    size: u64,
    created_at: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
}

/// Client for the GitHub REST API.
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Creates a client against the given API base URL.
    ///
    /// `token` enables authenticated requests (higher rate limits, private
    /// repositories the token can see).
    pub fn new(
        api_url: &str,
        token: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Fetch hosting metadata for a repository.
    pub async fn fetch_repository(&self, key: &RepositoryKey) -> Result<Repository, ProviderError> {
        let url = format!("{}/repos/{}/{}", self.api_url, key.owner, key.name);
        debug!("Fetching repository metadata from {}", url);

        let response = self.client.get(&url).headers(self.headers()).send().await?;
        let response = check_status(response, key)?;
        let payload: GithubRepoResponse = response.json().await?;

        // Advisory field: a failed count degrades to 0 instead of failing
        // the whole metadata fetch.
        let n_commits = match self.count_commits(key).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Failed to count commits for {}: {}", key, e);
                0
            }
        };

        Ok(map_repository(key, payload, n_commits))
    }

    /// Count commits on the default branch via the `Link` header.
    async fn count_commits(&self, key: &RepositoryKey) -> Result<u64, ProviderError> {
        let url = format!("{}/repos/{}/{}/commits", self.api_url, key.owner, key.name);

        let response = self
            .client
            .get(&url)
            .query(&[("per_page", "1")])
            .headers(self.headers())
            .send()
            .await?;
        let response = check_status(response, key)?;

        if let Some(link) = response.headers().get(LINK).and_then(|v| v.to_str().ok()) {
            if let Some(last_page) = parse_last_page(link) {
                return Ok(last_page);
            }
        }

        // No Link header: the single page holds every commit (0 or 1).
        let commits: Vec<serde_json::Value> = response.json().await?;
        Ok(commits.len() as u64)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repostats/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref token) = self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }
}

/// Map a GitHub payload onto the repository model.
fn map_repository(key: &RepositoryKey, payload: GithubRepoResponse, n_commits: u64) -> Repository {
    Repository {
        owner: key.owner.clone(),
        name: key.name.clone(),
        id: payload.id,
        description: payload.description.unwrap_or_default(),
        language: payload.language.unwrap_or_default(),
        n_stars: payload.stargazers_count,
        n_forks: payload.forks_count,
        // watchers_count mirrors stars; subscribers_count is the real count.
        n_watchers: payload.subscribers_count.unwrap_or(payload.watchers_count),
        n_commits,
        size: payload.size,
        created_at: payload.created_at.unwrap_or_default(),
        tags: payload.topics,
    }
}

/// Convert a non-success response into a typed provider error.
fn check_status(
    response: reqwest::Response,
    key: &RepositoryKey,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound(key.full_name()));
    }

    let rate_limited = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0");
    if status == StatusCode::FORBIDDEN && rate_limited {
        return Err(ProviderError::RateLimited(key.full_name()));
    }

    Err(ProviderError::Api(format!(
        "{} returned {}",
        key.full_name(),
        status
    )))
}

/// Extract the `rel="last"` page number from a `Link` header value.
fn parse_last_page(link: &str) -> Option<u64> {
    link.split(',').find_map(|part| {
        let (target, rel) = part.split_once(';')?;
        if !rel.contains("rel=\"last\"") {
            return None;
        }

        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        target
            .split(['?', '&'])
            .find_map(|param| param.strip_prefix("page="))
            .and_then(|page| page.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_page() {
        let link = "<https://api.github.com/repositories/1296269/commits?per_page=1&page=2>; \
                    rel=\"next\", \
                    <https://api.github.com/repositories/1296269/commits?per_page=1&page=12>; \
                    rel=\"last\"";
        assert_eq!(parse_last_page(link), Some(12));
    }

    #[test]
    fn test_parse_last_page_missing_rel() {
        let link = "<https://api.github.com/repositories/1/commits?page=2>; rel=\"next\"";
        assert_eq!(parse_last_page(link), None);
    }

    #[test]
    fn test_parse_last_page_garbage() {
        assert_eq!(parse_last_page(""), None);
        assert_eq!(parse_last_page("not a link header"), None);
    }

    #[test]
    fn test_deserialize_repo_payload() {
        let json = r#"{
            "id": 1296269,
            "description": "My first repo",
            "language": "Go",
            "stargazers_count": 80,
            "forks_count": 9,
            "watchers_count": 80,
            "subscribers_count": 10,
            "size": 108,
            "created_at": "2011-01-26T19:01:12Z",
            "topics": ["example", "demo"]
        }"#;

        let payload: GithubRepoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.id, 1296269);
        assert_eq!(payload.topics, vec!["example", "demo"]);
    }

    #[test]
    fn test_map_repository_defaults() {
        let json = r#"{
            "id": 42,
            "description": null,
            "language": null,
            "stargazers_count": 1,
            "forks_count": 0,
            "watchers_count": 1,
            "size": 7,
            "created_at": null
        }"#;

        let payload: GithubRepoResponse = serde_json::from_str(json).unwrap();
        let key = RepositoryKey::new("octocat", "hello-world");
        let repo = map_repository(&key, payload, 3);

        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.name, "hello-world");
        assert_eq!(repo.description, "");
        assert_eq!(repo.language, "");
        // No subscribers_count: fall back to watchers_count.
        assert_eq!(repo.n_watchers, 1);
        assert_eq!(repo.n_commits, 3);
        assert!(repo.tags.is_empty());
    }
}
