// file: src/github/client.rs
// description: GitHub REST API client for release listings and asset downloads
// reference: https://docs.github.com/en/rest/releases/releases

use crate::config::RepositorySource;
use crate::error::{MirrorError, Result};
use crate::mirror::{AssetFetch, ByteStream, FetchFactory};
use crate::models::{Release, ReleaseAsset};
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use reqwest::header;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
// Some upstream hosts rate-limit or reject unidentified clients.
const USER_AGENT: &str = concat!("release-mirror/", env!("CARGO_PKG_VERSION"));

/// How to fetch from a repository, decided once per repository rather than
/// re-checked per asset.
#[derive(Debug, Clone)]
pub enum FetchStrategy {
    Anonymous,
    Token(String),
}

impl FetchStrategy {
    pub fn for_source(source: &RepositorySource) -> Self {
        match &source.token {
            Some(token) => FetchStrategy::Token(token.clone()),
            None => FetchStrategy::Anonymous,
        }
    }
}

pub struct GithubClient {
    client: Client,
    strategy: FetchStrategy,
}

impl GithubClient {
    pub fn new(strategy: FetchStrategy) -> Self {
        Self {
            client: Client::new(),
            strategy,
        }
    }

    /// List recent releases, most-recent-first, one page of `per_page`
    /// entries. Staleness beyond that window is an accepted trade-off.
    pub async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        per_page: usize,
    ) -> Result<Vec<Release>> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page={}",
            GITHUB_API_BASE, owner, repo, per_page
        );

        debug!("Listing releases for {}/{}", owner, repo);

        let mut request = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if let FetchStrategy::Token(token) = &self.strategy {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MirrorError::Upstream(format!("Release listing failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MirrorError::Upstream(format!(
                "Release listing for {}/{} returned {}",
                owner,
                repo,
                response.status()
            )));
        }

        response
            .json::<Vec<Release>>()
            .await
            .map_err(|e| MirrorError::Upstream(format!("Malformed release listing: {}", e)))
    }
}

impl AssetFetch for GithubClient {
    /// Fetch an asset's bytes as a stream. Credentialed repositories go
    /// through the API asset endpoint with bearer auth; public ones use the
    /// browser download locator directly.
    async fn fetch(&self, asset: &ReleaseAsset) -> Result<ByteStream> {
        let request = match &self.strategy {
            FetchStrategy::Token(token) => self
                .client
                .get(&asset.url)
                .bearer_auth(token)
                .header(header::ACCEPT, "application/octet-stream")
                .header("X-GitHub-Api-Version", API_VERSION),
            FetchStrategy::Anonymous => self.client.get(&asset.browser_download_url),
        }
        .header(header::USER_AGENT, USER_AGENT);

        let name = asset.name.clone();
        let response = request.send().await.map_err(|e| MirrorError::AssetFetch {
            name: name.clone(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(MirrorError::AssetFetch {
                name,
                message: format!("download returned {}", response.status()),
            });
        }

        Ok(response
            .bytes_stream()
            .map_err(move |e| MirrorError::AssetFetch {
                name: name.clone(),
                message: e.to_string(),
            })
            .boxed())
    }
}

/// Production fetch factory: one `GithubClient` per strategy.
pub struct GithubFetchFactory;

impl FetchFactory for GithubFetchFactory {
    type Fetcher = GithubClient;

    fn fetcher(&self, strategy: FetchStrategy) -> GithubClient {
        GithubClient::new(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_selection() {
        let public = RepositorySource {
            owner: "acme".to_string(),
            repo: "widget".to_string(),
            token: None,
        };
        assert!(matches!(
            FetchStrategy::for_source(&public),
            FetchStrategy::Anonymous
        ));

        let private = RepositorySource {
            owner: "acme".to_string(),
            repo: "widget-pro".to_string(),
            token: Some("ghp_secret".to_string()),
        };
        assert!(matches!(
            FetchStrategy::for_source(&private),
            FetchStrategy::Token(_)
        ));
    }
}
