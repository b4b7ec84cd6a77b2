// file: src/remote/client.rs
// description: authenticated GitHub REST client for tree listings and file contents
// reference: https://docs.rs/reqwest

use crate::config::{Config, RemoteConfig};
use crate::error::{MirrorError, Result};
use crate::remote::source::ContentSource;
use crate::remote::types::{ContentResponse, TreeResponse, filter_candidates};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const USER_AGENT: &str = "blog-mirror";
const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: Url,
    owner: String,
    repo: String,
    branch: String,
    extensions: Vec<String>,
}

impl GitHubClient {
    pub fn new(remote: &RemoteConfig, extensions: Vec<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        if let Some(token) = remote.bearer_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| MirrorError::Config(format!("Invalid token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        } else {
            debug!("No GitHub token configured; unauthenticated rate limits apply");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(remote.request_timeout())
            .build()
            .map_err(|e| MirrorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let api_base = Url::parse(&remote.api_base)
            .map_err(|e| MirrorError::Config(format!("Invalid api_base: {}", e)))?;

        Ok(Self {
            client,
            api_base,
            owner: remote.owner.clone(),
            repo: remote.repo.clone(),
            branch: remote.branch.clone(),
            extensions,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.remote, config.content.markdown_extensions.clone())
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| MirrorError::Config(format!("api_base {} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    pub fn tree_url(&self) -> Result<Url> {
        let mut url = self.endpoint(["git", "trees", self.branch.as_str()])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        Ok(url)
    }

    pub fn contents_url(&self, path: &str) -> Result<Url> {
        let segments = std::iter::once("contents").chain(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().append_pair("ref", &self.branch);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MirrorError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MirrorError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MirrorError::Network(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    fn label(&self) -> String {
        format!("{}/{}@{}", self.owner, self.repo, self.branch)
    }

    async fn list_candidate_files(&self, subdirectory: &str) -> Result<Vec<String>> {
        let list_failed = |message: String| MirrorError::ListFailed {
            repository: self.label(),
            message,
        };

        let url = self.tree_url().map_err(|e| list_failed(e.to_string()))?;
        let listing: TreeResponse = self
            .get_json(url)
            .await
            .map_err(|e| list_failed(e.to_string()))?;

        if listing.truncated {
            warn!(
                "Tree listing for {} was truncated; some files may be missing",
                self.label()
            );
        }

        let candidates = filter_candidates(&listing.tree, subdirectory, &self.extensions);
        debug!(
            "{} of {} tree entries are markdown candidates",
            candidates.len(),
            listing.tree.len()
        );
        Ok(candidates)
    }

    async fn fetch_file(&self, path: &str) -> Result<String> {
        let fetch_failed = |message: String| MirrorError::FetchFailed {
            path: path.to_string(),
            message,
        };

        let url = self.contents_url(path).map_err(|e| fetch_failed(e.to_string()))?;
        let response: ContentResponse = self
            .get_json(url)
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        response.decode().map_err(fetch_failed)
    }
}
