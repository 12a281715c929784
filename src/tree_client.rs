//! Client for the listing service that describes the source tree.
//!
//! The listing service answers `GET {base}/contents[/<path>]` with an array of
//! entries (`{name, type, ...}`). Only `dir` entries are kept.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::{
    Client, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::folders::{ContentEntry, FolderTree};

const USER_AGENT: &str = concat!("dsa-gateway/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github.v3+json";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("listing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing service answered {status} for {url}")]
    Status { status: u16, url: String },
    #[error("unexpected listing payload: {0}")]
    Payload(String),
    #[error("invalid listing configuration: {0}")]
    Setup(String),
}

/// Anything that can produce a fresh [`FolderTree`].
#[async_trait]
pub trait TreeSource: Send + Sync {
    async fn fetch_tree(&self) -> Result<FolderTree, UpstreamError>;
}

pub struct TreeClient {
    http: Client,
    base: Url,
}

impl TreeClient {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let base = Url::parse(base_url)
            .map_err(|err| UpstreamError::Setup(format!("invalid base url {base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(UpstreamError::Setup(format!("invalid base url {base_url}")));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| UpstreamError::Setup("token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http, base })
    }

    fn contents_url(&self, folder: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("contents");
            if let Some(folder) = folder {
                segments.push(folder);
            }
        }
        url
    }

    async fn list_dirs(&self, folder: Option<&str>) -> Result<Vec<String>, UpstreamError> {
        let url = self.contents_url(folder);
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let entries: Vec<ContentEntry> = serde_json::from_slice(&body)
            .map_err(|err| UpstreamError::Payload(format!("{url}: {err}")))?;

        Ok(entries
            .into_iter()
            .filter(ContentEntry::is_dir)
            .map(|entry| entry.name)
            .collect())
    }
}

#[async_trait]
impl TreeSource for TreeClient {
    async fn fetch_tree(&self) -> Result<FolderTree, UpstreamError> {
        let top_folders = self.list_dirs(None).await?;
        debug!(count = top_folders.len(), "listed top-level folders");

        let listings = join_all(
            top_folders
                .iter()
                .map(|folder| self.list_dirs(Some(folder.as_str()))),
        )
        .await;

        Ok(top_folders
            .into_iter()
            .zip(listings)
            .map(|(folder, listing)| {
                let subfolders = listing.unwrap_or_else(|err| {
                    warn!(folder = %folder, error = %err, "failed to list subfolders");
                    Vec::new()
                });
                (folder, subfolders)
            })
            .collect())
    }
}
