use std::path::Path;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{
    config::Config,
    error::{GhdlError, Result},
    fetch::FileFetcher,
    location::RepoLocation,
    source::ContentSource,
    types::RemoteEntry,
};

/// GitHub-backed content source
///
/// Lists paths through the REST contents API and downloads files from the
/// `download_url` each file entry carries (normally raw.githubusercontent.com).
#[derive(Clone)]
pub struct GitHubSource {
    client: Client,
    fetcher: FileFetcher,
    api_base: String,
    owner: String,
    repo: String,
    reference: Option<String>,
}

/// The contents API answers with an array for directories and a single
/// object for files.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<RemoteEntry>),
    Single(RemoteEntry),
}

impl GitHubSource {
    /// Create a new GitHub source with the default configuration
    ///
    /// # Arguments
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `reference` - Branch, tag or commit; `None` uses the default branch
    pub fn new(owner: String, repo: String, reference: Option<String>) -> Self {
        Self::with_config(&Config::default(), owner, repo, reference)
    }

    pub fn with_config(
        config: &Config,
        owner: String,
        repo: String,
        reference: Option<String>,
    ) -> Self {
        let client = config.http_client();

        Self {
            fetcher: FileFetcher::new(client.clone()),
            client,
            api_base: config.api_base.clone(),
            owner,
            repo,
            reference,
        }
    }

    /// Create a source for the repository a parsed browser URL points at
    pub fn from_location(config: &Config, location: &RepoLocation) -> Self {
        Self::with_config(
            config,
            location.owner.clone(),
            location.repo.clone(),
            location.reference.clone(),
        )
    }

    /// Build the contents API URL for a repository path
    fn api_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| GhdlError::invalid_url(&self.api_base, e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| GhdlError::invalid_url(&self.api_base, "cannot be used as a base URL"))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        if let Some(reference) = &self.reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }

        Ok(url)
    }
}

/// Decode a buffered contents API body, trying the directory shape first
fn decode_contents(url: &str, body: &[u8]) -> Result<Vec<RemoteEntry>> {
    match serde_json::from_slice(body) {
        Ok(ContentsResponse::Listing(entries)) => Ok(entries),
        Ok(ContentsResponse::Single(entry)) => Ok(vec![entry]),
        Err(source) => Err(GhdlError::Decode {
            url: url.to_string(),
            source,
        }),
    }
}

#[async_trait]
impl ContentSource for GitHubSource {
    async fn list_contents(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let url = self.api_url(path)?;
        debug!("listing {} via {}", if path.is_empty() { "/" } else { path }, url);

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GhdlError::Remote {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        let entries = decode_contents(url.as_str(), &body)?;
        debug!("{} entries under {:?}", entries.len(), path);

        Ok(entries)
    }

    async fn fetch_file(&self, download_url: &str, destination: &Path) -> Result<u64> {
        self.fetcher.fetch(download_url, destination).await
    }

    fn identifier(&self) -> String {
        format!(
            "github://{}/{}@{}",
            self.owner,
            self.repo,
            self.reference.as_deref().unwrap_or("HEAD")
        )
    }
}
