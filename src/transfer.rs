//! Outbound NZB submission
//!
//! Submitting a release to a watch-folder client means saving its NZB into
//! the drop folder, where the external download engine picks it up. The
//! fetch itself goes through the [`NzbFetcher`] trait so callers can route it
//! through their own HTTP stack.

use crate::error::{Error, Result};
use crate::utils::clean_file_name;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fetches a URL and saves the body to a file
#[async_trait]
pub trait NzbFetcher: Send + Sync {
    /// Download `url` into `destination`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::Network`] when the fetch fails,
    /// and [`Error::Io`] when the file cannot be written.
    async fn download_file(&self, url: &str, destination: &Path) -> Result<()>;
}

/// [`NzbFetcher`] using `reqwest`
#[derive(Debug, Clone)]
pub struct HttpNzbFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpNzbFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl NzbFetcher for HttpNzbFetcher {
    async fn download_file(&self, url: &str, destination: &Path) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| Error::Transport(format!("Invalid NZB URL '{}': {}", url, e)))?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Transport(format!(
                    "Timeout fetching NZB from URL '{}' (exceeded {} seconds)",
                    url,
                    self.timeout.as_secs()
                ))
            } else if e.is_connect() {
                Error::Transport(format!("Connection failed for URL '{}': {}", url, e))
            } else {
                Error::Network(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "HTTP error fetching NZB: {} {}",
                response.status(),
                url
            )));
        }

        let content = response.bytes().await.map_err(|e| {
            Error::Transport(format!(
                "Failed to read response body from '{}': {}",
                url, e
            ))
        })?;

        write_then_rename(destination, &content).await
    }
}

/// Suffix of the in-progress file, which the drop-folder engine ignores
const PARTIAL_SUFFIX: &str = "partial";

/// Sibling path a download is staged in before being renamed into place
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}

/// Write `content` so `destination` only ever appears complete
async fn write_then_rename(destination: &Path, content: &[u8]) -> Result<()> {
    let staging = partial_path(destination);

    if let Err(e) = tokio::fs::write(&staging, content).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staging, destination).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }

    Ok(())
}

/// Writes release NZBs into the drop folder
pub struct TransferSubmitter {
    drop_folder: PathBuf,
    fetcher: Arc<dyn NzbFetcher>,
}

impl TransferSubmitter {
    /// Create a submitter writing into `drop_folder`
    pub fn new(drop_folder: impl Into<PathBuf>, fetcher: Arc<dyn NzbFetcher>) -> Self {
        Self {
            drop_folder: drop_folder.into(),
            fetcher,
        }
    }

    /// Where an NZB for `title` is written: `{drop_folder}/{clean title}.nzb`
    pub fn destination_for(&self, title: &str) -> PathBuf {
        self.drop_folder
            .join(format!("{}.nzb", clean_file_name(title)))
    }

    /// Fetch `url` and save it under the sanitized release title
    ///
    /// Failures are returned as-is; retrying is up to the caller.
    pub async fn submit(&self, title: &str, url: &str) -> Result<()> {
        let destination = self.destination_for(title);

        debug!(url = %url, destination = %destination.display(), "downloading NZB");
        self.fetcher.download_file(url, &destination).await?;
        debug!(destination = %destination.display(), "NZB download succeeded");

        Ok(())
    }
}

impl std::fmt::Debug for TransferSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferSubmitter")
            .field("drop_folder", &self.drop_folder)
            .finish_non_exhaustive()
    }
}
