//! Watch-folder ("blackhole") download client
//!
//! The client has no API into the download engine it feeds. Submitting a
//! release drops an NZB into `nzb_folder`; progress is inferred by looking at
//! what appears in `watch_folder`. Every poll rebuilds the item list from
//! disk, so state never drifts from what is actually there.

use crate::classifier::DownloadItemClassifier;
use crate::config::BlackholeConfig;
use crate::disk::{DiskProvider, LocalDisk};
use crate::error::{Error, Result};
use crate::os_path::OsPath;
use crate::scanner::WatchFolderScanner;
use crate::transfer::{HttpNzbFetcher, NzbFetcher, TransferSubmitter};
use crate::types::{DownloadClientStatus, DownloadItem, DownloadProtocol};
use crate::unpacking::{LockSemantics, UnpackingGuard};
use crate::video::{ExtensionVideoScanner, VideoFileScanner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Operations the orchestration layer performs on a download client
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Display name of this client
    fn name(&self) -> &str;

    /// Protocol this client downloads
    fn protocol(&self) -> DownloadProtocol;

    /// Current download items
    async fn list_items(&self) -> Result<Vec<DownloadItem>>;

    /// Hand a release to the download engine
    async fn submit(&self, title: &str, url: &str) -> Result<()>;

    /// Remove a tracked item, optionally deleting its data
    async fn remove(&self, download_id: &str, delete_data: bool) -> Result<()>;

    /// Static capability descriptor
    fn status(&self) -> DownloadClientStatus;

    /// Check that the client's settings are usable
    async fn test(&self) -> Result<()>;
}

/// Download client backed by a drop folder and a watch folder
pub struct UsenetBlackhole {
    config: BlackholeConfig,
    disk: Arc<dyn DiskProvider>,
    scanner: WatchFolderScanner,
    classifier: DownloadItemClassifier,
    submitter: TransferSubmitter,
}

impl UsenetBlackhole {
    /// Create a client over the local filesystem with an HTTP fetcher
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: BlackholeConfig) -> Result<Self> {
        let disk: Arc<dyn DiskProvider> = Arc::new(LocalDisk::new());
        let videos = Arc::new(ExtensionVideoScanner::new(
            disk.clone(),
            &config.video_extensions,
        ));
        let fetcher = Arc::new(HttpNzbFetcher::new(config.fetch_timeout)?);
        Ok(Self::with_collaborators(config, disk, videos, fetcher))
    }

    /// Create a client with caller-supplied collaborators
    pub fn with_collaborators(
        config: BlackholeConfig,
        disk: Arc<dyn DiskProvider>,
        videos: Arc<dyn VideoFileScanner>,
        fetcher: Arc<dyn NzbFetcher>,
    ) -> Self {
        let scanner = WatchFolderScanner::new(config.watch_folder.clone(), disk.clone(), videos);
        let classifier = DownloadItemClassifier::new(config.client_name.clone(), disk.clone());
        let submitter = TransferSubmitter::new(config.nzb_folder.clone(), fetcher);
        Self {
            config,
            disk,
            scanner,
            classifier,
            submitter,
        }
    }

    /// The client's settings
    pub fn config(&self) -> &BlackholeConfig {
        &self.config
    }

    /// Build the import guard for files coming out of this client
    ///
    /// Uses the configured working-folder tokens, this host's lock semantics
    /// and the client's disk provider.
    pub fn unpacking_guard(&self) -> UnpackingGuard {
        UnpackingGuard::new(
            self.config.working_folder_tokens(),
            LockSemantics::host(),
            self.disk.clone(),
        )
    }

    async fn test_folder(&self, folder: &Path, key: &str) -> Result<()> {
        if !self.disk.folder_exists(folder).await {
            return Err(Error::config(
                key,
                format!("Folder does not exist: {}", folder.display()),
            ));
        }
        if !self.disk.folder_writable(folder).await {
            return Err(Error::config(
                key,
                format!("Unable to write to folder: {}", folder.display()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DownloadClient for UsenetBlackhole {
    fn name(&self) -> &str {
        &self.config.client_name
    }

    fn protocol(&self) -> DownloadProtocol {
        DownloadProtocol::Usenet
    }

    async fn list_items(&self) -> Result<Vec<DownloadItem>> {
        let candidates = self.scanner.scan().await?;
        let mut items = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            match self.classifier.classify(candidate).await {
                Ok(item) => items.push(item),
                Err(e) if e.is_transient() => {
                    warn!(path = %candidate.path().display(), error = %e, "skipping candidate for this poll");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            client = %self.config.client_name,
            candidates = candidates.len(),
            items = items.len(),
            "polled watch folder"
        );
        Ok(items)
    }

    async fn submit(&self, title: &str, url: &str) -> Result<()> {
        self.submitter.submit(title, url).await?;
        info!(client = %self.config.client_name, title = %title, "submitted NZB to drop folder");
        Ok(())
    }

    async fn remove(&self, download_id: &str, _delete_data: bool) -> Result<()> {
        Err(Error::NotSupported(format!(
            "{} cannot remove download {}: items are owned by the external download engine",
            self.config.client_name, download_id
        )))
    }

    fn status(&self) -> DownloadClientStatus {
        DownloadClientStatus {
            is_localhost: true,
            output_root_folders: vec![OsPath::from_path(&self.config.watch_folder)],
        }
    }

    async fn test(&self) -> Result<()> {
        self.test_folder(&self.config.nzb_folder, "nzb_folder").await?;
        self.test_folder(&self.config.watch_folder, "watch_folder").await?;
        Ok(())
    }
}

impl std::fmt::Debug for UsenetBlackhole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsenetBlackhole")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
