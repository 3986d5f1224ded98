//! Derive download items from watch folder candidates
//!
//! Status is recomputed from disk on every call: a candidate is
//! [`DownloadItemStatus::Downloading`] while any of its files is locked by
//! another process and [`DownloadItemStatus::Completed`] otherwise. Nothing is
//! remembered between polls.

use crate::config::BLACKHOLE_CATEGORY;
use crate::disk::{DiskProvider, to_ticks};
use crate::error::{Error, Result};
use crate::os_path::OsPath;
use crate::types::{Candidate, DownloadItem, DownloadItemStatus};
use crate::utils::clean_file_name;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Turns [`Candidate`]s into [`DownloadItem`]s
pub struct DownloadItemClassifier {
    client_name: String,
    disk: Arc<dyn DiskProvider>,
}

impl DownloadItemClassifier {
    /// Create a classifier stamping items with `client_name`
    pub fn new(client_name: impl Into<String>, disk: Arc<dyn DiskProvider>) -> Self {
        Self {
            client_name: client_name.into(),
            disk,
        }
    }

    /// Classify a single candidate
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransientScan`] when the candidate or one of its files
    /// disappears or becomes unreadable mid-classification.
    pub async fn classify(&self, candidate: &Candidate) -> Result<DownloadItem> {
        match candidate {
            Candidate::Directory(folder) => self.classify_folder(candidate, folder).await,
            Candidate::File(file) => self.classify_file(candidate, file).await,
        }
    }

    async fn classify_folder(&self, candidate: &Candidate, folder: &Path) -> Result<DownloadItem> {
        let files = self
            .disk
            .get_files(folder, true)
            .await
            .map_err(|e| Error::transient(folder, &e))?;
        let created = self
            .disk
            .folder_get_creation_time(folder)
            .await
            .map_err(|e| Error::transient(folder, &e))?;
        let ticks = ticks_for(folder, created)?;

        let mut total_size = 0u64;
        for file in &files {
            total_size += self
                .disk
                .get_file_size(file)
                .await
                .map_err(|e| Error::transient(file, &e))?;
        }

        let locked = self.any_locked(&files).await?;
        Ok(self.build_item(candidate, ticks, total_size, locked))
    }

    async fn classify_file(&self, candidate: &Candidate, file: &Path) -> Result<DownloadItem> {
        let last_write = self
            .disk
            .file_get_last_write(file)
            .await
            .map_err(|e| Error::transient(file, &e))?;
        let ticks = ticks_for(file, last_write)?;
        let size = self
            .disk
            .get_file_size(file)
            .await
            .map_err(|e| Error::transient(file, &e))?;

        let locked = self.any_locked(&[file.to_path_buf()]).await?;
        Ok(self.build_item(candidate, ticks, size, locked))
    }

    /// Stops at the first locked file
    async fn any_locked(&self, files: &[PathBuf]) -> Result<bool> {
        for file in files {
            let locked = self
                .disk
                .is_file_locked(file)
                .await
                .map_err(|e| Error::transient(file, &e))?;
            if locked {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn build_item(
        &self,
        candidate: &Candidate,
        ticks: i64,
        total_size: u64,
        locked: bool,
    ) -> DownloadItem {
        let name = candidate.base_name();

        let (status, remaining_time) = if locked {
            (DownloadItemStatus::Downloading, None)
        } else {
            (DownloadItemStatus::Completed, Some(Duration::ZERO))
        };

        DownloadItem {
            download_client: self.client_name.clone(),
            download_id: format!("{}_{}_{}", self.client_name, name, ticks),
            category: BLACKHOLE_CATEGORY.to_string(),
            title: clean_file_name(&name),
            total_size,
            output_path: OsPath::from_path(candidate.path()),
            status,
            remaining_time,
        }
    }
}

/// Timestamps too far out to express in ticks can't yield a stable id
fn ticks_for(path: &Path, time: DateTime<Utc>) -> Result<i64> {
    to_ticks(time).ok_or_else(|| Error::TransientScan {
        path: path.to_path_buf(),
        reason: format!("timestamp {} is out of range for a download id", time),
    })
}

impl std::fmt::Debug for DownloadItemClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadItemClassifier")
            .field("client_name", &self.client_name)
            .finish_non_exhaustive()
    }
}
