//! Watch folder enumeration
//!
//! Produces the candidates a poll evaluates: every immediate subdirectory of
//! the watch folder (release-per-folder drops) and every loose video file the
//! [`VideoFileScanner`] recognizes at the top level (single-file drops). The
//! two views are independent; no attempt is made to reconcile them.

use crate::disk::DiskProvider;
use crate::error::Result;
use crate::types::Candidate;
use crate::video::VideoFileScanner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Lists download candidates under a watch folder
pub struct WatchFolderScanner {
    root: PathBuf,
    disk: Arc<dyn DiskProvider>,
    videos: Arc<dyn VideoFileScanner>,
}

impl WatchFolderScanner {
    /// Create a scanner for `root`
    pub fn new(
        root: impl Into<PathBuf>,
        disk: Arc<dyn DiskProvider>,
        videos: Arc<dyn VideoFileScanner>,
    ) -> Self {
        Self {
            root: root.into(),
            disk,
            videos,
        }
    }

    /// The watch folder being scanned
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate the current candidates
    ///
    /// Directory candidates come first, then file candidates, each in listing
    /// order. Callers must not rely on ordering. Each call re-reads the disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the watch folder itself cannot be listed.
    pub async fn scan(&self) -> Result<Vec<Candidate>> {
        let folders = self.disk.get_directories(&self.root).await?;
        let videos = self.videos.video_files(&self.root, false).await?;

        debug!(
            root = %self.root.display(),
            folders = folders.len(),
            files = videos.len(),
            "scanned watch folder"
        );

        Ok(folders
            .into_iter()
            .map(Candidate::Directory)
            .chain(videos.into_iter().map(Candidate::File))
            .collect())
    }
}

impl std::fmt::Debug for WatchFolderScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchFolderScanner")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
