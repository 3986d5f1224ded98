//! Video file classification
//!
//! Loose files dropped into the watch folder only become download items when
//! they look like video content. The [`VideoFileScanner`] trait lets callers
//! plug in their own media detection; [`ExtensionVideoScanner`] classifies by
//! file extension.

use crate::disk::DiskProvider;
use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Finds video files under a folder
#[async_trait]
pub trait VideoFileScanner: Send + Sync {
    /// Video files under `root`, descending into subfolders when `recursive`
    async fn video_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>>;
}

/// Classifies files as video by extension (case-insensitive)
pub struct ExtensionVideoScanner {
    disk: Arc<dyn DiskProvider>,
    extensions: HashSet<String>,
}

impl ExtensionVideoScanner {
    /// Create a scanner recognizing the given extensions (without leading dot)
    pub fn new<I, S>(disk: Arc<dyn DiskProvider>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self { disk, extensions }
    }

    /// Whether `path` has one of the configured video extensions
    pub fn is_video_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for ExtensionVideoScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionVideoScanner")
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VideoFileScanner for ExtensionVideoScanner {
    async fn video_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        let files = self.disk.get_files(root, recursive).await?;
        Ok(files
            .into_iter()
            .filter(|path| self.is_video_file(path))
            .collect())
    }
}
