//! Filesystem access used by the watch-folder client
//!
//! Everything the client knows about a download comes from disk observation,
//! so all reads go through the [`DiskProvider`] trait. [`LocalDisk`] is the
//! real implementation; tests substitute an in-memory provider to control
//! timestamps and lock state.
//!
//! ## Usage
//!
//! ```no_run
//! use usenet_blackhole::disk::{DiskProvider, LocalDisk};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> std::io::Result<()> {
//! let disk = LocalDisk::new();
//! for folder in disk.get_directories(Path::new("/downloads/watch")).await? {
//!     let locked = disk.is_file_locked(&folder.join("episode.mkv")).await?;
//!     println!("{}: locked={}", folder.display(), locked);
//! }
//! # Ok(())
//! # }
//! ```

mod clock;
mod lock;

pub use clock::{UNIX_EPOCH_TICKS, to_ticks};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tracing::debug;

/// Name of the probe file written when checking folder permissions
const WRITE_TEST_FILE: &str = ".usenet-blackhole-write-test";

/// Read access to files and folders, plus the lock probe
///
/// All methods are read-only except [`DiskProvider::folder_writable`], which
/// creates and removes a probe file.
#[async_trait]
pub trait DiskProvider: Send + Sync {
    /// Immediate subdirectories of `path`
    async fn get_directories(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Files under `path`, descending into subdirectories when `recursive`
    async fn get_files(&self, path: &Path, recursive: bool) -> io::Result<Vec<PathBuf>>;

    /// Size of a file in bytes
    async fn get_file_size(&self, path: &Path) -> io::Result<u64>;

    /// Last modification time of a file
    async fn file_get_last_write(&self, path: &Path) -> io::Result<DateTime<Utc>>;

    /// Creation time of a folder
    async fn folder_get_creation_time(&self, path: &Path) -> io::Result<DateTime<Utc>>;

    /// Whether another process holds the file open exclusively
    async fn is_file_locked(&self, path: &Path) -> io::Result<bool>;

    /// Whether `path` exists and is a directory
    async fn folder_exists(&self, path: &Path) -> bool;

    /// Whether a file can be created inside `path`
    async fn folder_writable(&self, path: &Path) -> bool;
}

/// [`DiskProvider`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDisk;

impl LocalDisk {
    /// Create a local filesystem provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiskProvider for LocalDisk {
    async fn get_directories(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        list_entries(path, |metadata| metadata.is_dir()).await
    }

    async fn get_files(&self, path: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        if !recursive {
            return list_entries(path, |metadata| metadata.is_file()).await;
        }

        let root = path.to_path_buf();
        spawn_blocking(move || walk_files(&root))
            .await
            .map_err(|e| io::Error::other(format!("directory walk task panicked: {}", e)))?
    }

    async fn get_file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn file_get_last_write(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        clock::last_write(path).await
    }

    async fn folder_get_creation_time(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        clock::creation_time(path).await
    }

    async fn is_file_locked(&self, path: &Path) -> io::Result<bool> {
        let path = path.to_path_buf();
        spawn_blocking(move || lock::is_file_locked(&path))
            .await
            .map_err(|e| io::Error::other(format!("lock probe task panicked: {}", e)))?
    }

    async fn folder_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false)
    }

    async fn folder_writable(&self, path: &Path) -> bool {
        let probe = path.join(WRITE_TEST_FILE);
        if let Err(e) = tokio::fs::write(&probe, b"").await {
            debug!(path = %path.display(), error = %e, "folder is not writable");
            return false;
        }
        if let Err(e) = tokio::fs::remove_file(&probe).await {
            debug!(path = %probe.display(), error = %e, "failed to remove write probe");
        }
        true
    }
}

/// Immediate children of `path` whose (symlink-followed) metadata passes `keep`
async fn list_entries(
    path: &Path,
    keep: impl Fn(&std::fs::Metadata) -> bool,
) -> io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut found = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let entry_path = entry.path();
        match tokio::fs::metadata(&entry_path).await {
            Ok(metadata) if keep(&metadata) => found.push(entry_path),
            Ok(_) => {}
            // Removed between listing and stat, or a dangling symlink
            Err(e) => {
                debug!(path = %entry_path.display(), error = %e, "skipping unreadable entry");
            }
        }
    }

    Ok(found)
}

/// Every file below `root`
///
/// Entries that vanish mid-walk are skipped. Any other failure, including
/// an unreadable subfolder or a symlink loop, fails the whole listing so a
/// release is never reported with part of its files missing.
fn walk_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() > 0 && is_vanished(&e) => {
                debug!(root = %root.display(), error = %e, "entry vanished during walk");
            }
            Err(e) => return Err(io::Error::from(e)),
        }
    }

    Ok(files)
}

fn is_vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}
