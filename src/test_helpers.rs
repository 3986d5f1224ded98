//! Shared test helpers: an in-memory disk whose timestamps and locks tests control.

// unwrap/expect are acceptable in test helpers
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::disk::DiskProvider;
use crate::error::{Error, Result};
use crate::transfer::NzbFetcher;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A fixed point in time tests build timestamps around
pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

#[derive(Debug, Clone)]
struct FakeFile {
    size: u64,
    last_write: DateTime<Utc>,
    locked: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    dirs: HashMap<PathBuf, DateTime<Utc>>,
    files: HashMap<PathBuf, FakeFile>,
    read_only: Vec<PathBuf>,
    /// Files that vanish after being listed but before being stat'ed
    vanishing: Vec<PathBuf>,
    /// Folders a recursive listing cannot descend into
    unreadable: Vec<PathBuf>,
}

/// In-memory [`DiskProvider`]
#[derive(Debug, Default)]
pub(crate) struct FakeDisk {
    state: Mutex<FakeState>,
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

impl FakeDisk {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_dir(&self, path: impl Into<PathBuf>, created: DateTime<Utc>) -> &Self {
        self.state.lock().unwrap().dirs.insert(path.into(), created);
        self
    }

    pub(crate) fn add_file(
        &self,
        path: impl Into<PathBuf>,
        size: u64,
        last_write: DateTime<Utc>,
    ) -> &Self {
        self.state.lock().unwrap().files.insert(
            path.into(),
            FakeFile {
                size,
                last_write,
                locked: false,
            },
        );
        self
    }

    pub(crate) fn set_locked(&self, path: impl AsRef<Path>, locked: bool) {
        if let Some(file) = self.state.lock().unwrap().files.get_mut(path.as_ref()) {
            file.locked = locked;
        }
    }

    pub(crate) fn set_read_only(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().read_only.push(path.into());
    }

    pub(crate) fn make_vanishing(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().vanishing.push(path.into());
    }

    pub(crate) fn make_unreadable(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().unreadable.push(path.into());
    }

    pub(crate) fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.dirs.retain(|p, _| !p.starts_with(path));
        state.files.retain(|p, _| !p.starts_with(path));
    }

    fn file(&self, path: &Path) -> io::Result<FakeFile> {
        let state = self.state.lock().unwrap();
        if state.vanishing.iter().any(|p| p == path) {
            return Err(not_found(path));
        }
        state.files.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

#[async_trait]
impl DiskProvider for FakeDisk {
    async fn get_directories(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains_key(path) {
            return Err(not_found(path));
        }
        let mut dirs: Vec<PathBuf> = state
            .dirs
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    async fn get_files(&self, path: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains_key(path) {
            return Err(not_found(path));
        }
        if recursive && state.unreadable.iter().any(|p| p.starts_with(path)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not readable", path.display()),
            ));
        }
        let mut files: Vec<PathBuf> = state
            .files
            .keys()
            .filter(|p| p.parent() == Some(path) || (recursive && p.starts_with(path)))
            .cloned()
            .collect();
        files.sort();
        Ok(files)
    }

    async fn get_file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(self.file(path)?.size)
    }

    async fn file_get_last_write(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        Ok(self.file(path)?.last_write)
    }

    async fn folder_get_creation_time(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let state = self.state.lock().unwrap();
        state.dirs.get(path).copied().ok_or_else(|| not_found(path))
    }

    async fn is_file_locked(&self, path: &Path) -> io::Result<bool> {
        Ok(self.file(path)?.locked)
    }

    async fn folder_exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains_key(path)
    }

    async fn folder_writable(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.contains_key(path) && !state.read_only.iter().any(|p| p == path)
    }
}

/// [`NzbFetcher`] that records requests and writes a fixed body
#[derive(Debug, Default)]
pub(crate) struct RecordingFetcher {
    pub(crate) requests: Mutex<Vec<(String, PathBuf)>>,
    pub(crate) fail_with: Option<String>,
}

impl RecordingFetcher {
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<(String, PathBuf)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NzbFetcher for RecordingFetcher {
    async fn download_file(&self, url: &str, destination: &Path) -> Result<()> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), destination.to_path_buf()));
        match &self.fail_with {
            Some(message) => Err(Error::Transport(message.clone())),
            None => Ok(()),
        }
    }
}
