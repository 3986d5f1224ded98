//! Core types reported to the orchestration layer

use crate::os_path::OsPath;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Transfer protocol a download client handles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadProtocol {
    /// NZB-based Usenet downloads
    Usenet,
}

/// Derived status of a download item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadItemStatus {
    /// At least one constituent file is still held open by another process
    Downloading,
    /// No constituent file is locked
    Completed,
}

/// A release observed in the watch folder
///
/// Items are derived from disk on every poll and never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    /// Name of the client that produced this item
    pub download_client: String,
    /// `{client}_{name}_{ticks}`, stable while the candidate is unchanged
    pub download_id: String,
    /// Fixed category tag
    pub category: String,
    /// Candidate name with filename-illegal characters replaced
    pub title: String,
    /// Sum of all constituent file sizes in bytes
    pub total_size: u64,
    /// Location of the candidate on disk
    pub output_path: OsPath,
    /// Downloading or Completed
    pub status: DownloadItemStatus,
    /// Zero when Completed, unknown otherwise
    #[serde(default, with = "optional_duration_serde")]
    pub remaining_time: Option<Duration>,
}

impl DownloadItem {
    /// Whether the item is ready for import
    pub fn is_completed(&self) -> bool {
        self.status == DownloadItemStatus::Completed
    }
}

/// Static capability descriptor of a download client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadClientStatus {
    /// Whether the client runs on the same host (always true for a watch folder)
    pub is_localhost: bool,
    /// Folders finished downloads are placed under
    pub output_root_folders: Vec<OsPath>,
}

/// Something under the watch folder that may become a [`DownloadItem`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidate {
    /// An immediate subdirectory of the watch folder (one release per folder)
    Directory(PathBuf),
    /// A loose video file dropped into the watch folder
    File(PathBuf),
}

impl Candidate {
    /// Filesystem path of the candidate
    pub fn path(&self) -> &std::path::Path {
        match self {
            Candidate::Directory(path) | Candidate::File(path) => path,
        }
    }

    /// Last path component, as text
    pub fn base_name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A file the import pipeline is about to consider
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportCandidate {
    /// Path to the candidate file
    pub path: PathBuf,
    /// The file is already in the library (re-import or upgrade)
    pub existing_file: bool,
}

impl ImportCandidate {
    /// A fresh file found in a download folder
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            existing_file: false,
        }
    }

    /// A file already placed in the library
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            existing_file: true,
        }
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn completed_item() -> DownloadItem {
        DownloadItem {
            download_client: "Blackhole".into(),
            download_id: "Blackhole_Show_1".into(),
            category: "nzbdrone".into(),
            title: "Show".into(),
            total_size: 1000,
            output_path: OsPath::new("/watch/Show"),
            status: DownloadItemStatus::Completed,
            remaining_time: Some(Duration::ZERO),
        }
    }

    #[test]
    fn item_serializes_status_lowercase_and_remaining_seconds() {
        let json = serde_json::to_value(completed_item()).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["remaining_time"], 0);
        assert_eq!(json["output_path"]["path"], "/watch/Show");
    }

    #[test]
    fn downloading_item_serializes_unknown_remaining_time_as_null() {
        let item = DownloadItem {
            status: DownloadItemStatus::Downloading,
            remaining_time: None,
            ..completed_item()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json["remaining_time"].is_null());
        assert!(!item.is_completed());
    }

    #[test]
    fn candidate_base_name_is_last_component() {
        let dir = Candidate::Directory(PathBuf::from("/watch/Show.S01E01"));
        let file = Candidate::File(PathBuf::from("/watch/Movie.2024.mkv"));
        assert_eq!(dir.base_name(), "Show.S01E01");
        assert_eq!(file.base_name(), "Movie.2024.mkv");
    }

    #[test]
    fn import_candidate_constructors_set_existing_flag() {
        assert!(!ImportCandidate::new("/dl/a.mkv").existing_file);
        assert!(ImportCandidate::existing("/tv/a.mkv").existing_file);
    }
}
