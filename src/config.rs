//! Configuration types for usenet-blackhole

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Category tag stamped on every item produced by a blackhole client
pub const BLACKHOLE_CATEGORY: &str = "nzbdrone";

/// Settings for a watch-folder download client
///
/// The folders are consumed as-is; [`crate::UsenetBlackhole::test`] checks that they
/// exist and are writable before the client is enabled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlackholeConfig {
    /// Folder the external download engine deposits finished releases into
    pub watch_folder: PathBuf,

    /// Folder NZB payloads are written to for the external engine to pick up
    pub nzb_folder: PathBuf,

    /// Display name of this client, used verbatim in derived download ids
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Pipe-delimited folder-name prefixes unpackers use while extracting
    /// (default: "_UNPACK_|_FAILED_")
    #[serde(default = "default_working_folders")]
    pub working_folders: String,

    /// Timeout for fetching an NZB payload (default: 30 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub fetch_timeout: Duration,

    /// File extensions treated as video content when looking for loose files
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

impl BlackholeConfig {
    /// Create a config for the given folders with every other setting defaulted
    pub fn new(watch_folder: impl Into<PathBuf>, nzb_folder: impl Into<PathBuf>) -> Self {
        Self {
            watch_folder: watch_folder.into(),
            nzb_folder: nzb_folder.into(),
            client_name: default_client_name(),
            working_folders: default_working_folders(),
            fetch_timeout: default_fetch_timeout(),
            video_extensions: default_video_extensions(),
        }
    }

    /// Split `working_folders` into its tokens, in configured order
    ///
    /// Empty tokens are dropped: a blank prefix would match every ancestor.
    pub fn working_folder_tokens(&self) -> Vec<String> {
        split_working_folders(&self.working_folders)
    }

    /// Parse a config from JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Split a pipe-delimited working-folder setting into non-empty tokens
pub fn split_working_folders(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

fn default_client_name() -> String {
    "UsenetBlackhole".to_string()
}

fn default_working_folders() -> String {
    "_UNPACK_|_FAILED_".to_string()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_video_extensions() -> Vec<String> {
    [
        "mkv", "mp4", "m4v", "avi", "mov", "wmv", "mpg", "mpeg", "ts", "m2ts", "webm", "flv",
        "divx", "xvid", "iso", "vob", "ogm", "3gp",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
