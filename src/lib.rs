//! # usenet-blackhole
//!
//! Watch-folder ("blackhole") download client for Usenet automation.
//!
//! ## Design Philosophy
//!
//! A blackhole client has no progress API into the engine that does the
//! actual downloading. Everything is inferred from disk:
//! - **Submit** writes the release's NZB into a drop folder
//! - **Poll** rebuilds the item list from the watch folder on every call;
//!   a release is downloading while any of its files is locked and complete
//!   once none are
//! - **Import guard** holds back files an unpacker is still extracting
//! - **Stateless** - nothing is remembered between polls, so state can't
//!   drift from what is on disk
//!
//! ## Quick Start
//!
//! ```no_run
//! use usenet_blackhole::{BlackholeConfig, DownloadClient, UsenetBlackhole};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BlackholeConfig::new("/downloads/watch", "/downloads/nzb");
//!     let client = UsenetBlackhole::new(config)?;
//!     client.test().await?;
//!
//!     client
//!         .submit("Show.Name.S01E01.720p", "https://indexer.example/get/123")
//!         .await?;
//!
//!     for item in client.list_items().await? {
//!         println!("{} {:?} {} bytes", item.title, item.status, item.total_size);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Watch-folder download client
pub mod blackhole;
/// Candidate to download item classification
pub mod classifier;
/// Configuration types
pub mod config;
/// Filesystem access, timestamps and lock probing
pub mod disk;
/// Error types
pub mod error;
/// Platform-normalized output paths
pub mod os_path;
/// Watch folder enumeration
pub mod scanner;
/// NZB submission into the drop folder
pub mod transfer;
/// Core types
pub mod types;
/// Unpacking-in-progress import guard
pub mod unpacking;
/// Utility functions
pub mod utils;
/// Video file classification
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use blackhole::{DownloadClient, UsenetBlackhole};
pub use config::BlackholeConfig;
pub use disk::{DiskProvider, LocalDisk};
pub use error::{Error, Result};
pub use os_path::{OsPath, OsPathKind};
pub use transfer::{HttpNzbFetcher, NzbFetcher};
pub use types::{
    Candidate, DownloadClientStatus, DownloadItem, DownloadItemStatus, DownloadProtocol,
    ImportCandidate,
};
pub use unpacking::{Decision, LockSemantics, UnpackingGuard};
pub use video::{ExtensionVideoScanner, VideoFileScanner};
