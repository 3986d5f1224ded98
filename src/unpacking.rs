//! Guard against importing files an unpacker is still extracting
//!
//! Unpackers (SABnzbd, NZBGet and friends) extract into temporary folders
//! whose names start with a known prefix such as `_UNPACK_`. A file below
//! such a folder is withheld from import:
//! - with [`LockSemantics::Strict`], any ancestor match rejects the file;
//! - with [`LockSemantics::Lenient`], a match only rejects the file if it was
//!   written to within the last [`RECENT_WRITE_WINDOW`]. Older matches are
//!   treated as leftovers of an abandoned extraction.
//!
//! Files already in the library are never considered to be unpacking.

use crate::disk::DiskProvider;
use crate::error::{Error, Result};
use crate::types::ImportCandidate;
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Rejection reason reported when a file is withheld
pub const STILL_UNPACKING_REASON: &str = "File is still being unpacked";

/// How recently a lenient-platform file must have been written to keep blocking
pub const RECENT_WRITE_WINDOW: Duration = Duration::minutes(5);

/// How far a working-folder name match can be trusted on this platform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockSemantics {
    /// A working-folder match is conclusive
    Strict,
    /// A match only counts while the file is being written to
    Lenient,
}

impl LockSemantics {
    /// Semantics for the platform this binary runs on
    ///
    /// Windows hosts get [`LockSemantics::Lenient`]; everything else is strict.
    pub fn host() -> Self {
        if cfg!(windows) {
            LockSemantics::Lenient
        } else {
            LockSemantics::Strict
        }
    }
}

/// Outcome of the unpacking check
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The file may be imported
    Accept,
    /// The file must be skipped for now
    Reject {
        /// Why the file was withheld
        reason: String,
    },
}

impl Decision {
    fn still_unpacking() -> Self {
        Decision::Reject {
            reason: STILL_UNPACKING_REASON.to_string(),
        }
    }

    /// Whether the import may proceed
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accept)
    }
}

/// Decides whether a file is still owned by an external unpacker
pub struct UnpackingGuard {
    tokens: Vec<String>,
    semantics: LockSemantics,
    disk: Arc<dyn DiskProvider>,
}

impl UnpackingGuard {
    /// Create a guard matching ancestors against `tokens`, in order
    pub fn new(tokens: Vec<String>, semantics: LockSemantics, disk: Arc<dyn DiskProvider>) -> Self {
        Self {
            tokens,
            semantics,
            disk,
        }
    }

    /// The working-folder prefixes being matched
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Evaluate `candidate` against the current time
    pub async fn evaluate(&self, candidate: &ImportCandidate) -> Result<Decision> {
        self.evaluate_at(candidate, Utc::now()).await
    }

    /// Evaluate `candidate` as if the current time were `now`
    ///
    /// # Errors
    ///
    /// On the lenient platform, returns [`Error::TransientScan`] when the
    /// file's last-write time cannot be read.
    pub async fn evaluate_at(
        &self,
        candidate: &ImportCandidate,
        now: DateTime<Utc>,
    ) -> Result<Decision> {
        let path = candidate.path.as_path();

        if candidate.existing_file {
            debug!(path = %path.display(), "file is in series folder, skipping unpacking check");
            return Ok(Decision::Accept);
        }

        for token in &self.tokens {
            for ancestor in path.ancestors().skip(1) {
                if !folder_name_starts_with(ancestor, token) {
                    continue;
                }

                match self.semantics {
                    LockSemantics::Strict => {
                        debug!(path = %path.display(), working_folder = %token, "file is still being unpacked");
                        return Ok(Decision::still_unpacking());
                    }
                    LockSemantics::Lenient => {
                        let last_write = self
                            .disk
                            .file_get_last_write(path)
                            .await
                            .map_err(|e| Error::transient(path, &e))?;
                        if last_write > now - RECENT_WRITE_WINDOW {
                            debug!(path = %path.display(), working_folder = %token, "file appears to be unpacking still");
                            return Ok(Decision::still_unpacking());
                        }
                    }
                }
            }
        }

        Ok(Decision::Accept)
    }
}

impl std::fmt::Debug for UnpackingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpackingGuard")
            .field("tokens", &self.tokens)
            .field("semantics", &self.semantics)
            .finish_non_exhaustive()
    }
}

fn folder_name_starts_with(folder: &Path, token: &str) -> bool {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().starts_with(token))
        .unwrap_or(false)
}
