//! Platform-normalized paths reported to the orchestration layer
//!
//! A download client reports output locations that may later be rewritten by a
//! remote-path-mapping layer running on a different OS. [`OsPath`] keeps the
//! path as text tagged with the platform family it was written for, with
//! separators normalized for that family.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Platform family a path string belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsPathKind {
    /// Could not be determined (relative path without separators)
    Unknown,
    /// Drive-letter or UNC path
    Windows,
    /// Rooted at `/`
    Unix,
}

/// A path string normalized for its platform family
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsPath {
    path: String,
    kind: OsPathKind,
}

impl OsPath {
    /// Parse and normalize a path string
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref().trim();
        let kind = detect_kind(raw);
        let path = match kind {
            OsPathKind::Windows => normalize_windows(raw),
            OsPathKind::Unix => normalize_unix(raw),
            OsPathKind::Unknown => raw.to_string(),
        };
        Self { path, kind }
    }

    /// Build from a native path
    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    /// The normalized path text
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Platform family of this path
    pub fn kind(&self) -> OsPathKind {
        self.kind
    }

    /// Whether this is a Windows path
    pub fn is_windows(&self) -> bool {
        self.kind == OsPathKind::Windows
    }

    /// Whether this is a Unix path
    pub fn is_unix(&self) -> bool {
        self.kind == OsPathKind::Unix
    }

    /// Whether the path is empty
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Last component of the path, if any
    pub fn file_name(&self) -> Option<&str> {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty() && !name.ends_with(':'))
    }
}

impl fmt::Display for OsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&Path> for OsPath {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

fn detect_kind(path: &str) -> OsPathKind {
    let bytes = path.as_bytes();
    let drive_letter = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    if path.starts_with("\\\\") || drive_letter {
        OsPathKind::Windows
    } else if path.starts_with('/') {
        OsPathKind::Unix
    } else if path.contains('\\') {
        OsPathKind::Windows
    } else if path.contains('/') {
        OsPathKind::Unix
    } else {
        OsPathKind::Unknown
    }
}

fn normalize_windows(path: &str) -> String {
    let unc = path.starts_with("\\\\") || path.starts_with("//");
    let body = path.replace('/', "\\");
    let mut out = collapse(&body, '\\');
    if unc {
        out = format!("\\{}", out.trim_start_matches('\\'));
        out.insert(0, '\\');
    }
    // keep the separator after a bare drive letter ("C:\")
    while out.len() > 2 && out.ends_with('\\') && !out.ends_with(":\\") {
        out.pop();
    }
    out
}

fn normalize_unix(path: &str) -> String {
    let body = path.replace('\\', "/");
    let mut out = collapse(&body, '/');
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

fn collapse(path: &str, sep: char) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_sep = false;
    for c in path.chars() {
        if c == sep {
            if !prev_sep {
                out.push(c);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_paths_are_normalized() {
        let path = OsPath::new("/downloads//watch/Show.S01E01/");
        assert!(path.is_unix());
        assert_eq!(path.as_str(), "/downloads/watch/Show.S01E01");
        assert_eq!(path.file_name(), Some("Show.S01E01"));
    }

    #[test]
    fn unix_root_keeps_its_separator() {
        assert_eq!(OsPath::new("/").as_str(), "/");
        assert_eq!(OsPath::new("/").file_name(), None);
    }

    #[test]
    fn windows_drive_paths_use_backslashes() {
        let path = OsPath::new("C:/Downloads/watch\\Show.S01E01\\");
        assert!(path.is_windows());
        assert_eq!(path.as_str(), "C:\\Downloads\\watch\\Show.S01E01");
        assert_eq!(path.file_name(), Some("Show.S01E01"));
    }

    #[test]
    fn windows_drive_root_keeps_its_separator() {
        let path = OsPath::new("D:\\");
        assert_eq!(path.as_str(), "D:\\");
        assert_eq!(path.file_name(), None);
    }

    #[test]
    fn unc_paths_keep_leading_double_backslash() {
        let path = OsPath::new("\\\\nas\\\\media\\watch\\");
        assert!(path.is_windows());
        assert_eq!(path.as_str(), "\\\\nas\\media\\watch");
    }

    #[test]
    fn bare_names_are_unknown() {
        let path = OsPath::new("Show.S01E01");
        assert_eq!(path.kind(), OsPathKind::Unknown);
        assert_eq!(path.as_str(), "Show.S01E01");
    }

    #[test]
    fn display_matches_normalized_text() {
        let path = OsPath::from_path(Path::new("/tmp/watch/"));
        assert_eq!(path.to_string(), "/tmp/watch");
    }
}
