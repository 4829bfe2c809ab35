//! Duplicate records and resolution policies
//!
//! A duplicate is a deferred collision between a source file and an
//! already-claimed destination path. Records are held for the duration of
//! one run and resolved one at a time by an explicit caller decision; the
//! engine never silently overwrites or drops a collision.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for keep-both suffix probing
pub const MAX_SUFFIX_PROBES: u32 = 9999;

/// A source file whose destination path was already taken this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    /// The file that could not be placed
    pub source: PathBuf,
    /// The destination path it collided with
    pub destination: PathBuf,
}

/// Resolution policy for one duplicate record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DupeFileOption {
    /// Keep both files, suffixing the new arrival until a free path is found
    KeepBoth,
    /// Leave the source file untouched at its original location
    Skip,
    /// Move the existing destination file to the trash, then place the source
    Replace,
}

/// Capability to move a file to a recoverable location.
///
/// The replace policy never hard-deletes; tests substitute a
/// directory-backed fake for the OS trash.
pub trait TrashProvider {
    /// Move `path` to a recoverable location
    fn trash(&self, path: &Path) -> Result<()>;
}

/// OS trash/recycle bin
#[derive(Debug, Default)]
pub struct SystemTrash;

impl TrashProvider for SystemTrash {
    fn trash(&self, path: &Path) -> Result<()> {
        trash::delete(path).map_err(|e| Error::Trash {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// The n-th keep-both candidate: suffix inserted before the extension,
/// `photo.jpg` -> `photo (1).jpg`.
pub fn suffixed_candidate(destination: &Path, n: u32) -> PathBuf {
    let stem = destination
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = match destination.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, n, ext),
        None => format!("{} ({})", stem, n),
    };
    destination.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixed_candidate_with_extension() {
        let candidate = suffixed_candidate(Path::new("/out/2023/photo.jpg"), 1);
        assert_eq!(candidate, PathBuf::from("/out/2023/photo (1).jpg"));
    }

    #[test]
    fn test_suffixed_candidate_without_extension() {
        let candidate = suffixed_candidate(Path::new("/out/2023/photo"), 3);
        assert_eq!(candidate, PathBuf::from("/out/2023/photo (3)"));
    }

    #[test]
    fn test_record_identity_is_the_pair() {
        let a = DuplicateRecord {
            source: PathBuf::from("/in/a.jpg"),
            destination: PathBuf::from("/out/a.jpg"),
        };
        let b = DuplicateRecord {
            source: PathBuf::from("/in/a.jpg"),
            destination: PathBuf::from("/out/a.jpg"),
        };
        assert_eq!(a, b);
    }
}
