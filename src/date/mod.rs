//! Capture date resolution
//!
//! This module derives a best-effort capture date for a media file from a
//! prioritized chain of metadata sources:
//! - EXIF `DateTimeOriginal` for still images
//! - the plain TIFF `DateTime` tag for TIFF-family containers, before EXIF
//! - container creation-date metadata for videos (via FFprobe)
//! - the filesystem creation timestamp, where the chain allows it
//!
//! A file for which no source yields a date is skipped by the orchestrator;
//! that is deliberate policy, not an error.

pub mod exif;
pub mod video;

use crate::classify::{MediaKind, is_tiff_family};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Source of the resolved capture date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// EXIF DateTimeOriginal
    Exif,
    /// Plain TIFF DateTime tag
    TiffTag,
    /// Video container creation date
    VideoMetadata,
    /// Filesystem creation (or modification) timestamp
    FileSystem,
}

/// A capture date attached to one file
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDate {
    /// The capture timestamp
    pub timestamp: NaiveDateTime,
    /// Where the timestamp came from
    pub source: DateSource,
}

/// Capability to resolve a capture date for a path.
///
/// The orchestrator takes any resolver, so tests can substitute a fixed one
/// and new metadata sources can be added without touching call sites.
pub trait ResolveDate {
    /// Resolve the capture date, or `None` when no source applies
    fn resolve(&self, path: &Path, kind: MediaKind) -> Option<ResolvedDate>;
}

/// Production resolver backed by embedded metadata and filesystem timestamps
#[derive(Debug, Default)]
pub struct MetadataResolver;

impl ResolveDate for MetadataResolver {
    fn resolve(&self, path: &Path, kind: MediaKind) -> Option<ResolvedDate> {
        let chain: &[fn(&Path) -> Option<ResolvedDate>] = match kind {
            MediaKind::Image if is_tiff_family(path) => {
                &[try_tiff_tag, try_exif_original, try_filesystem]
            }
            MediaKind::Image => &[try_exif_original],
            MediaKind::Video => &[try_video_metadata, try_filesystem],
            MediaKind::Other => return None,
        };

        for extract in chain {
            if let Some(resolved) = extract(path) {
                debug!(?path, source = ?resolved.source, "Resolved capture date");
                return Some(resolved);
            }
        }

        debug!(?path, "No capture date resolvable, file will be skipped");
        None
    }
}

fn try_exif_original(path: &Path) -> Option<ResolvedDate> {
    exif::extract_original_date(path).ok().map(|timestamp| ResolvedDate {
        timestamp,
        source: DateSource::Exif,
    })
}

fn try_tiff_tag(path: &Path) -> Option<ResolvedDate> {
    exif::extract_tiff_date(path).ok().map(|timestamp| ResolvedDate {
        timestamp,
        source: DateSource::TiffTag,
    })
}

fn try_video_metadata(path: &Path) -> Option<ResolvedDate> {
    video::extract_video_date(path).ok().map(|timestamp| ResolvedDate {
        timestamp,
        source: DateSource::VideoMetadata,
    })
}

/// Filesystem creation timestamp, falling back to the modification time on
/// platforms and filesystems without birth times
fn try_filesystem(path: &Path) -> Option<ResolvedDate> {
    let metadata = fs::metadata(path).ok()?;
    let stamp = metadata.created().or_else(|_| metadata.modified()).ok()?;
    let datetime: chrono::DateTime<chrono::Utc> = stamp.into();
    Some(ResolvedDate {
        timestamp: datetime.naive_utc(),
        source: DateSource::FileSystem,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_other_kind_has_no_date() {
        let resolver = MetadataResolver;
        assert!(resolver.resolve(Path::new("notes.txt"), MediaKind::Other).is_none());
    }

    #[test]
    fn test_plain_image_without_exif_is_unresolvable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        File::create(&path).unwrap().write_all(b"not a real jpeg").unwrap();

        let resolver = MetadataResolver;
        assert!(resolver.resolve(&path, MediaKind::Image).is_none());
    }

    #[test]
    fn test_tiff_family_falls_back_to_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tif");
        File::create(&path).unwrap().write_all(b"not a real tiff").unwrap();

        let resolver = MetadataResolver;
        let resolved = resolver.resolve(&path, MediaKind::Image).unwrap();
        assert_eq!(resolved.source, DateSource::FileSystem);
    }

    #[test]
    fn test_video_falls_back_to_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        File::create(&path).unwrap().write_all(b"not a real video").unwrap();

        let resolver = MetadataResolver;
        let resolved = resolver.resolve(&path, MediaKind::Video).unwrap();
        assert_eq!(resolved.source, DateSource::FileSystem);
    }
}
