//! Media classification by file extension
//!
//! Classification is pure and cheap: it looks only at the extension and is
//! invoked once per candidate path while the input tree is enumerated.

use crate::options::TypeScope;
use std::path::Path;

/// Supported still image extensions (including RAW and HEIF containers)
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "heic", "heif", "avif", "tiff", "tif", "raw",
    "arw", "cr2", "cr3", "nef", "orf", "rw2", "dng", "raf", "srw", "pef",
];

/// Supported video extensions
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv", "flv", "m4v", "3gp"];

/// TIFF-based containers: plain TIFF plus the TIFF-derived RAW formats.
/// These carry the plain TIFF DateTime tag in addition to EXIF sub-IFD dates.
const TIFF_FAMILY_EXTENSIONS: &[&str] =
    &["tif", "tiff", "dng", "nef", "cr2", "arw", "orf", "rw2", "pef", "srw"];

/// Kind of a media file, derived from its path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image (including RAW and HEIF)
    Image,
    /// Video file
    Video,
    /// Neither image nor video
    Other,
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Classify a path as image, video, or other
pub fn classify(path: &Path) -> MediaKind {
    let Some(ext) = extension_lower(path) else {
        return MediaKind::Other;
    };
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}

/// Check whether a path is a TIFF-family container
pub fn is_tiff_family(path: &Path) -> bool {
    extension_lower(path)
        .map(|ext| TIFF_FAMILY_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

impl TypeScope {
    /// Check whether a media kind falls inside this scope
    pub fn includes(&self, kind: MediaKind) -> bool {
        match self {
            TypeScope::PhotosOnly => kind == MediaKind::Image,
            TypeScope::VideosOnly => kind == MediaKind::Video,
            TypeScope::Both => kind != MediaKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_images() {
        assert_eq!(classify(Path::new("a/photo.jpg")), MediaKind::Image);
        assert_eq!(classify(Path::new("photo.JPG")), MediaKind::Image);
        assert_eq!(classify(Path::new("scan.tiff")), MediaKind::Image);
        assert_eq!(classify(Path::new("shot.DNG")), MediaKind::Image);
        assert_eq!(classify(Path::new("pic.heic")), MediaKind::Image);
    }

    #[test]
    fn test_classify_videos() {
        assert_eq!(classify(Path::new("clip.mp4")), MediaKind::Video);
        assert_eq!(classify(Path::new("clip.MOV")), MediaKind::Video);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify(Path::new("notes.txt")), MediaKind::Other);
        assert_eq!(classify(Path::new("no_extension")), MediaKind::Other);
        assert_eq!(classify(Path::new(".hidden")), MediaKind::Other);
    }

    #[test]
    fn test_tiff_family() {
        assert!(is_tiff_family(Path::new("scan.tif")));
        assert!(is_tiff_family(Path::new("shot.NEF")));
        assert!(!is_tiff_family(Path::new("photo.jpg")));
        assert!(!is_tiff_family(Path::new("clip.mp4")));
    }

    #[test]
    fn test_type_scope_filtering() {
        assert!(TypeScope::PhotosOnly.includes(MediaKind::Image));
        assert!(!TypeScope::PhotosOnly.includes(MediaKind::Video));
        assert!(TypeScope::VideosOnly.includes(MediaKind::Video));
        assert!(!TypeScope::VideosOnly.includes(MediaKind::Image));
        assert!(TypeScope::Both.includes(MediaKind::Image));
        assert!(TypeScope::Both.includes(MediaKind::Video));
        assert!(!TypeScope::Both.includes(MediaKind::Other));
    }
}
