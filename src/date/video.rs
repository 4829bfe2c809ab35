//! Video creation date extraction via FFprobe

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Metadata keys to try for the container creation date
const CREATION_DATE_KEYS: &[&str] = &[
    "creation_time",
    "com.apple.quicktime.creationdate",
    "date",
    "date_recorded",
];

/// Cached FFprobe availability check
static FFPROBE_AVAILABLE: OnceLock<bool> = OnceLock::new();

fn is_ffprobe_available() -> bool {
    *FFPROBE_AVAILABLE.get_or_init(|| Command::new("ffprobe").arg("-version").output().is_ok())
}

/// Extract the creation date from a video container's metadata
pub fn extract_video_date(path: &Path) -> Result<NaiveDateTime> {
    if !is_ffprobe_available() {
        return Err(Error::VideoMetadata {
            path: path.to_path_buf(),
            message: "ffprobe not found in PATH".to_string(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("failed to execute ffprobe: {}", e),
        })?;

    if !output.status.success() {
        return Err(Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("ffprobe failed: {}", String::from_utf8_lossy(&output.stderr)),
        });
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    trace!(?path, "FFprobe output: {}", json_str);

    let json: serde_json::Value =
        serde_json::from_str(&json_str).map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("failed to parse ffprobe JSON: {}", e),
        })?;

    // Format-level tags first, then per-stream tags
    if let Some(tags) = json.get("format").and_then(|f| f.get("tags"))
        && let Some(dt) = date_from_tags(tags)
    {
        debug!(?path, "Found video creation date in format tags");
        return Ok(dt);
    }

    if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in streams {
            if let Some(tags) = stream.get("tags")
                && let Some(dt) = date_from_tags(tags)
            {
                debug!(?path, "Found video creation date in stream tags");
                return Ok(dt);
            }
        }
    }

    Err(Error::VideoMetadata {
        path: path.to_path_buf(),
        message: "no creation date found in video metadata".to_string(),
    })
}

fn date_from_tags(tags: &serde_json::Value) -> Option<NaiveDateTime> {
    for key in CREATION_DATE_KEYS {
        for tag_key in [*key, &key.to_uppercase()] {
            if let Some(value) = tags.get(tag_key).and_then(|v| v.as_str())
                && let Some(dt) = parse_video_datetime(value)
            {
                return Some(dt);
            }
        }
    }
    None
}

/// Parse the datetime strings video containers commonly carry.
/// Offset-qualified values are normalized to UTC.
fn parse_video_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    // ISO without timezone (assumed UTC) and space-separated variants
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_video_datetime() {
        // ISO 8601 with Z
        let dt = parse_video_datetime("2024-01-15T14:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);

        // With milliseconds
        let dt = parse_video_datetime("2024-01-15T14:30:00.123Z").unwrap();
        assert_eq!(dt.year(), 2024);

        // Offset normalized to UTC: 14:30 +08:00 = 06:30 UTC
        let dt = parse_video_datetime("2024-01-15T14:30:00+08:00").unwrap();
        assert_eq!(dt.hour(), 6);
        assert_eq!(dt.minute(), 30);

        // No timezone, space separator
        let dt = parse_video_datetime("2024-01-15 14:30:00").unwrap();
        assert_eq!(dt.year(), 2024);

        assert!(parse_video_datetime("invalid").is_none());
    }

    #[test]
    fn test_date_from_tags_key_priority() {
        let tags = serde_json::json!({
            "date": "2020-05-05T00:00:00Z",
            "creation_time": "2024-01-15T14:30:00Z",
        });
        let dt = date_from_tags(&tags).unwrap();
        assert_eq!(dt.year(), 2024);
    }
}
