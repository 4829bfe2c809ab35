//! EXIF and TIFF date tag extraction

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::trace;

/// Extract the EXIF `DateTimeOriginal` tag (when the picture was taken)
pub fn extract_original_date(path: &Path) -> Result<NaiveDateTime> {
    extract_date_tag(path, Tag::DateTimeOriginal)
}

/// Extract the plain TIFF `DateTime` tag carried by TIFF-family containers
pub fn extract_tiff_date(path: &Path) -> Result<NaiveDateTime> {
    extract_date_tag(path, Tag::DateTime)
}

fn extract_date_tag(path: &Path, tag: Tag) -> Result<NaiveDateTime> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(field) = exif.get_field(tag, In::PRIMARY)
        && let Some(datetime) = parse_exif_datetime(&field.display_value().to_string())
    {
        trace!(?path, ?tag, "Found EXIF date tag");
        return Ok(datetime);
    }

    Err(Error::ExifRead {
        path: path.to_path_buf(),
        message: format!("tag {} absent or unparseable", tag),
    })
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // With subseconds
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(dt);
    }

    // Some writers emit non-standard separators
    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}
