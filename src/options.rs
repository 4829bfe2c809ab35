//! Run configuration for the reorganization engine
//!
//! A [`SortOptions`] value is fully resolved before a run starts: every field
//! carries a concrete value, either from an options TOML file, from CLI
//! flags, or from the defaults below.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rendering style for the month folder component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MonthFormat {
    /// Plain number: "9"
    Numeric,
    /// Zero-padded number: "09" (default)
    #[default]
    ZeroPadded,
    /// Abbreviated name: "Sep"
    Abbreviated,
    /// Full name: "September"
    Full,
    /// Single letter: "S"
    Narrow,
}

/// File operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileOperation {
    /// Copy files to destination, source retained
    #[default]
    Copy,
    /// Move files to destination
    Move,
}

/// Which media kinds a run will process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TypeScope {
    /// Only still images (including RAW and HEIF containers)
    PhotosOnly,
    /// Only video files
    VideosOnly,
    /// Both images and videos (default)
    #[default]
    Both,
}

/// Configuration for one reorganization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOptions {
    /// Partition destination folders by year
    pub include_year: bool,

    /// Partition destination folders by month
    pub include_month: bool,

    /// Partition destination folders by day
    pub include_day: bool,

    /// Rendering style for the month component
    pub month_format: MonthFormat,

    /// Copy or move files into the destination tree
    pub operation: FileOperation,

    /// Stamp the destination file's creation time to the capture date
    /// (best effort; most Unix filesystems cannot rewrite birth times)
    pub sync_creation_date: bool,

    /// Stamp the destination file's modification time to the capture date
    pub sync_modification_date: bool,

    /// Rename placed files to a formatted-date stem with a sequence number
    pub rename_enabled: bool,

    /// chrono strftime pattern for the renamed stem, e.g. "%Y-%m-%d"
    pub rename_date_format: String,

    /// Which media kinds to process
    pub type_scope: TypeScope,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            include_year: true,
            include_month: true,
            include_day: false,
            month_format: MonthFormat::default(),
            operation: FileOperation::default(),
            sync_creation_date: false,
            sync_modification_date: false,
            rename_enabled: false,
            rename_date_format: "%Y-%m-%d".to_string(),
            type_scope: TypeScope::default(),
        }
    }
}

impl SortOptions {
    /// Load options from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(Error::Io)?;
        let options: SortOptions = toml::from_str(&content).map_err(|e| {
            Error::OptionsFile(format!("failed to parse '{}': {}", path.display(), e))
        })?;
        Ok(options)
    }

    /// Save options to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::OptionsFile(format!("failed to serialize options: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Generate a sample options file content
    pub fn sample_options() -> String {
        r#"# snapsort options file (TOML)

# Folder partitioning: any non-empty subset of year/month/day
include_year = true
include_month = true
include_day = false

# Month folder style: "numeric", "zero-padded", "abbreviated", "full", "narrow"
month_format = "zero-padded"

# File operation: "copy" or "move"
operation = "copy"

# Stamp destination timestamps to the capture date
sync_creation_date = false
sync_modification_date = false

# Rename placed files to "<formatted date>_<seq>.<ext>"
rename_enabled = false
rename_date_format = "%Y-%m-%d"

# Media kinds to process: "photos-only", "videos-only", "both"
type_scope = "both"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SortOptions::default();
        assert!(options.include_year);
        assert!(options.include_month);
        assert!(!options.include_day);
        assert_eq!(options.month_format, MonthFormat::ZeroPadded);
        assert_eq!(options.operation, FileOperation::Copy);
        assert_eq!(options.type_scope, TypeScope::Both);
    }

    #[test]
    fn test_sample_options_parses() {
        let options: SortOptions = toml::from_str(&SortOptions::sample_options()).unwrap();
        assert_eq!(options.month_format, MonthFormat::ZeroPadded);
        assert_eq!(options.rename_date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut options = SortOptions::default();
        options.rename_enabled = true;
        options.month_format = MonthFormat::Full;
        options.type_scope = TypeScope::VideosOnly;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        options.save_to_file(&path).unwrap();

        let loaded = SortOptions::load_from_file(&path).unwrap();
        assert!(loaded.rename_enabled);
        assert_eq!(loaded.month_format, MonthFormat::Full);
        assert_eq!(loaded.type_scope, TypeScope::VideosOnly);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let options: SortOptions = toml::from_str("include_day = true").unwrap();
        assert!(options.include_day);
        assert!(options.include_year);
        assert_eq!(options.operation, FileOperation::Copy);
    }
}
