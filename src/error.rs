//! Error types for snapsort

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for snapsort operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the reorganization engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input directory does not exist: {0}")]
    DirectoryDoesNotExist(PathBuf),

    #[error("No media files found under {0}")]
    NoFilesFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Failed to extract video metadata from {path}: {message}")]
    VideoMetadata { path: PathBuf, message: String },

    #[error("Failed to move {path} to trash: {message}")]
    Trash { path: PathBuf, message: String },

    #[error("Exhausted keep-both suffix candidates for {destination}")]
    SuffixProbeExhausted { destination: PathBuf },

    #[error("Options file error: {0}")]
    OptionsFile(String),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Chrono parse error: {0}")]
    ChronoParse(#[from] chrono::ParseError),
}
