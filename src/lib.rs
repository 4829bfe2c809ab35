//! snapsort - date-partitioned photo and video reorganization
//!
//! This library provides the reorganization engine behind the snapsort CLI:
//! - extension-based media classification with a configurable type scope
//! - capture date resolution from EXIF, TIFF tags, video metadata, and
//!   filesystem timestamps, in that fallback order
//! - deterministic date-partitioned destination planning with optional
//!   sequence-numbered renaming
//! - collision-safe placement (copy or move) with deferred, caller-driven
//!   duplicate resolution (keep-both, skip, replace-via-trash)
//! - progress reporting and cooperative cancellation

pub mod classify;
pub mod cli;
pub mod date;
pub mod dup;
pub mod error;
pub mod options;
pub mod place;
pub mod plan;
pub mod sorter;

pub use classify::{MediaKind, classify, is_tiff_family};
pub use cli::Cli;
pub use date::{DateSource, MetadataResolver, ResolveDate, ResolvedDate};
pub use dup::{DupeFileOption, DuplicateRecord, SystemTrash, TrashProvider};
pub use error::{Error, Result};
pub use options::{FileOperation, MonthFormat, SortOptions, TypeScope};
pub use sorter::{ImageSorter, Progress};
