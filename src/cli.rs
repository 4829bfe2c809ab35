//! CLI argument parsing with clap

use crate::dup::DupeFileOption;
use crate::options::{FileOperation, MonthFormat, SortOptions, TypeScope};
use clap::Parser;
use std::path::PathBuf;

/// snapsort - date-partitioned photo and video reorganization
///
/// Classifies the media files under an input directory, derives a capture
/// date for each from embedded metadata (with filesystem fallbacks), and
/// copies or moves them into a date-partitioned destination layout. Name
/// collisions are never resolved silently: pending duplicates are listed,
/// or bulk-resolved with the policy given via --on-duplicate.
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Input directory to scan for media files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for reorganized files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to an options file (TOML format)
    ///
    /// When specified, settings from the file are used as defaults.
    /// CLI arguments override options file settings.
    #[arg(short = 'C', long)]
    pub options_file: Option<PathBuf>,

    /// Omit the year folder component
    #[arg(long)]
    pub no_year: bool,

    /// Omit the month folder component
    #[arg(long)]
    pub no_month: bool,

    /// Include the day folder component
    #[arg(long)]
    pub day: bool,

    /// Month folder rendering style
    #[arg(short = 'm', long, value_enum)]
    pub month_format: Option<MonthFormat>,

    /// File operation mode
    #[arg(short = 'O', long, value_enum)]
    pub operation: Option<FileOperation>,

    /// Stamp destination creation times to the capture date (best effort)
    #[arg(long)]
    pub sync_creation: bool,

    /// Stamp destination modification times to the capture date
    #[arg(long)]
    pub sync_modification: bool,

    /// Rename placed files to "<formatted date>_<seq>"
    #[arg(short = 'r', long)]
    pub rename: bool,

    /// chrono strftime pattern for renamed files
    #[arg(long)]
    pub rename_format: Option<String>,

    /// Which media kinds to process
    #[arg(short = 's', long, value_enum)]
    pub scope: Option<TypeScope>,

    /// Bulk policy for destination collisions; when absent, pending
    /// duplicates are listed and the run exits non-zero
    #[arg(short = 'd', long, value_enum)]
    pub on_duplicate: Option<DupeFileOption>,

    /// Write a sample options file to the given path and exit
    #[arg(long)]
    pub write_sample_options: Option<PathBuf>,

    /// Log file path (in addition to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge CLI arguments with options loaded from a file.
    /// CLI arguments take precedence over file settings.
    pub fn merge_with_options(&self, mut options: SortOptions) -> SortOptions {
        if self.no_year {
            options.include_year = false;
        }
        if self.no_month {
            options.include_month = false;
        }
        if self.day {
            options.include_day = true;
        }
        if let Some(month_format) = self.month_format {
            options.month_format = month_format;
        }
        if let Some(operation) = self.operation {
            options.operation = operation;
        }
        if self.sync_creation {
            options.sync_creation_date = true;
        }
        if self.sync_modification {
            options.sync_modification_date = true;
        }
        if self.rename {
            options.rename_enabled = true;
        }
        if let Some(ref rename_format) = self.rename_format {
            options.rename_date_format = rename_format.clone();
            options.rename_enabled = true;
        }
        if let Some(scope) = self.scope {
            options.type_scope = scope;
        }
        options
    }

    /// Convert CLI arguments to options (when no options file is used)
    pub fn to_options(&self) -> SortOptions {
        self.merge_with_options(SortOptions::default())
    }
}
