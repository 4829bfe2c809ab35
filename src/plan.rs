//! Destination path planning
//!
//! Given a resolved capture date and the run options, computes the relative
//! date-partitioned folder structure and (optionally) a renamed filename.
//! Planning is pure except for the rename counter, which is owned by the
//! orchestrator's run state and passed in explicitly.

use crate::options::{MonthFormat, SortOptions};
use chrono::{Datelike, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Render the month component per the configured format
pub fn render_month(date: &NaiveDateTime, format: MonthFormat) -> String {
    match format {
        MonthFormat::Numeric => format!("{}", date.month()),
        MonthFormat::ZeroPadded => format!("{:02}", date.month()),
        MonthFormat::Abbreviated => date.format("%b").to_string(),
        MonthFormat::Full => date.format("%B").to_string(),
        MonthFormat::Narrow => date
            .format("%B")
            .to_string()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default(),
    }
}

/// Compute the ordered folder components selected by the options.
/// Disabled components are omitted entirely, never left as empty segments.
pub fn folder_components(date: &NaiveDateTime, options: &SortOptions) -> Vec<String> {
    let mut components = Vec::new();
    if options.include_year {
        components.push(format!("{}", date.year()));
    }
    if options.include_month {
        components.push(render_month(date, options.month_format));
    }
    if options.include_day {
        components.push(format!("{}", date.day()));
    }
    components
}

/// The collision key for a file: output root, date folders, and the file's
/// original name. Rename settings never influence this path; it exists only
/// to detect that two source files would land in the same folder.
pub fn planned_destination(
    output_root: &Path,
    source: &Path,
    date: &NaiveDateTime,
    options: &SortOptions,
) -> PathBuf {
    let mut dest = output_root.to_path_buf();
    for component in folder_components(date, options) {
        dest.push(component);
    }
    if let Some(name) = source.file_name() {
        dest.push(name);
    }
    dest
}

/// The real destination for a file, applying rename disambiguation when
/// enabled. The per-formatted-date counter advances on every call, so two
/// files with the same formatted date anywhere in the tree receive strictly
/// increasing sequence numbers in processing order.
pub fn actual_destination(
    output_root: &Path,
    source: &Path,
    date: &NaiveDateTime,
    options: &SortOptions,
    rename_counters: &mut HashMap<String, u32>,
) -> PathBuf {
    let mut dest = output_root.to_path_buf();
    for component in folder_components(date, options) {
        dest.push(component);
    }

    if options.rename_enabled {
        let formatted = date.format(&options.rename_date_format).to_string();
        let seq = rename_counters
            .entry(formatted.clone())
            .and_modify(|n| *n += 1)
            .or_insert(1);
        let stem = format!("{}_{:03}", formatted, seq);

        let filename = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        };
        dest.push(filename);
    } else if let Some(name) = source.file_name() {
        dest.push(name);
    }

    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_render_month_formats() {
        let september = date(2022, 9, 15);
        assert_eq!(render_month(&september, MonthFormat::Numeric), "9");
        assert_eq!(render_month(&september, MonthFormat::ZeroPadded), "09");
        assert_eq!(render_month(&september, MonthFormat::Abbreviated), "Sep");
        assert_eq!(render_month(&september, MonthFormat::Full), "September");
        assert_eq!(render_month(&september, MonthFormat::Narrow), "S");
    }

    #[test]
    fn test_folder_components_omit_disabled() {
        let mut options = SortOptions::default();
        options.include_year = true;
        options.include_month = false;
        options.include_day = true;

        let components = folder_components(&date(2022, 9, 15), &options);
        assert_eq!(components, vec!["2022".to_string(), "15".to_string()]);
    }

    #[test]
    fn test_folder_components_all_disabled() {
        let mut options = SortOptions::default();
        options.include_year = false;
        options.include_month = false;
        options.include_day = false;

        assert!(folder_components(&date(2022, 9, 15), &options).is_empty());
    }

    #[test]
    fn test_planned_destination_keeps_original_name_under_rename() {
        let mut options = SortOptions::default();
        options.rename_enabled = true;

        let planned = planned_destination(
            Path::new("/out"),
            Path::new("/in/photo.jpg"),
            &date(2023, 6, 15),
            &options,
        );
        assert_eq!(planned, PathBuf::from("/out/2023/06/photo.jpg"));
    }

    #[test]
    fn test_planning_is_idempotent_without_rename() {
        let options = SortOptions::default();
        let d = date(2023, 6, 15);
        let a = planned_destination(Path::new("/out"), Path::new("/in/a.jpg"), &d, &options);
        let b = planned_destination(Path::new("/out"), Path::new("/in/a.jpg"), &d, &options);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rename_counter_shared_across_extensions() {
        let mut options = SortOptions::default();
        options.rename_enabled = true;
        options.rename_date_format = "%Y-%m-%d".to_string();
        let mut counters = HashMap::new();
        let d = date(2024, 1, 1);

        let first = actual_destination(
            Path::new("/out"),
            Path::new("/in/a.jpg"),
            &d,
            &options,
            &mut counters,
        );
        let second = actual_destination(
            Path::new("/out"),
            Path::new("/in/b.mp4"),
            &d,
            &options,
            &mut counters,
        );

        assert_eq!(first, PathBuf::from("/out/2024/01/2024-01-01_001.jpg"));
        assert_eq!(second, PathBuf::from("/out/2024/01/2024-01-01_002.mp4"));
    }

    #[test]
    fn test_rename_without_extension() {
        let mut options = SortOptions::default();
        options.rename_enabled = true;
        let mut counters = HashMap::new();

        let dest = actual_destination(
            Path::new("/out"),
            Path::new("/in/noext"),
            &date(2024, 1, 1),
            &options,
            &mut counters,
        );
        assert_eq!(dest, PathBuf::from("/out/2024/01/2024-01-01_001"));
    }

    #[test]
    fn test_rename_counters_independent_per_formatted_date() {
        let mut options = SortOptions::default();
        options.rename_enabled = true;
        let mut counters = HashMap::new();

        let a = actual_destination(
            Path::new("/out"),
            Path::new("/in/a.jpg"),
            &date(2024, 1, 1),
            &options,
            &mut counters,
        );
        let b = actual_destination(
            Path::new("/out"),
            Path::new("/in/b.jpg"),
            &date(2024, 1, 2),
            &options,
            &mut counters,
        );

        assert!(a.to_string_lossy().ends_with("2024-01-01_001.jpg"));
        assert!(b.to_string_lossy().ends_with("2024-01-02_001.jpg"));
    }
}
