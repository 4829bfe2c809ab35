//! Run orchestration
//!
//! [`ImageSorter`] owns all mutable run state, enumerates the input tree,
//! drives the per-file pipeline (classify, resolve date, plan, place), and
//! surfaces duplicates to its caller for explicit resolution. State is
//! mutated only through `&mut self`, which is the single-writer guarantee:
//! no component reaches into orchestrator state, they receive what they
//! need as parameters.

use crate::classify::{MediaKind, classify};
use crate::date::{MetadataResolver, ResolveDate};
use crate::dup::{
    DupeFileOption, DuplicateRecord, MAX_SUFFIX_PROBES, SystemTrash, TrashProvider,
    suffixed_candidate,
};
use crate::error::{Error, Result};
use crate::options::SortOptions;
use crate::place::{self, PlaceOutcome};
use crate::plan;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, debug, info, span, warn};
use walkdir::WalkDir;

/// A progress notification: fire-and-forget, never a synchronization point
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Files placed or resolved so far
    pub completed: usize,
    /// Total eligible files, fixed once enumeration finishes
    pub total: usize,
    /// Whether this is the final report of a cancelled run
    pub cancelled: bool,
}

type ProgressFn = Box<dyn Fn(Progress) + Send>;

/// Mutable state for one run. Constructed fresh at the start of `run()` and
/// cleared on every aborting error, so failed runs never leak state into
/// the next invocation.
#[derive(Debug, Default)]
struct RunState {
    /// Per-formatted-date rename sequence counters
    rename_counters: HashMap<String, u32>,
    /// Planned destination -> actual destination assigned this run
    destinations: HashMap<PathBuf, PathBuf>,
    /// Pending collisions, in enumeration order
    duplicates: Vec<DuplicateRecord>,
    completed: usize,
    total: usize,
    /// Files left unplaced because no capture date was resolvable
    skipped_without_date: usize,
}

impl RunState {
    fn clear(&mut self) {
        *self = RunState::default();
    }
}

/// Orchestrator for one source -> destination reorganization pass
pub struct ImageSorter {
    input_root: PathBuf,
    output_root: PathBuf,
    options: SortOptions,
    state: RunState,
    cancel: Arc<AtomicBool>,
    progress: Option<ProgressFn>,
    resolver: Box<dyn ResolveDate>,
    trash: Box<dyn TrashProvider>,
}

impl ImageSorter {
    /// Create a sorter with the production metadata resolver and OS trash
    pub fn new(input_root: PathBuf, output_root: PathBuf, options: SortOptions) -> Self {
        Self {
            input_root,
            output_root,
            options,
            state: RunState::default(),
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
            resolver: Box::new(MetadataResolver),
            trash: Box::new(SystemTrash),
        }
    }

    /// Substitute the capture date resolver
    pub fn with_resolver(mut self, resolver: impl ResolveDate + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Substitute the trash collaborator used by the replace policy
    pub fn with_trash(mut self, trash: impl TrashProvider + 'static) -> Self {
        self.trash = Box::new(trash);
        self
    }

    /// Register a progress callback. It is invoked inline after every
    /// placed or resolved file and must be cheap.
    pub fn with_progress(mut self, callback: impl Fn(Progress) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Request cooperative cancellation; honored before the next file
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Handle for wiring cancellation from another thread
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Current `(completed, total)` progress
    pub fn progress(&self) -> (usize, usize) {
        (self.state.completed, self.state.total)
    }

    /// Number of pending duplicate records
    pub fn duplicate_count(&self) -> usize {
        self.state.duplicates.len()
    }

    /// The next pending duplicate, if any
    pub fn current_duplicate(&self) -> Option<&DuplicateRecord> {
        self.state.duplicates.first()
    }

    /// Files left unplaced this run because no capture date was resolvable
    pub fn skipped_without_date(&self) -> usize {
        self.state.skipped_without_date
    }

    /// Run the main pass: enumerate, filter, and place every eligible file,
    /// returning the pending duplicate records for caller-driven resolution.
    pub fn run(&mut self) -> Result<Vec<DuplicateRecord>> {
        let _span = span!(Level::INFO, "sorter_run").entered();

        self.state.clear();
        self.cancel.store(false, Ordering::Relaxed);

        match self.run_inner() {
            Ok(duplicates) => Ok(duplicates),
            Err(e) => {
                self.state.clear();
                Err(e)
            }
        }
    }

    fn run_inner(&mut self) -> Result<Vec<DuplicateRecord>> {
        if !self.input_root.is_dir() {
            return Err(Error::DirectoryDoesNotExist(self.input_root.clone()));
        }

        info!(input = %self.input_root.display(), "Scanning input directory");
        let files = self.collect_files()?;
        if files.is_empty() {
            return Err(Error::NoFilesFound(self.input_root.clone()));
        }

        self.state.total = files.len();
        info!(count = files.len(), "Found eligible media files");

        for (path, kind) in files {
            if self.cancel.load(Ordering::Relaxed) {
                info!(completed = self.state.completed, "Run cancelled");
                self.report_progress(true);
                return Err(Error::Cancelled);
            }
            self.process_file(path, kind)?;
        }

        if !self.state.duplicates.is_empty() {
            info!(
                pending = self.state.duplicates.len(),
                "Main pass complete with pending duplicates"
            );
        }

        Ok(self.state.duplicates.clone())
    }

    /// Enumerate the input tree once, filtered to the configured type scope.
    /// Enumeration failures are run-fatal.
    fn collect_files(&self) -> Result<Vec<(PathBuf, MediaKind)>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.input_root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let kind = classify(entry.path());
            if self.options.type_scope.includes(kind) {
                files.push((entry.path().to_path_buf(), kind));
            }
        }
        Ok(files)
    }

    fn process_file(&mut self, path: PathBuf, kind: MediaKind) -> Result<()> {
        let _span = span!(Level::DEBUG, "process_file", ?path).entered();

        let Some(resolved) = self.resolver.resolve(&path, kind) else {
            // Deliberate policy: un-dateable files are left at their source
            // and never block the run.
            debug!(?path, "No capture date, leaving file unplaced");
            self.state.skipped_without_date += 1;
            return Ok(());
        };

        let planned =
            plan::planned_destination(&self.output_root, &path, &resolved.timestamp, &self.options);

        // A hit means a file processed earlier this run already owns the
        // planned path; this one becomes a duplicate without touching disk.
        if let Some(actual) = self.state.destinations.get(&planned) {
            self.push_duplicate(path, actual.clone());
            return Ok(());
        }

        let dest = plan::actual_destination(
            &self.output_root,
            &path,
            &resolved.timestamp,
            &self.options,
            &mut self.state.rename_counters,
        );
        self.state.destinations.insert(planned, dest.clone());

        match place::place(&path, &dest, self.options.operation)? {
            PlaceOutcome::DestinationTaken => {
                // Pre-existing file from a previous run or external source
                self.push_duplicate(path, dest);
            }
            PlaceOutcome::Placed => {
                place::stamp_times(&dest, Some(resolved.timestamp), &self.options)?;
                info!(
                    source = ?path,
                    destination = ?dest,
                    date_source = ?resolved.source,
                    timestamp = %resolved.timestamp,
                    "Placed file"
                );
                self.state.completed += 1;
                self.report_progress(false);
            }
        }

        Ok(())
    }

    fn push_duplicate(&mut self, source: PathBuf, destination: PathBuf) {
        let record = DuplicateRecord { source, destination };
        if !self.state.duplicates.contains(&record) {
            warn!(
                source = %record.source.display(),
                destination = %record.destination.display(),
                "Destination collision, deferring to duplicate resolution"
            );
            self.state.duplicates.push(record);
        }
    }

    /// Apply a resolution policy to one pending duplicate record.
    ///
    /// On success the record is removed and `completed` advances by one.
    /// A trash or placement failure leaves the record pending so the caller
    /// can retry with a different policy or abandon the batch.
    pub fn resolve_duplicate(
        &mut self,
        record: &DuplicateRecord,
        policy: DupeFileOption,
    ) -> Result<()> {
        if self.cancel.load(Ordering::Relaxed) {
            self.state.clear();
            self.report_progress(true);
            return Err(Error::Cancelled);
        }

        let Some(index) = self.state.duplicates.iter().position(|r| r == record) else {
            warn!(?record, "Unknown or already-resolved duplicate record");
            return Ok(());
        };

        match policy {
            DupeFileOption::Skip => {
                debug!(source = %record.source.display(), "Skipping duplicate");
            }
            DupeFileOption::Replace => self.replace_duplicate(record)?,
            DupeFileOption::KeepBoth => self.keep_both_duplicate(record)?,
        }

        self.state.duplicates.remove(index);
        self.state.completed += 1;
        self.report_progress(false);
        Ok(())
    }

    /// Apply one policy to every pending record, in enumeration order,
    /// stopping at the first unrecoverable error.
    pub fn resolve_all_duplicates(&mut self, policy: DupeFileOption) -> Result<()> {
        while let Some(record) = self.state.duplicates.first().cloned() {
            self.resolve_duplicate(&record, policy)?;
        }
        Ok(())
    }

    fn replace_duplicate(&mut self, record: &DuplicateRecord) -> Result<()> {
        // Never hard-delete: the old destination goes to a recoverable
        // location first.
        self.trash.trash(&record.destination)?;

        let capture = self
            .resolver
            .resolve(&record.source, classify(&record.source))
            .map(|r| r.timestamp);

        match place::place(&record.source, &record.destination, self.options.operation)? {
            PlaceOutcome::Placed => {
                place::stamp_times(&record.destination, capture, &self.options)?;
                info!(
                    source = %record.source.display(),
                    destination = %record.destination.display(),
                    "Replaced existing file"
                );
                Ok(())
            }
            PlaceOutcome::DestinationTaken => {
                // An external writer reoccupied the path between trash and
                // placement; this is not a duplicate, it is a hard failure.
                Err(std::io::Error::new(
                    ErrorKind::AlreadyExists,
                    format!("destination reoccupied: {}", record.destination.display()),
                )
                .into())
            }
        }
    }

    fn keep_both_duplicate(&mut self, record: &DuplicateRecord) -> Result<()> {
        // Stamping needs the capture date again; the main pass did not keep it.
        let capture = self
            .resolver
            .resolve(&record.source, classify(&record.source))
            .map(|r| r.timestamp);

        let mut placed_at = None;
        for n in 1..=MAX_SUFFIX_PROBES {
            let candidate = suffixed_candidate(&record.destination, n);
            match place::place(&record.source, &candidate, self.options.operation)? {
                PlaceOutcome::Placed => {
                    placed_at = Some(candidate);
                    break;
                }
                // Tolerates races: a slot taken between probe and claim just
                // advances the suffix.
                PlaceOutcome::DestinationTaken => continue,
            }
        }

        let dest = placed_at.ok_or_else(|| Error::SuffixProbeExhausted {
            destination: record.destination.clone(),
        })?;
        place::stamp_times(&dest, capture, &self.options)?;
        info!(
            source = %record.source.display(),
            destination = %dest.display(),
            "Kept both files"
        );
        Ok(())
    }

    fn report_progress(&self, cancelled: bool) {
        if let Some(callback) = &self.progress {
            callback(Progress {
                completed: self.state.completed,
                total: self.state.total,
                cancelled,
            });
        }
    }
}
