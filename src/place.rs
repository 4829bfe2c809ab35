//! Placement: copy-or-move plus timestamp stamping
//!
//! The destination is claimed with `File::create_new`, so a pre-existing
//! file (from an earlier run or an external writer) surfaces as
//! [`PlaceOutcome::DestinationTaken`] instead of being overwritten. Any
//! other filesystem error is a hard failure.

use crate::error::Result;
use crate::options::{FileOperation, SortOptions};
use chrono::NaiveDateTime;
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::debug;

/// Outcome of a single placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The file was copied or moved to the destination
    Placed,
    /// The destination path already holds a file; nothing was written
    DestinationTaken,
}

/// Place `source` at `dest`, creating intermediate directories.
///
/// An occupied destination is a duplicate signal, not an error; the claim is
/// atomic, so a racing writer loses at most this one candidate path.
pub fn place(source: &Path, dest: &Path, operation: FileOperation) -> Result<PlaceOutcome> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let claimed = match File::create_new(dest) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(?source, ?dest, "Destination already exists");
            return Ok(PlaceOutcome::DestinationTaken);
        }
        Err(e) => return Err(e.into()),
    };

    let result = match operation {
        FileOperation::Copy => copy_into(source, claimed),
        FileOperation::Move => move_into(source, dest, claimed),
    };

    if let Err(e) = result {
        // Do not leave a partial file behind on a failed placement
        let _ = fs::remove_file(dest);
        return Err(e);
    }

    Ok(PlaceOutcome::Placed)
}

/// Stamp the destination's timestamps after a successful placement.
///
/// Birth times cannot be rewritten portably, so creation-date sync degrades
/// to the nearest settable attributes alongside the modification time.
pub fn stamp_times(dest: &Path, capture: Option<NaiveDateTime>, options: &SortOptions) -> Result<()> {
    let stamp = match capture {
        Some(dt) if options.sync_creation_date || options.sync_modification_date => {
            let utc = dt.and_utc();
            FileTime::from_unix_time(utc.timestamp(), utc.timestamp_subsec_nanos())
        }
        _ => FileTime::now(),
    };
    filetime::set_file_times(dest, stamp, stamp)?;
    Ok(())
}

/// Move by rename, falling back to copy + delete across filesystems.
/// Rename overwrites only the empty claim file created by the caller.
fn move_into(source: &Path, dest: &Path, claimed: File) -> Result<()> {
    drop(claimed);
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }
    let file = OpenOptions::new().write(true).truncate(true).open(dest)?;
    copy_into(source, file)?;
    fs::remove_file(source)?;
    Ok(())
}

/// Copy with buffered I/O into an already-opened destination file
fn copy_into(source: &Path, dest_file: File) -> Result<()> {
    let src_file = File::open(source)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}
