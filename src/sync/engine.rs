use std::fs::{self, File, FileTimes};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use crate::error::{MediaSyncError, Result};
use crate::playlist::ResolvedFileList;

use super::flush::FilesystemFlush;
use super::plan::SyncPlan;

/// Pause between two touches. Must stay above the filesystem's timestamp
/// resolution for the newest-first ordering to hold.
pub const TOUCH_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Copy into `<destination>/<playlist name>` instead of `<destination>`.
    pub use_playlist_dir: bool,
    /// Empty the destination directory before copying.
    pub remove_existing: bool,
    pub touch_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            use_playlist_dir: false,
            remove_existing: false,
            touch_delay: TOUCH_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    Copied,
    /// The source did not exist; skipped with a warning.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: CopyStatus,
}

/// Per-file results of one sync, in copy order.
#[derive(Debug, Clone, Default)]
pub struct CopyResult {
    pub destination: PathBuf,
    pub outcomes: Vec<CopyOutcome>,
}

impl CopyResult {
    pub fn copied(&self) -> impl DoubleEndedIterator<Item = &CopyOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CopyStatus::Copied)
    }

    pub fn copied_count(&self) -> usize {
        self.copied().count()
    }

    pub fn missing_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == CopyStatus::Missing)
            .count()
    }
}

#[derive(Debug)]
pub enum SyncOutcome {
    /// The playlist resolved to nothing; the destination was left untouched.
    PlaylistNotFound,
    Synced(CopyResult),
}

/// Directory the files of `playlist_name` are copied into.
pub fn destination_dir(destination: &Path, playlist_name: &str, options: &SyncOptions) -> PathBuf {
    if options.use_playlist_dir {
        destination.join(playlist_name)
    } else {
        destination.to_path_buf()
    }
}

/// Copy a resolved playlist into `destination`, renumbering and re-touching
/// the files, then flush. Progress lines go to `out`.
pub fn sync_playlist(
    files: &ResolvedFileList,
    playlist_name: &str,
    destination: &Path,
    options: &SyncOptions,
    flush: &dyn FilesystemFlush,
    out: &mut dyn Write,
) -> Result<SyncOutcome> {
    if files.is_empty() {
        return Ok(SyncOutcome::PlaylistNotFound);
    }

    let destination = destination_dir(destination, playlist_name, options);
    prepare_destination(&destination, options.remove_existing, out)?;

    let plan = SyncPlan::new(files, &destination);
    tracing::debug!(
        "Numbering {} files with {} digits into {}",
        plan.len(),
        plan.width,
        destination.display()
    );
    writeln!(out, "Copying {} files to {}...", plan.len(), destination.display())?;
    let result = copy_planned(&plan, &destination, out)?;

    touch_newest_first(&result, options.touch_delay, out)?;

    if flush.is_enabled() {
        writeln!(out, "Performing sync...")?;
        let output = flush.flush()?;
        if !output.stdout.trim().is_empty() {
            writeln!(out, "stdout: {}", output.stdout.trim_end())?;
        }
        if !output.stderr.trim().is_empty() {
            writeln!(out, "stderr: {}", output.stderr.trim_end())?;
        }
    }

    writeln!(
        out,
        "Copied {} files to {}",
        result.copied_count(),
        destination.display()
    )?;

    Ok(SyncOutcome::Synced(result))
}

/// Optionally empty `destination` entry by entry, then make sure it exists.
///
/// The directory itself is kept; only its children are removed.
pub fn prepare_destination(destination: &Path, remove_existing: bool, out: &mut dyn Write) -> Result<()> {
    if remove_existing && destination.exists() {
        clear_directory(destination)?;
        writeln!(out, "Recursively deleted {}", destination.display())?;
    }

    if !destination.exists() {
        fs::create_dir_all(destination)
            .map_err(|e| MediaSyncError::io("create destination", destination, e))?;
    }
    Ok(())
}

fn clear_directory(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| MediaSyncError::io("list destination", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| MediaSyncError::io("list destination", dir, e))?;
        let path = entry.path();
        // Symlinks are removed as links, never followed.
        let is_dir = entry
            .file_type()
            .map_err(|e| MediaSyncError::io("inspect", &path, e))?
            .is_dir();

        if is_dir {
            fs::remove_dir_all(&path).map_err(|e| MediaSyncError::io("remove directory", &path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| MediaSyncError::io("remove file", &path, e))?;
        }
    }
    Ok(())
}

fn copy_planned(plan: &SyncPlan, destination: &Path, out: &mut dyn Write) -> Result<CopyResult> {
    let total = plan.len();
    let mut result = CopyResult {
        destination: destination.to_path_buf(),
        outcomes: Vec::with_capacity(total),
    };

    for item in &plan.items {
        writeln!(
            out,
            "[{}/{}] Copying {} to {}",
            item.index,
            total,
            item.source.display(),
            item.destination.display()
        )?;

        let status = if item.source.exists() {
            copy_contents(&item.source, &item.destination)?;
            CopyStatus::Copied
        } else {
            tracing::debug!("Skipping missing source {}", item.source.display());
            writeln!(out, "Warning: File not found: {}", item.source.display())?;
            CopyStatus::Missing
        };

        result.outcomes.push(CopyOutcome {
            index: item.index,
            source: item.source.clone(),
            destination: item.destination.clone(),
            status,
        });
    }

    Ok(result)
}

/// Copy file data only; the new file gets default permissions and times.
fn copy_contents(source: &Path, destination: &Path) -> Result<()> {
    let mut reader = File::open(source).map_err(|e| MediaSyncError::io("open", source, e))?;
    let mut writer =
        File::create(destination).map_err(|e| MediaSyncError::io("create", destination, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| MediaSyncError::io("copy", destination, e))?;
    Ok(())
}

/// Touch copied files last-to-first, pausing `delay` after each, so the
/// first file in playback order ends up with the newest timestamp.
pub fn touch_newest_first(result: &CopyResult, delay: Duration, out: &mut dyn Write) -> Result<()> {
    let total = result.copied_count();

    for (i, outcome) in result.copied().rev().enumerate() {
        writeln!(out, "[{}/{}] Touching {}", i + 1, total, outcome.destination.display())?;
        touch(&outcome.destination)?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    writeln!(out, "Finished touching files")?;
    Ok(())
}

fn touch(path: &Path) -> Result<()> {
    let now = SystemTime::now();
    let file = File::options()
        .write(true)
        .open(path)
        .map_err(|e| MediaSyncError::io("open for touch", path, e))?;
    file.set_times(FileTimes::new().set_accessed(now).set_modified(now))
        .map_err(|e| MediaSyncError::io("touch", path, e))
}
