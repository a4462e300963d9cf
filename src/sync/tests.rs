use std::cell::Cell;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::tempdir;

use super::plan::{SyncPlan, destination_name, number_width};
use super::*;
use crate::error::{MediaSyncError, Result};
use crate::playlist::ResolvedFileList;

#[derive(Default)]
struct RecordingFlush {
    calls: Cell<usize>,
    output: FlushOutput,
}

impl FilesystemFlush for RecordingFlush {
    fn flush(&self) -> Result<FlushOutput> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.output.clone())
    }
}

struct FailingFlush;

impl FilesystemFlush for FailingFlush {
    fn flush(&self) -> Result<FlushOutput> {
        Err(MediaSyncError::SyncCommand {
            command: "sudo sync".into(),
            status: "exit status: 1".into(),
            stderr: "no tty".into(),
        })
    }
}

fn quick() -> SyncOptions {
    SyncOptions {
        touch_delay: Duration::ZERO,
        ..SyncOptions::default()
    }
}

fn library(dir: &Path, names: &[&str]) -> ResolvedFileList {
    names
        .iter()
        .map(|name| {
            let p = dir.join(name);
            fs::write(&p, name.as_bytes()).unwrap();
            p.to_string_lossy().into_owned()
        })
        .collect()
}

fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn number_width_follows_total_count() {
    assert_eq!(number_width(0), 1);
    assert_eq!(number_width(1), 1);
    assert_eq!(number_width(9), 1);
    assert_eq!(number_width(10), 2);
    assert_eq!(number_width(99), 2);
    assert_eq!(number_width(100), 3);
    assert_eq!(number_width(999), 3);
    assert_eq!(number_width(1_000), 4);
    assert_eq!(number_width(9_999), 4);
    assert_eq!(number_width(10_000), 5);
    assert_eq!(number_width(99_999), 5);
    assert_eq!(number_width(100_000), 9);
}

#[test]
fn generated_names_sort_in_numeric_order() {
    for total in [1usize, 9, 10, 42, 100, 1_000, 10_000, 99_999] {
        let width = number_width(total);
        let names: Vec<String> = (1..=total)
            .map(|i| destination_name(i, width, Path::new("/m/song.mp3")))
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "total {total}");
    }
}

#[test]
fn destination_name_uses_basename() {
    assert_eq!(
        destination_name(7, 3, Path::new("/music/Artist/Track.flac")),
        "007 - Track.flac"
    );
    assert_eq!(destination_name(12, 2, Path::new("plain.mp3")), "12 - plain.mp3");
}

#[test]
fn plan_numbers_from_one_with_shared_width() {
    let files: ResolvedFileList = (0..12).map(|i| format!("/m/{i}.mp3")).collect();
    let plan = SyncPlan::new(&files, Path::new("/out"));

    assert_eq!(plan.width, 2);
    assert_eq!(plan.items[0].index, 1);
    assert_eq!(plan.items[0].destination, Path::new("/out/01 - 0.mp3"));
    assert_eq!(plan.items[11].destination, Path::new("/out/12 - 11.mp3"));
}

#[test]
fn empty_playlist_is_not_found_and_leaves_destination_alone() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("out");
    let flush = RecordingFlush::default();
    let mut out: Vec<u8> = Vec::new();

    let outcome = sync_playlist(
        &ResolvedFileList::default(),
        "Nope",
        &dest,
        &quick(),
        &flush,
        &mut out,
    )
    .unwrap();

    assert!(matches!(outcome, SyncOutcome::PlaylistNotFound));
    assert!(!dest.exists());
    assert_eq!(flush.calls.get(), 0);
    assert!(out.is_empty());
}

#[test]
fn copies_in_order_with_numbered_names() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let files = library(src.path(), &["b.mp3", "a.mp3", "c.mp3"]);
    let flush = RecordingFlush::default();
    let mut out: Vec<u8> = Vec::new();

    let outcome = sync_playlist(&files, "Mix", dest.path(), &quick(), &flush, &mut out).unwrap();

    let SyncOutcome::Synced(result) = outcome else {
        panic!("expected a sync");
    };
    assert_eq!(result.copied_count(), 3);
    assert_eq!(result.missing_count(), 0);
    assert_eq!(
        dir_names(dest.path()),
        vec!["1 - b.mp3", "2 - a.mp3", "3 - c.mp3"]
    );
    assert_eq!(fs::read(dest.path().join("2 - a.mp3")).unwrap(), b"a.mp3");
    assert_eq!(flush.calls.get(), 1);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Copying 3 files to"));
    assert!(text.contains("[1/3] Copying"));
    assert!(text.contains("[3/3] Touching"));
    assert!(text.contains("Finished touching files"));
    assert!(text.contains("Performing sync..."));
    assert!(text.contains("Copied 3 files to"));
}

#[test]
fn missing_source_is_skipped_without_aborting() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    library(src.path(), &["one.mp3", "three.mp3"]);
    let files: ResolvedFileList = ["one.mp3", "two.mp3", "three.mp3"]
        .iter()
        .map(|name| src.path().join(name).to_string_lossy().into_owned())
        .collect();
    let mut out: Vec<u8> = Vec::new();

    let outcome = sync_playlist(&files, "Mix", dest.path(), &quick(), &NoFlush, &mut out).unwrap();

    let SyncOutcome::Synced(result) = outcome else {
        panic!("expected a sync");
    };
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(result.outcomes[1].status, CopyStatus::Missing);
    assert_eq!(result.copied_count(), 2);
    assert_eq!(dir_names(dest.path()), vec!["1 - one.mp3", "3 - three.mp3"]);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Warning: File not found:").count(), 1);
    assert!(text.contains("two.mp3"));
    assert!(text.contains("[3/3] Copying"));
    assert!(text.contains("[2/2] Touching"));
    assert!(!text.contains("Performing sync..."));
    assert!(text.contains("Copied 2 files to"));
}

/// Collects formatted `tracing` output for one test.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn missing_source_logs_no_warning_at_default_level() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let files: ResolvedFileList = std::iter::once(src.path().join("gone.mp3"))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let mut out: Vec<u8> = Vec::new();
    tracing::subscriber::with_default(subscriber, || {
        sync_playlist(&files, "Mix", dest.path(), &quick(), &NoFlush, &mut out).unwrap();
    });

    assert!(log.0.lock().unwrap().is_empty());
    assert_eq!(
        String::from_utf8(out).unwrap().matches("Warning: File not found:").count(),
        1
    );
}

#[test]
fn remove_existing_clears_children_but_keeps_directory() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(dest.path().join("old.mp3"), b"old").unwrap();
    fs::create_dir_all(dest.path().join("nested/deeper")).unwrap();
    fs::write(dest.path().join("nested/deeper/x.mp3"), b"x").unwrap();

    let files = library(src.path(), &["new.mp3"]);
    let options = SyncOptions {
        remove_existing: true,
        ..quick()
    };
    let mut out: Vec<u8> = Vec::new();

    sync_playlist(&files, "Mix", dest.path(), &options, &NoFlush, &mut out).unwrap();

    assert!(dest.path().is_dir());
    assert_eq!(dir_names(dest.path()), vec!["1 - new.mp3"]);
    assert!(String::from_utf8(out).unwrap().contains("Recursively deleted"));
}

#[test]
fn without_remove_existing_old_files_stay() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(dest.path().join("keep.txt"), b"keep").unwrap();
    let files = library(src.path(), &["new.mp3"]);

    sync_playlist(&files, "Mix", dest.path(), &quick(), &NoFlush, &mut std::io::sink()).unwrap();

    assert_eq!(dir_names(dest.path()), vec!["1 - new.mp3", "keep.txt"]);
}

#[test]
fn playlist_subdirectory_is_created_with_parents() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let base = dest.path().join("usb/music");
    let files = library(src.path(), &["a.mp3"]);
    let options = SyncOptions {
        use_playlist_dir: true,
        ..quick()
    };

    sync_playlist(&files, "Latest", &base, &options, &NoFlush, &mut std::io::sink()).unwrap();

    assert!(base.join("Latest").join("1 - a.mp3").is_file());
}

#[test]
fn flush_output_is_reported() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let files = library(src.path(), &["a.mp3"]);
    let flush = RecordingFlush {
        calls: Cell::new(0),
        output: FlushOutput {
            stdout: "flushed\n".into(),
            stderr: String::new(),
        },
    };
    let mut out: Vec<u8> = Vec::new();

    sync_playlist(&files, "Mix", dest.path(), &quick(), &flush, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("stdout: flushed"));
    assert!(!text.contains("stderr:"));
}

#[test]
fn failed_flush_is_fatal_but_keeps_copies() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let files = library(src.path(), &["a.mp3"]);

    let err = sync_playlist(&files, "Mix", dest.path(), &quick(), &FailingFlush, &mut std::io::sink())
        .unwrap_err();

    assert!(matches!(err, MediaSyncError::SyncCommand { .. }));
    assert!(dest.path().join("1 - a.mp3").is_file());
}

#[test]
fn touching_leaves_first_file_newest() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let files = library(src.path(), &["one.mp3", "two.mp3", "three.mp3"]);
    let options = SyncOptions {
        touch_delay: TOUCH_DELAY,
        ..SyncOptions::default()
    };

    let outcome = sync_playlist(&files, "Mix", dest.path(), &options, &NoFlush, &mut std::io::sink())
        .unwrap();
    let SyncOutcome::Synced(result) = outcome else {
        panic!("expected a sync");
    };

    let mtimes: Vec<_> = result
        .copied()
        .map(|o| fs::metadata(&o.destination).unwrap().modified().unwrap())
        .collect();
    assert!(mtimes[0] > mtimes[1]);
    assert!(mtimes[1] > mtimes[2]);
}

#[test]
fn touch_order_is_reverse_copy_order() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let files = library(src.path(), &["one.mp3", "two.mp3", "three.mp3"]);
    let mut out: Vec<u8> = Vec::new();

    sync_playlist(&files, "Mix", dest.path(), &quick(), &NoFlush, &mut out).unwrap();

    let touched: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .filter(|l| l.contains("Touching"))
        .map(|l| l.rsplit('/').next().unwrap().to_string())
        .collect();
    assert_eq!(touched, vec!["3 - three.mp3", "2 - two.mp3", "1 - one.mp3"]);
}

#[test]
fn command_flush_reports_non_zero_exit() {
    if cfg!(windows) {
        return;
    }
    let err = CommandFlush::new(vec!["false".into()]).flush().unwrap_err();
    assert!(matches!(err, MediaSyncError::SyncCommand { ref command, .. } if command == "false"));

    let ok = CommandFlush::new(vec!["echo".into(), "done".into()]).flush().unwrap();
    assert_eq!(ok.stdout.trim(), "done");
}

#[test]
fn platform_flush_honours_skip() {
    assert!(!platform_flush(vec!["sync".into()], true).is_enabled());
    assert_eq!(platform_flush(vec!["sync".into()], false).is_enabled(), !cfg!(windows));
}
