use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::source::PlaylistSource;
use crate::sync::{self, FilesystemFlush, SyncOptions, SyncOutcome};

pub const PLAYLIST_NOT_FOUND: &str = "Error: playlist not found";

/// `listplaylists`: the implicit default playlist first, then the catalog.
pub fn list_playlists(source: &dyn PlaylistSource, out: &mut dyn Write) -> Result<()> {
    let catalog = source.read_catalog()?;
    tracing::debug!("Read {} playlists from the index", catalog.len());

    if let Some(name) = source.default_playlist_name() {
        writeln!(out, "{name}")?;
    }
    for title in catalog.titles() {
        writeln!(out, "{title}")?;
    }
    Ok(())
}

/// `listplaylist`: one resolved path per line.
pub fn list_playlist(source: &dyn PlaylistSource, playlist_name: &str, out: &mut dyn Write) -> Result<()> {
    let catalog = source.read_catalog()?;
    let files = source.resolve_playlist(&catalog, playlist_name)?;

    if files.is_empty() {
        writeln!(out, "{PLAYLIST_NOT_FOUND}")?;
        return Ok(());
    }
    for file in files.iter() {
        writeln!(out, "{file}")?;
    }
    Ok(())
}

/// `syncplaylist`: resolve, then copy into `destination`.
pub fn sync_playlist(
    source: &dyn PlaylistSource,
    playlist_name: &str,
    destination: &Path,
    options: &SyncOptions,
    flush: &dyn FilesystemFlush,
    out: &mut dyn Write,
) -> Result<()> {
    let catalog = source.read_catalog()?;
    let files = source.resolve_playlist(&catalog, playlist_name)?;

    match sync::sync_playlist(&files, playlist_name, destination, options, flush, out)? {
        SyncOutcome::PlaylistNotFound => writeln!(out, "{PLAYLIST_NOT_FOUND}")?,
        SyncOutcome::Synced(result) => {
            let missing = result.missing_count();
            if missing > 0 {
                tracing::info!(
                    "{missing} of {} playlist entries were missing from {}",
                    result.outcomes.len(),
                    result.destination.display()
                );
            }
        }
    }
    Ok(())
}
