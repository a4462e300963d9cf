//! Media sources: where playlist catalogs and playlist files come from.
//!
//! A `MediaSource` is chosen once per invocation and opened into a
//! `PlaylistSource`, which reads the catalog and resolves playlists.

mod winamp;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::error::{MediaSyncError, Result};
use crate::playlist::{PlaylistCatalog, ResolvedFileList};

pub use winamp::WinampSource;

/// Media players this tool knows how to read.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    Winamp,
}

impl MediaSource {
    pub const ALL: &'static [MediaSource] = &[MediaSource::Winamp];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaSource::Winamp => "winamp",
        }
    }

    /// Build the reader for this source.
    pub fn open(self, options: SourceOptions) -> Box<dyn PlaylistSource> {
        match self {
            MediaSource::Winamp => Box::new(WinampSource::new(options)),
        }
    }
}

impl FromStr for MediaSource {
    type Err = MediaSyncError;

    fn from_str(s: &str) -> Result<Self> {
        MediaSource::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MediaSyncError::UnsupportedSource(s.to_string()))
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective options for reading a source, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Data directory with `~` and environment variables already expanded.
    pub directory: PathBuf,
    pub encoding: TextEncoding,
    pub data_offset: usize,
    pub line_separator: String,
}

/// Reads a player's playlist index and expands playlists into file lists.
pub trait PlaylistSource {
    /// Name of the implicit playlist that the index does not enumerate, if any.
    fn default_playlist_name(&self) -> Option<&'static str> {
        None
    }

    /// Read the index into an immutable catalog.
    fn read_catalog(&self) -> Result<PlaylistCatalog>;

    /// Expand the playlist titled `name` into its ordered file list.
    ///
    /// An unknown title yields an empty list rather than an error.
    fn resolve_playlist(&self, catalog: &PlaylistCatalog, name: &str) -> Result<ResolvedFileList>;
}
