use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::encoding::TextEncoding;
use crate::error::{MediaSyncError, Result};
use crate::playlist::{CatalogEntry, PlaylistCatalog, ResolvedFileList, parse_playlist_text};

use super::{PlaylistSource, SourceOptions};

/// Media library playlists directory, relative to the Winamp data directory.
const PLAYLISTS_DIR: &str = "Plugins/ml/playlists";
const INDEX_FILE: &str = "playlists.xml";

/// The "now playing" list, which `playlists.xml` does not list.
pub const DEFAULT_PLAYLIST_NAME: &str = "Winamp Playlist";
const DEFAULT_PLAYLIST_FILE: &str = "winamp.m3u8";

/// Winamp media library reader.
///
/// The catalog is `Plugins/ml/playlists/playlists.xml`, read with the
/// configured encoding after skipping a short non-XML header. Playlist files
/// are always UTF-8 `.m3u8`.
pub struct WinampSource {
    options: SourceOptions,
}

impl WinampSource {
    pub fn new(options: SourceOptions) -> Self {
        Self { options }
    }

    fn index_path(&self) -> PathBuf {
        self.options.directory.join(PLAYLISTS_DIR).join(INDEX_FILE)
    }

    fn read_playlist_file(&self, path: &Path) -> Result<ResolvedFileList> {
        tracing::debug!("Found playlist file {}", path.display());

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Playlist file is missing: {}", path.display());
                return Ok(ResolvedFileList::default());
            }
            Err(e) => return Err(MediaSyncError::io("read playlist", path, e)),
        };
        let text = TextEncoding::Utf8.decode(bytes, path)?;
        tracing::debug!("Playlist contents:\n{text}");

        Ok(parse_playlist_text(&text, &self.options.line_separator))
    }
}

impl PlaylistSource for WinampSource {
    fn default_playlist_name(&self) -> Option<&'static str> {
        Some(DEFAULT_PLAYLIST_NAME)
    }

    fn read_catalog(&self) -> Result<PlaylistCatalog> {
        let path = self.index_path();
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MediaSyncError::IndexNotFound { path: path.clone() },
            _ => MediaSyncError::io("read playlist index", &path, e),
        })?;

        let text = self.options.encoding.decode(bytes, &path)?;
        let xml = skip_chars(&text, self.options.data_offset);
        tracing::debug!("Playlist index {}:\n{xml}", path.display());

        parse_catalog_xml(xml, &path)
    }

    fn resolve_playlist(&self, catalog: &PlaylistCatalog, name: &str) -> Result<ResolvedFileList> {
        if name == DEFAULT_PLAYLIST_NAME {
            let path = self.options.directory.join(DEFAULT_PLAYLIST_FILE);
            return self.read_playlist_file(&path);
        }

        match catalog.find(name) {
            Some(entry) => {
                let path = self
                    .options
                    .directory
                    .join(PLAYLISTS_DIR)
                    .join(&entry.locator);
                self.read_playlist_file(&path)
            }
            None => Ok(ResolvedFileList::default()),
        }
    }
}

/// Drop the first `count` characters (not bytes) of `text`.
fn skip_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}

/// Collect every `<playlist>` element of the index, wherever it is nested.
///
/// The whole document must be well formed: one root element, matching end
/// tags and no text outside the root.
fn parse_catalog_xml(xml: &str, path: &Path) -> Result<PlaylistCatalog> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let malformed = |position: u64, message: String| MediaSyncError::Xml {
        path: path.to_path_buf(),
        position,
        message,
    };

    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| malformed(reader.buffer_position() as u64, e.to_string()))?;

        match event {
            Event::Start(e) | Event::Empty(e) if depth == 0 && seen_root => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                return Err(malformed(
                    position,
                    format!("element <{name}> after the document element"),
                ));
            }
            Event::Start(e) => {
                seen_root = true;
                depth += 1;
                if e.name().as_ref() == b"playlist" {
                    entries.push(catalog_entry(&e).map_err(|m| malformed(position, m))?);
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                if e.name().as_ref() == b"playlist" {
                    entries.push(catalog_entry(&e).map_err(|m| malformed(position, m))?);
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) if depth == 0 => {
                if !t.iter().all(|b| b.is_ascii_whitespace()) {
                    return Err(malformed(position, "text outside the document element".into()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(malformed(
            reader.buffer_position() as u64,
            "no document element".into(),
        ));
    }
    if depth != 0 {
        return Err(malformed(
            reader.buffer_position() as u64,
            "unexpected end of document".into(),
        ));
    }

    Ok(PlaylistCatalog::new(entries))
}

fn catalog_entry(element: &BytesStart<'_>) -> std::result::Result<CatalogEntry, String> {
    Ok(CatalogEntry {
        title: attribute(element, "title")?,
        locator: attribute(element, "filename")?,
    })
}

/// Unescaped attribute value; a missing attribute reads as an empty string.
fn attribute(element: &BytesStart<'_>, name: &str) -> std::result::Result<String, String> {
    match element.try_get_attribute(name).map_err(|e| e.to_string())? {
        Some(attr) => attr
            .unescape_value()
            .map(|v| v.into_owned())
            .map_err(|e| e.to_string()),
        None => Ok(String::new()),
    }
}
