/// One named playlist as listed in a source's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    /// Source-specific reference to the playlist file (a filename for Winamp).
    pub locator: String,
}

/// Ordered list of playlists read from a source's index.
///
/// Titles are not required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistCatalog {
    entries: Vec<CatalogEntry>,
}

impl PlaylistCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    /// First entry whose title matches `title` exactly.
    pub fn find(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Ordered file references a playlist expands to.
///
/// An empty list means the playlist could not be found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFileList {
    files: Vec<String>,
}

impl ResolvedFileList {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }
}

impl FromIterator<String> for ResolvedFileList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
