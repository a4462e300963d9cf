use std::path::{Path, PathBuf};

use crate::playlist::ResolvedFileList;

/// Digits used for the numeric prefix of `total` generated names.
///
/// The width depends on the total count only, so every name in one batch
/// has the same prefix length and sorts in numeric order.
pub fn number_width(total: usize) -> usize {
    match total {
        0..10 => 1,
        10..100 => 2,
        100..1_000 => 3,
        1_000..10_000 => 4,
        10_000..100_000 => 5,
        _ => 9,
    }
}

/// `<index zero-padded to width> - <basename of source>`.
pub fn destination_name(index: usize, width: usize, source: &Path) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{index:0width$} - {base}")
}

/// One file to copy, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Destination names for a whole playlist.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub width: usize,
    pub items: Vec<PlannedCopy>,
}

impl SyncPlan {
    pub fn new(files: &ResolvedFileList, destination: &Path) -> Self {
        let width = number_width(files.len());
        let items = files
            .iter()
            .enumerate()
            .map(|(i, file)| {
                let index = i + 1;
                let source = PathBuf::from(file);
                let destination = destination.join(destination_name(index, width, &source));
                PlannedCopy {
                    index,
                    source,
                    destination,
                }
            })
            .collect();

        Self { width, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
