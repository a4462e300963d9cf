use super::model::ResolvedFileList;

/// Drive prefix of the Windows library that is mounted at the host root.
const MOUNTED_DRIVE_PREFIX: &str = "Z:\\";

/// Marker written at the top of extended M3U files.
const EXTM3U_MARKER: &str = "#EXTM3U";

/// Map a path recorded by the player to one usable on this host.
///
/// Only `Z:\` paths are rewritten: the two-character drive is dropped and
/// backslashes become slashes (`Z:\Music\a.mp3` -> `/Music/a.mp3`). Anything
/// else is returned unchanged and is not checked for existence.
pub fn normalize_path(raw: &str) -> String {
    if raw.starts_with(MOUNTED_DRIVE_PREFIX) {
        raw[2..].replace('\\', "/")
    } else {
        raw.to_string()
    }
}

/// Whether a trimmed playlist line refers to a file.
///
/// The header marker is matched anywhere in the line, not only as a prefix:
/// a UTF-8 BOM survives trimming and would otherwise hide `#EXTM3U`.
fn is_entry_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#') && !line.contains(EXTM3U_MARKER)
}

/// Split playlist text on `separator` and keep the file entries, in order.
pub fn parse_playlist_text(text: &str, separator: &str) -> ResolvedFileList {
    text.split(separator)
        .map(str::trim)
        .filter(|line| is_entry_line(line))
        .map(normalize_path)
        .collect()
}
