use serde::{Deserialize, Serialize};

use crate::source::MediaSource;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/mediasync/config.toml` or `~/.config/mediasync/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags
/// 2) Environment variables (prefix `MEDIASYNC__`, `__` as nested separator;
///    `MEDIASYNC__SYNC__COMMAND` is split on spaces)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSelection,
    pub winamp: WinampSettings,
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSelection {
    /// Source used when `--source` is not given, e.g. `"winamp"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<MediaSource>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WinampSettings {
    /// Winamp data directory. `~` and `$VAR` / `${VAR}` are expanded.
    pub directory: String,
    /// Encoding of `Plugins/ml/playlists/playlists.xml`.
    pub encoding: String,
    /// Characters to drop from the start of the index before XML parsing.
    pub data_offset: usize,
    /// Separator used to split playlist files into entries.
    pub line_separator: String,
}

impl Default for WinampSettings {
    fn default() -> Self {
        Self {
            directory: "~/.wine/drive_c/users/${USER}/Application Data/Winamp/".to_string(),
            encoding: "ISO-8859-1".to_string(),
            data_offset: 2,
            line_separator: "\n".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Program and arguments run after copying to flush filesystem buffers.
    pub command: Vec<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            command: vec!["sudo".to_string(), "sync".to_string()],
        }
    }
}
