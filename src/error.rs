use std::path::PathBuf;

/// Failures raised by the playlist pipeline.
///
/// Everything here is fatal for the running action. The two recoverable
/// situations (a playlist that cannot be found, a missing track file) are
/// reported as ordinary output and never become an error value.
#[derive(Debug, thiserror::Error)]
pub enum MediaSyncError {
    #[error("Unsupported media source: {0}")]
    UnsupportedSource(String),

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("No media source selected; pass --source or set source.default in the config")]
    MissingSource,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Playlist index not found: {}", .path.display())]
    IndexNotFound { path: PathBuf },

    #[error("I/O error during {operation} on {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {} as {encoding}", .path.display())]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("Malformed playlist index {} at position {position}: {message}", .path.display())]
    Xml {
        path: PathBuf,
        position: u64,
        message: String,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Sync command `{command}` failed with {status}{}", stderr_suffix(.stderr))]
    SyncCommand {
        command: String,
        status: String,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl MediaSyncError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = MediaSyncError> = std::result::Result<T, E>;
