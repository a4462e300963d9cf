use crate::cli::SourceArgs;
use crate::config::Settings;
use crate::error::{MediaSyncError, Result};
use crate::paths::expand_directory;
use crate::source::{MediaSource, SourceOptions};

/// Merge command-line source flags over the loaded settings.
pub fn source_options(args: &SourceArgs, settings: &Settings) -> Result<(MediaSource, SourceOptions)> {
    let source: MediaSource = match args.source.as_deref() {
        Some(name) => name.parse()?,
        None => settings.source.default.ok_or(MediaSyncError::MissingSource)?,
    };

    let options = match source {
        MediaSource::Winamp => {
            let winamp = &settings.winamp;
            SourceOptions {
                directory: expand_directory(args.directory.as_deref().unwrap_or(&winamp.directory)),
                encoding: args.encoding.as_deref().unwrap_or(&winamp.encoding).parse()?,
                data_offset: args.data_offset.unwrap_or(winamp.data_offset),
                line_separator: unescape_separator(
                    args.line_separator.as_deref().unwrap_or(&winamp.line_separator),
                ),
            }
        }
    };

    if options.line_separator.is_empty() {
        return Err(MediaSyncError::InvalidConfig(
            "line separator must not be empty".to_string(),
        ));
    }

    tracing::debug!("Using {source} source with {options:?}");
    Ok((source, options))
}

/// Turn `\n`, `\r`, `\t` and `\\` into the characters they name.
pub fn unescape_separator(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
