use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mediasync", author, version, about, long_about = None)]
pub struct Cli {
    /// Print diagnostics (raw playlist index, playlist files) to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read playlists from. Unset options fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Media source [possible values: winamp]
    #[arg(short, long)]
    pub source: Option<String>,

    /// Data directory; `~` and environment variables are expanded
    #[arg(long)]
    pub directory: Option<String>,

    /// Encoding of the playlist index
    #[arg(long)]
    pub encoding: Option<String>,

    /// Number of characters to skip at the start of the playlist index
    #[arg(long = "dataoffset")]
    pub data_offset: Option<usize>,

    /// Line separator of playlist files (`\n`, `\r\n` escapes allowed)
    #[arg(long = "lineseparator")]
    pub line_separator: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List playlists
    #[command(name = "listplaylists")]
    ListPlaylists {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the files of a playlist
    #[command(name = "listplaylist")]
    ListPlaylist {
        #[command(flatten)]
        source: SourceArgs,

        /// Playlist name
        playlist_name: String,
    },
    /// Copy the files of a playlist to a directory in playback order
    #[command(name = "syncplaylist")]
    SyncPlaylist {
        #[command(flatten)]
        source: SourceArgs,

        /// Remove the existing contents of the destination first
        #[arg(short = 'r', long = "rmdir")]
        remove_existing: bool,

        /// Use the playlist name as a destination subdirectory
        #[arg(short = 'n', long = "useplaylistnamedir")]
        use_playlist_dir: bool,

        /// Do not flush filesystem buffers after copying
        #[arg(short = 'q', long = "nosync")]
        no_sync: bool,

        /// Playlist name
        playlist_name: String,

        /// Destination directory
        destination: PathBuf,
    },
    /// Inspect the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the path to the config file
    Path,
    /// Print the default configuration as TOML
    Default,
}
