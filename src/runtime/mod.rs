use std::io::{self, Write};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::Context;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::{Settings, resolve_config_path};
use crate::logging::init_logging;
use crate::sync::{SyncOptions, TOUCH_DELAY, platform_flush};

mod commands;
mod options;
mod settings;


pub fn run() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.debug)?;

    let settings = settings::load_settings();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::ListPlaylists { source } => {
            let (kind, opts) = options::source_options(&source, &settings)?;
            let reader = kind.open(opts);
            commands::list_playlists(reader.as_ref(), &mut out)
                .wrap_err("Failed to list playlists")?;
        }
        Commands::ListPlaylist {
            source,
            playlist_name,
        } => {
            let (kind, opts) = options::source_options(&source, &settings)?;
            let reader = kind.open(opts);
            commands::list_playlist(reader.as_ref(), &playlist_name, &mut out)
                .wrap_err_with(|| format!("Failed to list playlist {playlist_name}"))?;
        }
        Commands::SyncPlaylist {
            source,
            remove_existing,
            use_playlist_dir,
            no_sync,
            playlist_name,
            destination,
        } => {
            let (kind, opts) = options::source_options(&source, &settings)?;
            let reader = kind.open(opts);
            let sync_options = SyncOptions {
                use_playlist_dir,
                remove_existing,
                touch_delay: TOUCH_DELAY,
            };
            let flush = platform_flush(settings.sync.command.clone(), no_sync);

            commands::sync_playlist(
                reader.as_ref(),
                &playlist_name,
                &destination,
                &sync_options,
                flush.as_ref(),
                &mut out,
            )
            .wrap_err_with(|| {
                format!(
                    "Failed to sync playlist {playlist_name} to {}",
                    destination.display()
                )
            })?;
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::Path => match resolve_config_path() {
                Some(path) => writeln!(out, "{}", path.display())?,
                None => writeln!(out, "No default config path found")?,
            },
            ConfigCommands::Default => {
                let text = Settings::default_toml().wrap_err("Failed to render default config")?;
                write!(out, "{text}")?;
            }
        },
    }

    out.flush()?;
    Ok(())
}
