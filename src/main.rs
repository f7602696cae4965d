mod config;
mod logging;
mod plex_rs;
mod ports;
mod services;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{OptionExt, Result, WrapErr};
use url::Url;

use crate::{
    config::Config,
    logging::setup_logging,
    services::plex::PlexHttpAdapter,
    services::sync::{SyncDirs, SyncService, convert::PathRewriteRule, diff_playlists},
};

/// Upload locally authored playlists to Plex.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLEX_PLAYLIST_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// The Plex server URL
    #[arg(short = 'u', long)]
    plex_url: Option<String>,

    /// The Plex access token
    #[arg(short = 't', long, env = "PLEX_TOKEN")]
    plex_token: Option<String>,

    /// The Plex music library section name
    #[arg(short = 's', long)]
    section_name: Option<String>,

    /// The playlists directory path
    #[arg(short = 'd', long)]
    playlists_dir: Option<PathBuf>,

    /// Sync every matched playlist regardless of when it was last modified
    #[arg(short = 'f', long)]
    force_sync: bool,

    /// Console log level
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level
    #[arg(long, default_value = "debug")]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLEX_PLAYLIST_SYNC_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load plex-playlist-sync config")?;

    let plex_url = args
        .plex_url
        .or_else(|| config.plex_url.clone())
        .ok_or_eyre("No Plex URL configured (set plex_url in the config or pass --plex-url)")?;
    let server_url = Url::parse(&plex_url).wrap_err("Invalid Plex server URL")?;
    log::info!("Using Plex URL: {plex_url}");

    let plex_token = args
        .plex_token
        .or_else(|| config.plex_token.clone())
        .ok_or_eyre("No Plex token configured (set plex_token in the config or pass --plex-token)")?;

    let section_name = args
        .section_name
        .or_else(|| config.music_lib_section_name.clone())
        .ok_or_eyre(
            "No music library section configured (set music_lib_section_name in the config or pass --section-name)",
        )?;
    log::info!("Using Music Library Section Name: {section_name}");

    let playlists_dir = args
        .playlists_dir
        .or_else(|| config.local_playlists_dir())
        .ok_or_eyre(
            "No playlists directory configured (set the device storage paths in the config or pass --playlists-dir)",
        )?;
    log::info!("Using Playlists Directory: {}", playlists_dir.display());

    let force_sync = args.force_sync || config.force_sync_all_playlists;

    let device_music_dir = config
        .device_music_dir()
        .ok_or_eyre("No device music directory configured (set device_id and device_music_relative_root_path)")?;
    let device_playlists_dir = config.device_playlists_dir().ok_or_eyre(
        "No device playlists directory configured (set device_id and device_playlists_relative_root_path)",
    )?;

    // The server sits on the LAN with a self-signed certificate; skip
    // verification like the rest of the household tooling does.
    let http = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()?;

    let service = SyncService::new(PlexHttpAdapter::new(http), server_url, plex_token);

    let section = service.resolve_section(&section_name).await?;
    log::debug!(
        "Resolved library section \"{}\" (id {})",
        section.title,
        section.key
    );

    let dirs = SyncDirs::new(&playlists_dir, &device_playlists_dir);
    let rule = PathRewriteRule::new(&device_music_dir)?;

    let remote_titles = service.remote_playlist_titles(&section.key).await?;
    match diff_playlists(
        &dirs.source_root,
        &remote_titles,
        force_sync,
        config.sync_days_margin,
    ) {
        Ok(plan) if plan.is_empty() => log::info!("Nothing to sync"),
        Ok(plan) => {
            log::info!(
                "Playlists to create: {}, update: {}, remove: {}",
                plan.to_create.len(),
                plan.to_update.len(),
                plan.to_remove.len()
            );
            service.apply(&section.key, &plan, &dirs, &rule).await?;
        }
        Err(e) => log::error!("Failed to diff playlists: {e}"),
    }

    Ok(())
}
