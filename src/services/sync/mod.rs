pub mod convert;
pub mod indexer;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use color_eyre::eyre::{OptionExt, Result};
use url::Url;

use crate::plex_rs::sections::PlexLibrarySection;
use crate::ports::plex::PlexClient;
use convert::{PathRewriteRule, rewrite_playlist};
use indexer::index_local_playlists;

/// Sub-directory of the playlists root holding the authored playlists.
pub const SOURCE_SUBDIR: &str = "Latest";
/// Sub-directory receiving the rewritten copies.
pub const CONVERTED_SUBDIR: &str = "Converted";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{path} does not exist or is not a directory")]
    DirectoryNotFound { path: PathBuf },
    #[error("{path} does not contain any playlist files")]
    EmptyDirectory { path: PathBuf },
    #[error("{path} does not exist or is not a file")]
    PlaylistFileNotFound { path: PathBuf },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The three disjoint outcomes of a diff, each mapping a playlist name to its
/// sub-folder label ("" for top level; remote-only names carry no folder).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_create: BTreeMap<String, String>,
    pub to_update: BTreeMap<String, String>,
    pub to_remove: BTreeMap<String, String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }
}

/// Compare the authored playlists under `source_root` against the titles Plex
/// currently has.
///
/// - Local-only names go to `to_create`, remote-only titles to `to_remove`.
/// - A name present on both sides becomes an update only when `force_sync` is
///   set or the file's modification date is at most `sync_days_margin` whole
///   days old (0 means it has to have been modified today). Older matches are
///   left untouched.
///
/// A missing or empty source directory fails the whole diff; no partial plan
/// is produced.
pub fn diff_playlists(
    source_root: &Path,
    remote_titles: &[String],
    force_sync: bool,
    sync_days_margin: i64,
) -> Result<SyncPlan, SyncError> {
    let local = index_local_playlists(source_root)?;

    let mut plan = SyncPlan::default();

    // In Plex but no longer authored locally.
    for title in remote_titles {
        if !local.contains_key(title) {
            plan.to_remove.insert(title.clone(), String::new());
        }
    }

    let today = Local::now().date_naive();
    for (name, folder) in &local {
        if !remote_titles.iter().any(|t| t == name) {
            plan.to_create.insert(name.clone(), folder.clone());
            continue;
        }

        let path = playlist_path(source_root, folder, name);
        let modified: DateTime<Local> = std::fs::metadata(&path)?.modified()?.into();
        let days_since_update = today
            .signed_duration_since(modified.date_naive())
            .num_days();
        if force_sync || days_since_update <= sync_days_margin {
            plan.to_update.insert(name.clone(), folder.clone());
        }
    }

    Ok(plan)
}

/// `root/folder/name.m3u`, with the folder segment omitted at top level.
fn playlist_path(root: &Path, folder: &str, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    if !folder.is_empty() {
        path.push(folder);
    }
    path.push(format!("{name}.m3u"));
    path
}

/// Forward-slash path of a converted playlist as the Plex server sees it.
/// The server runs on the device, so this never goes through local `Path`
/// handling.
fn device_playlist_path(device_converted_dir: &str, folder: &str, name: &str) -> String {
    let base = device_converted_dir.trim_end_matches('/');
    if folder.is_empty() {
        format!("{base}/{name}.m3u")
    } else {
        format!("{base}/{folder}/{name}.m3u")
    }
}

/// The local source and converted roots plus the device-visible converted
/// root. The local converted tree and the device path point at the same
/// files; the device mounts the storage the converted tree is written to.
#[derive(Debug, Clone)]
pub struct SyncDirs {
    pub source_root: PathBuf,
    pub converted_root: PathBuf,
    pub device_converted_dir: String,
}

impl SyncDirs {
    pub fn new(playlists_dir: &Path, device_playlists_dir: &str) -> Self {
        Self {
            source_root: playlists_dir.join(SOURCE_SUBDIR),
            converted_root: playlists_dir.join(CONVERTED_SUBDIR),
            device_converted_dir: format!(
                "{}/{}",
                device_playlists_dir.trim_end_matches('/'),
                CONVERTED_SUBDIR
            ),
        }
    }
}

/// Applies a `SyncPlan` against a Plex server through the `PlexClient` port.
pub struct SyncService<C: PlexClient> {
    client: C,
    server_url: Url,
    token: String,
}

impl<C: PlexClient> SyncService<C> {
    pub fn new(client: C, server_url: Url, token: String) -> Self {
        Self {
            client,
            server_url,
            token,
        }
    }

    /// Look up the configured music library section by title.
    pub async fn resolve_section(&self, name: &str) -> Result<PlexLibrarySection> {
        let sections = self
            .client
            .get_library_sections(&self.server_url, &self.token)
            .await?;
        sections
            .into_iter()
            .find(|s| s.title == name)
            .ok_or_eyre(format!("Music library section \"{name}\" not found"))
    }

    /// Titles of the audio playlists Plex currently has in the section.
    pub async fn remote_playlist_titles(&self, section_id: &str) -> Result<Vec<String>> {
        let playlists = self
            .client
            .get_audio_playlists(&self.server_url, &self.token, section_id)
            .await?;
        Ok(playlists.into_iter().map(|p| p.title).collect())
    }

    /// Apply a plan: removes, then updates (delete and recreate), then creates.
    ///
    /// Plex cannot replace a playlist in place, so an update deletes the stale
    /// playlist before uploading the fresh copy under the same title. There is
    /// no rollback if the upload fails after the deletion succeeded; the next
    /// run recreates the playlist from the same diff.
    pub async fn apply(
        &self,
        section_id: &str,
        plan: &SyncPlan,
        dirs: &SyncDirs,
        rule: &PathRewriteRule,
    ) -> Result<()> {
        log::info!(
            "Deleting playlists: {:?}",
            plan.to_remove.keys().collect::<Vec<_>>()
        );
        self.delete_playlists(&plan.to_remove).await?;

        log::info!(
            "Updating playlists: {:?}",
            plan.to_update.keys().collect::<Vec<_>>()
        );
        self.delete_playlists(&plan.to_update).await?;
        self.create_playlists(section_id, &plan.to_update, dirs, rule)
            .await?;

        log::info!(
            "Creating playlists: {:?}",
            plan.to_create.keys().collect::<Vec<_>>()
        );
        self.create_playlists(section_id, &plan.to_create, dirs, rule)
            .await?;

        Ok(())
    }

    /// Delete each named playlist. A title Plex no longer has is only worth a
    /// warning; any other remote failure aborts the run.
    async fn delete_playlists(&self, playlists: &BTreeMap<String, String>) -> Result<()> {
        for name in playlists.keys() {
            match self
                .client
                .find_playlist_by_title(&self.server_url, &self.token, name)
                .await?
            {
                Some(playlist) => {
                    log::info!("Requesting the deletion of playlist: {name}");
                    self.client
                        .delete_playlist(&self.server_url, &self.token, &playlist.rating_key)
                        .await?;
                }
                None => log::warn!("Could not find playlist: {name}"),
            }
        }
        Ok(())
    }

    /// Rewrite each playlist into the converted tree (mirroring its folder),
    /// then have Plex build a playlist from the device-visible copy.
    async fn create_playlists(
        &self,
        section_id: &str,
        playlists: &BTreeMap<String, String>,
        dirs: &SyncDirs,
        rule: &PathRewriteRule,
    ) -> Result<()> {
        for (name, folder) in playlists {
            let source = playlist_path(&dirs.source_root, folder, name);
            let target = playlist_path(&dirs.converted_root, folder, name);
            log::debug!(
                "Converting the playlist {} to {}",
                source.display(),
                target.display()
            );
            rewrite_playlist(&source, &target, rule)?;

            let device_path = device_playlist_path(&dirs.device_converted_dir, folder, name);
            log::info!("Requesting the creation of playlist: {device_path}");
            self.client
                .upload_playlist(&self.server_url, &self.token, section_id, &device_path)
                .await?;
        }
        Ok(())
    }
}
