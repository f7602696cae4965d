use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

/// Local settings document, stored as JSON.
///
/// A missing file is not an error: every lookup then yields `None` and the
/// caller decides which values the run actually requires.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plex_url: Option<String>,

    #[serde(default)]
    pub plex_token: Option<String>,

    #[serde(default)]
    pub music_lib_section_name: Option<String>,

    /// Number of days a playlist file may be old and still be considered for
    /// an update. 0 means it has to have been modified today.
    #[serde(default)]
    pub sync_days_margin: i64,

    #[serde(default)]
    pub force_sync_all_playlists: bool,

    /// Storage volume identifier of the playback device.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Where the device storage is mounted on this machine.
    #[serde(default)]
    pub device_storage_path: Option<String>,

    #[serde(default)]
    pub device_music_relative_root_path: Option<String>,

    #[serde(default)]
    pub device_playlists_relative_root_path: Option<String>,
}

impl Config {
    /// Load config from a JSON file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            log::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path.
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("plex-playlist-sync").join("config.json"))
    }

    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Local directory the authored playlists live under.
    pub fn local_playlists_dir(&self) -> Option<PathBuf> {
        let storage = self.device_storage_path.as_ref()?;
        let relative = self.device_playlists_relative_root_path.as_ref()?;
        Some(Path::new(storage).join(relative))
    }

    /// Root of the device's internal storage as the Plex server sees it.
    pub fn device_storage_root(&self) -> Option<String> {
        self.device_id.as_ref().map(|id| format!("/storage/{id}/"))
    }

    /// Absolute music directory on the device.
    pub fn device_music_dir(&self) -> Option<String> {
        Some(format!(
            "{}{}",
            self.device_storage_root()?,
            self.device_music_relative_root_path.as_ref()?
        ))
    }

    /// Absolute playlists directory on the device.
    pub fn device_playlists_dir(&self) -> Option<String> {
        Some(format!(
            "{}{}",
            self.device_storage_root()?,
            self.device_playlists_relative_root_path.as_ref()?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("absent.json")).unwrap();
        assert!(config.plex_url.is_none());
        assert_eq!(config.sync_days_margin, 0);
        assert!(!config.force_sync_all_playlists);
        assert!(config.local_playlists_dir().is_none());
    }

    #[test]
    fn parses_a_full_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "plex_url": "https://192.168.1.10:32400",
                "plex_token": "secret",
                "music_lib_section_name": "Music",
                "sync_days_margin": 30,
                "force_sync_all_playlists": false,
                "device_id": "XXXX-XXXX",
                "device_storage_path": "/mnt/shield/",
                "device_music_relative_root_path": "Music/",
                "device_playlists_relative_root_path": "Music/Playlists/"
            }"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.plex_url.as_deref(), Some("https://192.168.1.10:32400"));
        assert_eq!(config.sync_days_margin, 30);
        assert_eq!(
            config.local_playlists_dir(),
            Some(PathBuf::from("/mnt/shield/Music/Playlists/"))
        );
        assert_eq!(
            config.device_music_dir().as_deref(),
            Some("/storage/XXXX-XXXX/Music/")
        );
        assert_eq!(
            config.device_playlists_dir().as_deref(),
            Some("/storage/XXXX-XXXX/Music/Playlists/")
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"plex_url": "http://x", "left_over_key": 1}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.plex_url.as_deref(), Some("http://x"));
    }
}
