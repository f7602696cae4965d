use color_eyre::eyre::Result;
use reqwest::Client;
use url::Url;

use crate::plex_rs::playlist::{
    PlexPlaylist, delete_playlist, find_playlist_by_title, get_audio_playlists, upload_playlist,
};
use crate::plex_rs::sections::{PlexLibrarySection, get_library_sections};
use crate::ports::plex::PlexClient;

/// Production `PlexClient` backed by reqwest.
///
/// The caller supplies the HTTP client so connection settings (the server's
/// self-signed certificate in particular) are decided in one place.
pub struct PlexHttpAdapter {
    client: Client,
}

impl PlexHttpAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PlexClient for PlexHttpAdapter {
    async fn get_library_sections(
        &self,
        server_url: &Url,
        token: &str,
    ) -> Result<Vec<PlexLibrarySection>> {
        get_library_sections(&self.client, server_url, token).await
    }

    async fn get_audio_playlists(
        &self,
        server_url: &Url,
        token: &str,
        section_id: &str,
    ) -> Result<Vec<PlexPlaylist>> {
        get_audio_playlists(&self.client, server_url, token, section_id).await
    }

    async fn find_playlist_by_title(
        &self,
        server_url: &Url,
        token: &str,
        title: &str,
    ) -> Result<Option<PlexPlaylist>> {
        find_playlist_by_title(&self.client, server_url, token, title).await
    }

    async fn delete_playlist(&self, server_url: &Url, token: &str, rating_key: &str) -> Result<()> {
        delete_playlist(&self.client, server_url, token, rating_key).await
    }

    async fn upload_playlist(
        &self,
        server_url: &Url,
        token: &str,
        section_id: &str,
        remote_path: &str,
    ) -> Result<()> {
        upload_playlist(&self.client, server_url, token, section_id, remote_path).await
    }
}
