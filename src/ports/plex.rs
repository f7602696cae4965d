use color_eyre::eyre::Result;
use url::Url;

use crate::plex_rs::playlist::PlexPlaylist;
use crate::plex_rs::sections::PlexLibrarySection;

/// Port trait wrapping the Plex API capabilities used by the sync logic.
///
/// Implementations live in `services::plex` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlexClient: Send + Sync {
    async fn get_library_sections(
        &self,
        server_url: &Url,
        token: &str,
    ) -> Result<Vec<PlexLibrarySection>>;

    async fn get_audio_playlists(
        &self,
        server_url: &Url,
        token: &str,
        section_id: &str,
    ) -> Result<Vec<PlexPlaylist>>;

    async fn find_playlist_by_title(
        &self,
        server_url: &Url,
        token: &str,
        title: &str,
    ) -> Result<Option<PlexPlaylist>>;

    async fn delete_playlist(&self, server_url: &Url, token: &str, rating_key: &str) -> Result<()>;

    async fn upload_playlist(
        &self,
        server_url: &Url,
        token: &str,
        section_id: &str,
        remote_path: &str,
    ) -> Result<()>;
}
