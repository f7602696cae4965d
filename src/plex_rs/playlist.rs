use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::plex_rs::PlexResponse;

/* ---------- Playlists ---------- */

#[derive(Debug, Clone, Deserialize)]
pub struct PlexPlaylist {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,

    pub title: String,

    #[serde(rename = "playlistType")]
    pub playlist_type: String,

    #[serde(default)]
    pub smart: Option<bool>,

    #[serde(rename = "leafCount", default)]
    pub leaf_count: Option<u32>,

    #[serde(default)]
    pub summary: Option<String>,
}

/// Fetch the audio playlists registered in a library section.
///
/// Endpoint
/// - `GET /playlists?playlistType=audio&sectionID={id}`
pub async fn get_audio_playlists(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    section_id: &str,
) -> Result<Vec<PlexPlaylist>> {
    let mut url = base_url.join("playlists")?;
    url.query_pairs_mut()
        .append_pair("playlistType", "audio")
        .append_pair("sectionID", section_id);

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .header("X-Plex-Token", user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexResponse<PlexPlaylist>>()
        .await
        .wrap_err("Failed to deserialize Plex playlists response")?;

    Ok(res.media_container.metadata)
}

/// Look up a single audio playlist by its exact title.
///
/// Plex has no title-lookup endpoint, so this lists all audio playlists and
/// matches locally, the same way python-plexapi's `playlist(title=...)` does.
pub async fn find_playlist_by_title(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    title: &str,
) -> Result<Option<PlexPlaylist>> {
    let mut url = base_url.join("playlists")?;
    url.query_pairs_mut().append_pair("playlistType", "audio");

    let res = client
        .get(url)
        .header("Accept", "application/json")
        .header("X-Plex-Token", user_token)
        .send()
        .await?
        .error_for_status()?
        .json::<PlexResponse<PlexPlaylist>>()
        .await
        .wrap_err("Failed to deserialize Plex playlists response")?;

    Ok(res
        .media_container
        .metadata
        .into_iter()
        .find(|p| p.title == title))
}

/* ---------- Create and delete ---------- */

/// Ask the server to build a playlist from an m3u file on its own filesystem.
///
/// Endpoint
/// - `POST /playlists/upload?sectionID={id}&path={path}`
///
/// Notes
/// - `path` must be visible to the Plex server process, not to us; the server
///   reads the file itself and derives the playlist title from the filename.
pub async fn upload_playlist(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    section_id: &str,
    path: &str,
) -> Result<()> {
    let mut url = base_url.join("playlists/upload")?;
    url.query_pairs_mut()
        .append_pair("sectionID", section_id)
        .append_pair("path", path);

    client
        .post(url)
        .header("Accept", "application/json")
        .header("X-Plex-Token", user_token)
        .send()
        .await?
        .error_for_status()
        .wrap_err("Failed to create playlist from file")?;

    Ok(())
}

/// Delete a playlist by its rating key.
///
/// Endpoint
/// - `DELETE /playlists/{ratingKey}`
pub async fn delete_playlist(
    client: &Client,
    base_url: &Url,
    user_token: &str,
    rating_key: &str,
) -> Result<()> {
    let url = base_url.join(&format!("playlists/{}", rating_key))?;

    client
        .delete(url)
        .header("X-Plex-Token", user_token)
        .send()
        .await?
        .error_for_status()
        .wrap_err("Failed to delete playlist")?;

    Ok(())
}
