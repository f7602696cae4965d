use serde::Deserialize;

pub mod playlist;
pub mod sections;

/// A minimal Plex JSON envelope for endpoints that return `MediaContainer.Metadata`.
///
/// Notes
/// - Plex responses are wrapped in a top level `MediaContainer`.
/// - Many fields are optional or omitted depending on endpoint and server version.
/// - `metadata` defaults to an empty vec when missing.
#[derive(Debug, Clone, Deserialize)]
pub struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: PlexMediaContainer<T>,
}

/// The inner Plex MediaContainer payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PlexMediaContainer<T> {
    #[serde(default)]
    pub size: Option<u32>,

    #[serde(rename = "totalSize", default)]
    pub total_size: Option<u32>,

    #[serde(default)]
    pub offset: Option<u32>,

    #[serde(rename = "Metadata", default = "Vec::new")]
    pub metadata: Vec<T>,
}
