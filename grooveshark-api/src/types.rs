//! Domain types mapped from Grooveshark API results.
//!
//! Grooveshark returns flat dictionaries per song, e.g.
//! `{"SongID":"123","SongName":"…","AlbumID":"4","AlbumName":"…",
//! "ArtistID":"5","ArtistName":"…","CoverArtFilename":"123.jpg",…}`; the
//! artist and album are carved out of the same dictionary. Field names follow
//! Rust conventions rather than the API's PascalCase.

use crate::error::{GroovesharkError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Image sizes the CDN serves.
pub const VALID_COVER_ART_SIZES: [u32; 11] = [20, 30, 40, 50, 70, 80, 90, 120, 142, 200, 500];

/// Size used when the caller has no preference.
pub const DEFAULT_COVER_ART_SIZE: u32 = 500;

const IMAGE_BASE_URL: &str = "http://images.gs-cdn.net/static";

/// Kind of entity, as spelled in the API's `what` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Artist,
    Album,
    Song,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::Song => "Song",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can be favorited.
pub trait Entity {
    fn kind(&self) -> EntityKind;
    fn id(&self) -> u64;
}

/// Cover art lookup shared by [`Artist`], [`Album`] and [`Song`].
///
/// When an entity has no art of its own, resolution falls back to its parent
/// (song → album → artist).
pub trait HasCoverArt {
    /// Own art filename, if any.
    fn cover_art_filename(&self) -> Option<&str>;

    /// Path segment under the image CDN (`artists`, `albums`).
    fn cover_art_collection(&self) -> &'static str;

    /// Entity to fall back to when there is no own art.
    fn cover_art_parent(&self) -> Option<&dyn HasCoverArt>;

    /// Resolve the cover art URL at `size`, searching parents.
    fn cover_art_url(&self, size: u32) -> Result<Option<String>> {
        self.cover_art_url_with(size, true)
    }

    /// Resolve the cover art URL at `size`.
    ///
    /// Fails with [`GroovesharkError::Validation`] if `size` is not one of
    /// [`VALID_COVER_ART_SIZES`]. Returns `Ok(None)` when neither the entity
    /// nor (if `search_parents`) any parent has art.
    fn cover_art_url_with(&self, size: u32, search_parents: bool) -> Result<Option<String>> {
        validate_cover_art_size(size)?;
        if let Some(filename) = self.cover_art_filename() {
            return Ok(Some(format!(
                "{IMAGE_BASE_URL}/{}/{size}_{filename}",
                self.cover_art_collection()
            )));
        }
        match self.cover_art_parent() {
            Some(parent) if search_parents => parent.cover_art_url(size),
            _ => Ok(None),
        }
    }
}

/// Check `size` against [`VALID_COVER_ART_SIZES`].
pub fn validate_cover_art_size(size: u32) -> Result<()> {
    if VALID_COVER_ART_SIZES.contains(&size) {
        return Ok(());
    }
    let valid: Vec<String> = VALID_COVER_ART_SIZES.iter().map(u32::to_string).collect();
    Err(GroovesharkError::Validation(format!(
        "invalid cover art size {size}, must be one of: {}",
        valid.join(", ")
    )))
}

/// A music artist.
///
/// API JSON fields: `ArtistID`, `ArtistName`, `ArtistCoverArtFilename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_filename: Option<String>,
}

/// An album.
///
/// API JSON fields: `AlbumID`, `AlbumName`, `AlbumCoverArtFilename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_filename: Option<String>,
    /// Present when the album was carved out of a song record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
}

/// A song.
///
/// Returned by search, library and favorites listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Grooveshark song ID (used by `stream_key`, `stream_url`, downloads).
    pub id: u64,
    pub name: String,
    /// Album the song belongs to; the album owns the artist.
    pub album: Album,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_filename: Option<String>,
    pub year: Option<u32>,
    /// Unix timestamp the song was added (`TSAdded`), for library entries.
    pub added_at: Option<u64>,
    pub track_num: Option<u32>,
    /// Estimated duration.
    pub duration: Option<Duration>,
    pub average_duration: Option<f64>,
    pub average_rating: Option<f64>,
    pub popularity: Option<u64>,
    pub popularity_index: Option<u64>,
    pub score: Option<f64>,
    pub raw_score: Option<f64>,
    pub is_verified: bool,
    pub is_low_bitrate_available: bool,
    pub flags: Option<u64>,
}

impl Song {
    /// Performing artist, taken from the album.
    pub fn artist(&self) -> Option<&Artist> {
        self.album.artist.as_ref()
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let artist = self.artist().map_or("", |a| a.name.as_str());
        write!(f, "<Song {} \"{}\" by \"{}\">", self.id, self.name, artist)
    }
}

/// A playlist, as returned by playlist search.
///
/// API JSON fields: `PlaylistID`, `Name`, `FName` (owner), `CoverArtFilename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_art_filename: Option<String>,
}

/// Search result, one list per requested kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
    pub playlists: Vec<Playlist>,
}

/// Which kinds a search should cover. Defaults to songs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchKinds {
    pub songs: bool,
    pub playlists: bool,
    pub albums: bool,
}

impl Default for SearchKinds {
    fn default() -> Self {
        Self {
            songs: true,
            playlists: false,
            albums: false,
        }
    }
}

impl SearchKinds {
    /// Values for the API `type` parameter.
    pub fn api_types(self) -> Vec<&'static str> {
        [
            (self.songs, "Songs"),
            (self.playlists, "Playlists"),
            (self.albums, "Albums"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Server-side stream handle for a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamKey {
    /// Host serving the stream.
    pub ip: String,
    pub stream_key: String,
}

impl StreamKey {
    /// Playback URL for this key.
    pub fn url(&self) -> String {
        format!("http://{}/stream.php?streamKey={}", self.ip, self.stream_key)
    }
}

/// Logged-in user, from `authenticateUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: u64,
    pub auth_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Entity for Artist {
    fn kind(&self) -> EntityKind {
        EntityKind::Artist
    }
    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Album {
    fn kind(&self) -> EntityKind {
        EntityKind::Album
    }
    fn id(&self) -> u64 {
        self.id
    }
}

impl Entity for Song {
    fn kind(&self) -> EntityKind {
        EntityKind::Song
    }
    fn id(&self) -> u64 {
        self.id
    }
}

impl HasCoverArt for Artist {
    fn cover_art_filename(&self) -> Option<&str> {
        self.cover_art_filename.as_deref()
    }
    fn cover_art_collection(&self) -> &'static str {
        "artists"
    }
    fn cover_art_parent(&self) -> Option<&dyn HasCoverArt> {
        None
    }
}

impl HasCoverArt for Album {
    fn cover_art_filename(&self) -> Option<&str> {
        self.cover_art_filename.as_deref()
    }
    fn cover_art_collection(&self) -> &'static str {
        "albums"
    }
    fn cover_art_parent(&self) -> Option<&dyn HasCoverArt> {
        self.artist.as_ref().map(|a| a as &dyn HasCoverArt)
    }
}

// Song art lives alongside album art on the CDN.
impl HasCoverArt for Song {
    fn cover_art_filename(&self) -> Option<&str> {
        self.cover_art_filename.as_deref()
    }
    fn cover_art_collection(&self) -> &'static str {
        "albums"
    }
    fn cover_art_parent(&self) -> Option<&dyn HasCoverArt> {
        Some(&self.album as &dyn HasCoverArt)
    }
}
