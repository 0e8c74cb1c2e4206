//! Search API.
//!
//! Method: `getResultsFromSearch`
//!
//! Request parameters:
//! - `query`: search keyword
//! - `type`: list of kinds to search (`"Songs"`, `"Playlists"`, `"Albums"`)
//! - `guts`: always `0`
//! - `ppOverride`: always `""`
//!
//! Result payload:
//! ```json
//! {
//!   "result": {
//!     "Songs": [ { "SongID": "…", "SongName": "…", "AlbumName": "…", … } ],
//!     "Playlists": [ { "PlaylistID": "…", "Name": "…", "FName": "…" } ],
//!     "Albums": [ { "AlbumID": "…", "AlbumName": "…", "ArtistName": "…" } ]
//!   }
//! }
//! ```

use crate::client::GroovesharkClient;
use crate::error::{GroovesharkError, Result};
use crate::parse::{parse_album, parse_artist, parse_playlist, parse_songs};
use crate::types::{SearchKinds, SearchResult};
use serde_json::{Value, json};

impl GroovesharkClient {
    /// Search for songs, playlists and/or albums.
    ///
    /// Lists for kinds not requested in `kinds` are left empty.
    pub fn search(&self, query: &str, kinds: SearchKinds) -> Result<SearchResult> {
        let types = kinds.api_types();
        if types.is_empty() {
            return Err(GroovesharkError::Validation(
                "search needs at least one of songs, playlists or albums".into(),
            ));
        }

        let data = json!({
            "guts": 0,
            "ppOverride": "",
            "query": query,
            "type": types,
        });
        let resp = self.request("getResultsFromSearch", &data)?;
        let result = &resp["result"];

        Ok(SearchResult {
            songs: parse_songs(result["Songs"].as_array()),
            albums: list(&result["Albums"], |v| {
                let mut album = parse_album(v);
                album.artist = Some(parse_artist(v));
                album
            }),
            playlists: list(&result["Playlists"], parse_playlist),
        })
    }
}

fn list<T>(v: &Value, f: impl Fn(&Value) -> T) -> Vec<T> {
    v.as_array()
        .map(|arr| arr.iter().map(f).collect())
        .unwrap_or_default()
}
