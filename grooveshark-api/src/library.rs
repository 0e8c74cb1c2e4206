//! Library and favorites APIs.
//!
//! ## `library`: `userGetSongsInLibrary`
//!
//! Request: `{ "userID": 123, "page": 0 }`, repeated with `page` 1, 2, …
//! while the result's `hasMore` is true.
//!
//! Result: `{ "Songs": [ { "SongID": "…", "Name": "…", … } ], "hasMore": true }`
//!
//! ## `favorites`: `getFavorites`
//!
//! Request: `{ "userID": 123, "ofWhat": "Songs" }`. Result: array of songs.
//!
//! ## `favorite`: `favorite`
//!
//! Request: `{ "ID": 123, "what": "Song" }`. Result: `{ "success": true }`.
//!
//! ## `add_songs_to_library` / `remove_songs_from_library`
//!
//! `addSongsToLibrary` takes a list of song descriptors;
//! `userRemoveSongsFromLibrary` takes parallel id lists and the user id.

use crate::client::GroovesharkClient;
use crate::error::{GroovesharkError, Result};
use crate::parse::{is_truthy, parse_songs};
use crate::types::{Entity, Song};
use serde_json::{Value, json};

impl GroovesharkClient {
    /// All songs in `user_id`'s library, in page order.
    pub fn library(&self, user_id: u64) -> Result<Vec<Song>> {
        let mut songs = Vec::new();
        for page in 0u64.. {
            let data = json!({ "userID": user_id, "page": page });
            let resp = self.request("userGetSongsInLibrary", &data)?;
            let batch = parse_songs(resp["Songs"].as_array());
            log::debug!("Library page {page}: {} songs", batch.len());
            songs.extend(batch);

            if !is_truthy(&resp["hasMore"]) {
                break;
            }
        }
        Ok(songs)
    }

    /// `user_id`'s favorite songs.
    pub fn favorites(&self, user_id: u64) -> Result<Vec<Song>> {
        let data = json!({ "userID": user_id, "ofWhat": "Songs" });
        let resp = self.request("getFavorites", &data)?;
        let arr = resp.as_array().ok_or_else(|| {
            GroovesharkError::UnexpectedResponse("favorites result is not a list".into())
        })?;
        Ok(parse_songs(Some(arr)))
    }

    /// Mark `item` as a favorite of the logged-in user.
    ///
    /// The service exposes a single `favorite` call and no separate
    /// unfavorite; whether a repeat call toggles is up to the server.
    pub fn favorite(&self, item: &impl Entity) -> Result<bool> {
        let data = json!({ "ID": item.id(), "what": item.kind().as_str() });
        let resp = self.request("favorite", &data)?;
        Ok(success(&resp))
    }

    /// Add `songs` to the logged-in user's library.
    pub fn add_songs_to_library(&self, songs: &[Song]) -> Result<bool> {
        let descriptors: Vec<Value> = songs
            .iter()
            .map(|song| {
                let artist = song.artist();
                json!({
                    "songID": song.id,
                    "songName": song.name,
                    "track": song.track_num,
                    "artFilename": song.cover_art_filename,
                    "isVerified": u8::from(song.is_verified),
                    "albumID": song.album.id,
                    "albumName": song.album.name,
                    "artistID": artist.map(|a| a.id),
                    "artistName": artist.map(|a| a.name.as_str()),
                    "token": Value::Null,
                })
            })
            .collect();
        let resp = self.request("addSongsToLibrary", &json!({ "songs": descriptors }))?;
        Ok(success(&resp))
    }

    /// Remove `songs` from the logged-in user's library.
    ///
    /// # Errors
    ///
    /// [`GroovesharkError::NotLoggedIn`] if [`login`](Self::login) has not
    /// succeeded on this client.
    pub fn remove_songs_from_library(&self, songs: &[Song]) -> Result<bool> {
        let user = self.user().ok_or(GroovesharkError::NotLoggedIn)?;
        let data = json!({
            "userID": user.user_id,
            "songIDs": songs.iter().map(|s| s.id).collect::<Vec<_>>(),
            "albumIDs": songs.iter().map(|s| s.album.id).collect::<Vec<_>>(),
            "artistIDs": songs.iter().map(|s| s.artist().map(|a| a.id)).collect::<Vec<_>>(),
        });
        let resp = self.request("userRemoveSongsFromLibrary", &data)?;
        Ok(success(&resp))
    }
}

fn success(resp: &Value) -> bool {
    is_truthy(&resp["success"])
}
