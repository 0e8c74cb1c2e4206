//! Stream key and playback URL APIs.
//!
//! Method: `getStreamKeyFromSongIDEx`
//!
//! Request: `{ "songID": 123, "country": {...}, "mobile": true, "prefetch": false }`
//!
//! Result:
//! ```json
//! { "ip": "stream17.grooveshark.com", "streamKey": "2f1c…", "uSecs": "383000000", … }
//! ```
//!
//! The result is an empty list when the song cannot be streamed in the
//! session's country.

use crate::client::GroovesharkClient;
use crate::error::{GroovesharkError, Result};
use crate::types::StreamKey;
use serde_json::json;

impl GroovesharkClient {
    /// Get a stream key for `song_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GroovesharkError::UnexpectedResponse`] if the song is not
    /// streamable (no `ip`/`streamKey` in the result).
    pub fn stream_key(&self, song_id: u64) -> Result<StreamKey> {
        let data = json!({
            "country": self.identity().country,
            "mobile": true,
            "prefetch": false,
            "songID": song_id,
        });
        let resp = self.request("getStreamKeyFromSongIDEx", &data)?;

        let field = |name: &str| {
            resp[name]
                .as_str()
                .filter(|s| !s.is_empty())
                .map(String::from)
                .ok_or_else(|| {
                    GroovesharkError::UnexpectedResponse(format!(
                        "no {name} for song {song_id} (not streamable)"
                    ))
                })
        };

        Ok(StreamKey {
            ip: field("ip")?,
            stream_key: field("streamKey")?,
        })
    }

    /// Direct playback URL for `song_id`.
    pub fn stream_url(&self, song_id: u64) -> Result<String> {
        self.stream_key(song_id).map(|key| key.url())
    }
}
