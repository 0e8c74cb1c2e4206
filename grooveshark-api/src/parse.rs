//! Mapping of raw result dictionaries into [`types`](crate::types).
//!
//! The service is inconsistent about number encoding (`"SongID":"123"` in
//! one call, `"SongID":123` in another), so every numeric field accepts both.
//! Art filenames of `"0"` or `""` mean "no art".

use crate::types::{Album, Artist, Playlist, Song};
use serde_json::Value;
use std::time::Duration;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn parse_song(v: &Value) -> Song {
    let mut album = parse_album(v);
    album.artist = Some(parse_artist(v));

    let name = v["SongName"].as_str().or_else(|| v["Name"].as_str());

    Song {
        id: as_u64(&v["SongID"]).unwrap_or(0),
        name: name.unwrap_or("").to_owned(),
        album,
        cover_art_filename: art_filename(&v["CoverArtFilename"]),
        year: as_u64(&v["Year"]).and_then(|y| u32::try_from(y).ok()),
        added_at: as_f64(&v["TSAdded"])
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(|t| t as u64),
        track_num: as_u64(&v["TrackNum"]).and_then(|n| u32::try_from(n).ok()),
        duration: as_f64(&v["EstimateDuration"])
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(Duration::from_secs_f64),
        average_duration: as_f64(&v["AvgDuration"]),
        average_rating: as_f64(&v["AvgRating"]),
        popularity: as_u64(&v["Popularity"]),
        popularity_index: as_u64(&v["PopularityIndex"]),
        score: as_f64(&v["Score"]),
        raw_score: as_f64(&v["RawScore"]),
        is_verified: as_flag(&v["IsVerified"]),
        is_low_bitrate_available: as_flag(&v["IsLowBitrateAvailable"]),
        flags: as_u64(&v["Flags"]),
    }
}

pub(crate) fn parse_album(v: &Value) -> Album {
    Album {
        id: as_u64(&v["AlbumID"]).unwrap_or(0),
        name: v["AlbumName"].as_str().unwrap_or("").to_owned(),
        cover_art_filename: art_filename(&v["AlbumCoverArtFilename"]),
        artist: None,
    }
}

pub(crate) fn parse_artist(v: &Value) -> Artist {
    Artist {
        id: as_u64(&v["ArtistID"]).unwrap_or(0),
        name: v["ArtistName"].as_str().unwrap_or("").to_owned(),
        cover_art_filename: art_filename(&v["ArtistCoverArtFilename"]),
    }
}

pub(crate) fn parse_playlist(v: &Value) -> Playlist {
    Playlist {
        id: as_u64(&v["PlaylistID"]).unwrap_or(0),
        name: v["Name"].as_str().unwrap_or("").to_owned(),
        user_name: v["FName"].as_str().map(String::from),
        cover_art_filename: art_filename(&v["CoverArtFilename"]),
    }
}

pub(crate) fn parse_songs(arr: Option<&Vec<Value>>) -> Vec<Song> {
    arr.map(|a| a.iter().map(parse_song).collect())
        .unwrap_or_default()
}

/// Truthiness of a flag-like field: `true`, non-zero numbers, non-empty
/// strings and containers.
pub(crate) fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

pub(crate) fn as_u64(v: &Value) -> Option<u64> {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn as_flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        _ => as_u64(v) == Some(1),
    }
}

fn art_filename(v: &Value) -> Option<String> {
    match v.as_str() {
        None | Some("" | "0") => None,
        Some(s) => Some(s.to_owned()),
    }
}
