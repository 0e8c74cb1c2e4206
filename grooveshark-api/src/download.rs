//! Bulk song download.
//!
//! Each song is saved as `"{album} - {song}.mp3"` with characters that are
//! illegal on Windows removed. Songs whose file already exists are skipped;
//! a failure on one song is recorded and the batch moves on.

use crate::client::GroovesharkClient;
use crate::error::{GroovesharkError, Result};
use crate::types::Song;
use std::fs;
use std::path::{Path, PathBuf};

const WINDOWS_ILLEGAL: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Remove `/ \ : * ? " < > |` from `name`.
pub fn windows_filename(name: &str) -> String {
    name.chars().filter(|c| !WINDOWS_ILLEGAL.contains(c)).collect()
}

/// File name a song is downloaded to.
pub fn song_filename(song: &Song) -> String {
    windows_filename(&format!("{} - {}.mp3", song.album.name, song.name))
}

/// What happened to one song of a batch.
#[derive(Debug)]
pub enum DownloadStatus {
    /// Written to disk.
    Downloaded { bytes: u64 },
    /// A file with the target name already existed.
    Skipped,
    /// Stream lookup, transfer or write failed.
    Failed(GroovesharkError),
}

/// Per-song outcome of [`GroovesharkClient::download_songs`].
#[derive(Debug)]
pub struct DownloadReport {
    pub song_id: u64,
    pub path: PathBuf,
    pub status: DownloadStatus,
}

impl GroovesharkClient {
    /// Download `songs` into `dir` (created if missing).
    ///
    /// Returns one report per song, in input order. Only failure to create
    /// `dir` aborts the batch.
    pub fn download_songs<'a, I>(&self, songs: I, dir: &Path) -> Result<Vec<DownloadReport>>
    where
        I: IntoIterator<Item = &'a Song>,
    {
        fs::create_dir_all(dir)?;

        let mut reports = Vec::new();
        for song in songs {
            let filename = song_filename(song);
            let path = dir.join(&filename);

            let status = if path.exists() {
                log::info!("Skipping {filename:?}");
                DownloadStatus::Skipped
            } else {
                log::info!("Downloading {filename:?}");
                match self.download_song(song.id, &path) {
                    Ok(bytes) => {
                        log::info!("Downloaded {filename:?} ({bytes} bytes)");
                        DownloadStatus::Downloaded { bytes }
                    }
                    Err(e) => {
                        log::warn!("Failed to download {filename:?}: {e}");
                        DownloadStatus::Failed(e)
                    }
                }
            };

            reports.push(DownloadReport {
                song_id: song.id,
                path,
                status,
            });
        }
        Ok(reports)
    }

    /// Resolve the stream URL for `song_id` and save it to `dest`.
    pub fn download_song(&self, song_id: u64, dest: &Path) -> Result<u64> {
        let url = self.stream_url(song_id)?;
        self.download(&url, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_song;
    use crate::test_support::{ScriptedTransport, temp_dir, test_client};
    use serde_json::json;

    #[test]
    fn strips_windows_illegal_characters() {
        assert_eq!(windows_filename("A/B:C*.mp3"), "ABC.mp3");
        assert_eq!(windows_filename(r#"a\b?c"d<e>f|g"#), "abcdefg");
        assert_eq!(windows_filename("Ünïcode - ok.mp3"), "Ünïcode - ok.mp3");
    }

    #[test]
    fn song_filename_uses_album_and_song() {
        let song = parse_song(&json!({ "SongID": 1, "SongName": "Why?", "AlbumName": "AC/DC Live" }));
        assert_eq!(song_filename(&song), "ACDC Live - Why.mp3");
    }

    #[test]
    fn batch_skips_existing_and_isolates_failures() {
        let transport = ScriptedTransport::bootstrapped(vec![
            ("getCommunicationToken", json!({ "result": "commtok" })),
            (
                "getStreamKeyFromSongIDEx",
                json!({ "result": { "ip": "cdn.test", "streamKey": "k" } }),
            ),
        ]);
        transport.serve_bytes("http://cdn.test/stream.php?streamKey=k", b"mp3data".to_vec());
        let (client, _, _) = test_client(transport);

        let songs = [
            parse_song(&json!({ "SongID": 1, "SongName": "Old", "AlbumName": "A" })),
            parse_song(&json!({ "SongID": 2, "SongName": "New", "AlbumName": "A" })),
        ];
        let dir = temp_dir();
        fs::write(dir.join("A - Old.mp3"), b"existing").unwrap();

        let reports = client.download_songs(&songs, &dir).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].status, DownloadStatus::Skipped));
        assert!(matches!(reports[1].status, DownloadStatus::Downloaded { bytes: 7 }));
        assert_eq!(fs::read(dir.join("A - New.mp3")).unwrap(), b"mp3data");
        assert_eq!(fs::read(dir.join("A - Old.mp3")).unwrap(), b"existing");
    }

    #[test]
    fn failed_song_does_not_abort_batch() {
        let transport = ScriptedTransport::bootstrapped(vec![
            ("getCommunicationToken", json!({ "result": "commtok" })),
            ("getStreamKeyFromSongIDEx", json!({ "result": [] })),
        ]);
        let (client, transport, _) = test_client(transport);

        let songs = [
            parse_song(&json!({ "SongID": 1, "SongName": "One", "AlbumName": "A" })),
            parse_song(&json!({ "SongID": 2, "SongName": "Two", "AlbumName": "A" })),
        ];
        let dir = temp_dir();
        let reports = client.download_songs(&songs, &dir).unwrap();

        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert!(matches!(report.status, DownloadStatus::Failed(_)));
            assert!(!report.path.exists());
        }
        assert_eq!(transport.calls_to("getStreamKeyFromSongIDEx"), 2);
    }
}
