//! Grooveshark HTML5 API client library.
//!
//! Talks to the undocumented JSON-RPC API behind `html5.grooveshark.com`:
//! search, library and favorites listing, favoriting, login, stream URL
//! resolution and bulk download.
//!
//! # Session bootstrap
//!
//! The service has no public credentials. On construction the client scrapes
//! the landing page (`GS.config` blob: session id, country) and the minified
//! bundle (client name/revision, revision token); see [`scraper`].
//!
//! ```no_run
//! use grooveshark_api::GroovesharkClient;
//! use grooveshark_api::types::SearchKinds;
//!
//! let client = GroovesharkClient::new().unwrap();
//! for song in client.search("paranoid android", SearchKinds::default()).unwrap().songs {
//!     println!("{song}");
//! }
//! ```
//!
//! # API method mapping
//!
//! | Method                                          | RPC method                   | Signed |
//! |-------------------------------------------------|------------------------------|--------|
//! | (token refresh, internal)                       | `getCommunicationToken`      | no     |
//! | [`GroovesharkClient::search`]                   | `getResultsFromSearch`       | yes    |
//! | [`GroovesharkClient::library`]                  | `userGetSongsInLibrary`      | yes    |
//! | [`GroovesharkClient::favorites`]                | `getFavorites`               | yes    |
//! | [`GroovesharkClient::favorite`]                 | `favorite`                   | yes    |
//! | [`GroovesharkClient::add_songs_to_library`]     | `addSongsToLibrary`          | yes    |
//! | [`GroovesharkClient::remove_songs_from_library`]| `userRemoveSongsFromLibrary` | yes    |
//! | [`GroovesharkClient::login`]                    | `authenticateUser`           | yes    |
//! | [`GroovesharkClient::stream_key`]               | `getStreamKeyFromSongIDEx`   | yes    |
//! | [`GroovesharkClient::download_songs`]           | (uses `stream_url`)          | yes    |
//!
//! # Signing
//!
//! Signed calls carry a nonce and a SHA-1 digest over the method name,
//! communication token, revision token and nonce. See [`signer`].

pub mod client;
pub mod clock;
pub mod config;
pub mod download;
pub mod error;
mod library;
mod parse;
pub mod scraper;
mod search;
pub mod signer;
mod stream;
#[cfg(test)]
mod test_support;
pub mod token;
pub mod transport;
pub mod types;
mod user;

pub use client::GroovesharkClient;
pub use config::ClientConfig;
pub use download::{DownloadReport, DownloadStatus, windows_filename};
pub use error::{GroovesharkError, Result};
pub use types::HasCoverArt;
