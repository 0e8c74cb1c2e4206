//! Client configuration, optionally persisted to disk.
//!
//! The config file is stored at `~/.config/grooveshark/config.json` and may
//! contain any subset of the fields below; missing fields take defaults:
//!
//! ```json
//! {
//!   "base_url": "https://html5.grooveshark.com",
//!   "timeout_secs": 30,
//!   "token_ttl_secs": 1500000,
//!   "download_dir": "/home/me/Music/Grooveshark"
//! }
//! ```

use crate::error::{GroovesharkError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://html5.grooveshark.com";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 6_0 like Mac OS X) \
    AppleWebKit/536.26 (KHTML, like Gecko) Version/6.0 Mobile/10A5376e Safari/8536.25";

/// How long a communication token is reused before it is fetched again.
///
/// 1,500,000 seconds is roughly 17 days. The web client this mirrors uses
/// exactly this value, so it is kept as the default; lower it through
/// [`ClientConfig::token_ttl_secs`] if the service starts rejecting tokens.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 1_500_000;

/// Settings that a [`GroovesharkClient`](crate::GroovesharkClient) is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, without trailing slash.
    pub base_url: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Upper bound for every network call, in seconds.
    pub timeout_secs: u64,
    /// Communication token lifetime, in seconds.
    pub token_ttl_secs: u64,
    /// Destination for [`download_songs`](crate::GroovesharkClient::download_songs)
    /// when the caller does not pick one.
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_secs: 30,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            download_dir: default_download_dir(),
        }
    }
}

impl ClientConfig {
    /// Load config from `~/.config/grooveshark/config.json`.
    ///
    /// Returns the default config if the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&data)?;
        log::debug!("Config loaded from: {}", path.display());
        Ok(config)
    }

    /// Save config to disk, creating parent directories if needed.
    ///
    /// Returns the path written to.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(path)
    }

    /// Network timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token lifetime as a [`Duration`].
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Landing page scraped for the inline `GS.config` blob.
    pub fn landing_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// Minified client bundle scraped for client name and revision token.
    pub fn bundle_url(&self) -> String {
        format!("{}/build/app.min.js", self.base_url)
    }

    /// JSON-RPC endpoint for `method`.
    pub fn rpc_url(&self, method: &str) -> String {
        format!("{}/more.php?{}", self.base_url, urlencoding::encode(method))
    }

    fn path() -> Result<PathBuf> {
        let config = dirs::config_dir().ok_or_else(|| {
            GroovesharkError::Io(std::io::Error::other("cannot determine config directory"))
        })?;
        Ok(config.join("grooveshark").join("config.json"))
    }
}

fn default_download_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Grooveshark")
}
