//! Communication token cache.
//!
//! Every signed request mixes a server-issued "communication token" into its
//! digest. The token is obtained with the unsigned `getCommunicationToken`
//! call, keyed by `md5_hex(sessionID)`, and reused until it goes stale.

use crate::clock::Clock;
use crate::error::Result;
use md5::{Digest, Md5};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A communication token and the moment it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicationToken {
    pub value: String,
    pub obtained_at: Instant,
}

/// `secretKey` parameter for `getCommunicationToken`.
pub fn secret_key(session_id: &str) -> String {
    hex::encode(Md5::digest(session_id.as_bytes()))
}

/// Shared, lazily refreshed communication token.
///
/// The lock is held for the whole refresh, so at most one fetch is in flight
/// per manager; callers that arrive meanwhile wait and then reuse the token
/// the first caller stored.
#[derive(Debug)]
pub struct TokenManager {
    ttl: Duration,
    current: Mutex<Option<CommunicationToken>>,
}

impl TokenManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
        }
    }

    /// Return a token that is not older than the TTL, calling `fetch` to
    /// obtain a new one if needed.
    ///
    /// Staleness is judged on `clock` once the lock is held, and a new token
    /// is stamped when `fetch` returns. If `fetch` fails, the previously
    /// cached token (if any) is kept.
    pub fn ensure_fresh<F>(&self, clock: &dyn Clock, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Result<String>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.as_ref() {
            let age = clock.now().saturating_duration_since(token.obtained_at);
            if age <= self.ttl {
                return Ok(token.value.clone());
            }
            log::debug!("Communication token is stale, refreshing");
        }

        let value = fetch()?;
        *current = Some(CommunicationToken {
            value: value.clone(),
            obtained_at: clock.now(),
        });
        Ok(value)
    }

    /// Snapshot of the cached token, if any.
    pub fn current(&self) -> Option<CommunicationToken> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
