//! JSON-RPC client for the Grooveshark HTML5 API.
//!
//! Every call is a POST to `{base}/more.php?{method}` with a JSON body:
//!
//! ```json
//! {
//!   "header": {
//!     "client": "mobileshark", "clientRevision": "20120830",
//!     "privacy": 0, "country": {...}, "uuid": "...", "session": "...",
//!     "token": "a1B2c3<sha1 hex>"
//!   },
//!   "method": "getFavorites",
//!   "parameters": { ... }
//! }
//! ```
//!
//! The server answers with a JSON object whose `result` field carries the
//! method-specific payload. See [`signer`](crate::signer) for how `token` is
//! computed and [`token`](crate::token) for how the communication token is
//! kept fresh.

use crate::clock::{Clock, RandomSource, SystemClock, ThreadRandom};
use crate::config::ClientConfig;
use crate::error::{GroovesharkError, Result};
use crate::scraper::{self, ClientIdentity};
use crate::signer::{self, RequestEnvelope, RequestSigner, SignedHeader};
use crate::token::{self, TokenManager};
use crate::transport::{HttpTransport, Transport};
use crate::types::UserSession;
use serde_json::{Value, json};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Blocking client for the Grooveshark API.
///
/// Construction scrapes the client identity, so a successfully built client
/// is ready to issue requests. The client is `Send + Sync`; concurrent calls
/// share one communication token and each gets its own nonce.
///
/// API methods are implemented in separate modules (`search`, `library`,
/// `stream`, `user`, `download`) as `impl GroovesharkClient` blocks.
pub struct GroovesharkClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    identity: ClientIdentity,
    tokens: TokenManager,
    signer: RequestSigner,
    user: Mutex<Option<UserSession>>,
}

impl GroovesharkClient {
    /// Create a client from `~/.config/grooveshark/config.json` (or defaults).
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::load()?)
    }

    /// Create a client from an explicit [`ClientConfig`].
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_parts(config, transport, Arc::new(SystemClock), Arc::new(ThreadRandom))
    }

    /// Create a client with every collaborator supplied by the caller.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self> {
        let identity = scraper::bootstrap(transport.as_ref(), &config, random.as_ref())?;
        Ok(Self {
            tokens: TokenManager::new(config.token_ttl()),
            signer: RequestSigner::new(random),
            config,
            transport,
            clock,
            identity,
            user: Mutex::new(None),
        })
    }

    /// Identity scraped at construction.
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session of the logged-in user, if [`login`](Self::login) succeeded.
    pub fn user(&self) -> Option<UserSession> {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_user(&self, session: UserSession) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Call `method` with `parameters` and return the `result` payload.
    ///
    /// Methods other than the three bootstrap/status calls are signed, which
    /// may first fetch a new communication token.
    ///
    /// # Errors
    ///
    /// - [`GroovesharkError::Http`]: network failure or timeout
    /// - [`GroovesharkError::Json`]: response body is not JSON
    /// - [`GroovesharkError::MissingResult`]: response has no `result`
    pub fn request(&self, method: &str, parameters: &Value) -> Result<Value> {
        let mut header = SignedHeader::unsigned(&self.identity);

        if !signer::is_unsigned(method) {
            let token = self
                .tokens
                .ensure_fresh(self.clock.as_ref(), || self.fetch_communication_token())?;
            let signature = self
                .signer
                .sign(method, &token, &self.identity.revision_token);
            header.token = Some(signature.header_token());
        }

        let envelope = RequestEnvelope {
            header,
            method,
            parameters,
        };
        let body = serde_json::to_string(&envelope)?;

        log::debug!("Calling {method}");
        let text = self.transport.post_text(&self.config.rpc_url(method), body)?;
        let mut resp: Value = serde_json::from_str(&text)?;

        resp.as_object_mut()
            .and_then(|o| o.remove("result"))
            .ok_or_else(|| GroovesharkError::MissingResult {
                method: method.to_owned(),
            })
    }

    fn fetch_communication_token(&self) -> Result<String> {
        log::debug!("Fetching communication token");
        let data = json!({ "secretKey": token::secret_key(&self.identity.session_id) });
        let result = self.request("getCommunicationToken", &data)?;
        result.as_str().map(String::from).ok_or_else(|| {
            GroovesharkError::UnexpectedResponse("communication token is not a string".into())
        })
    }

    /// Download `url` to `dest`.
    ///
    /// The body is streamed into `dest` with a `.part` suffix and renamed
    /// once complete, so `dest` only ever exists as a finished file.
    /// Returns the number of bytes written.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut partial = dest.as_os_str().to_owned();
        partial.push(".part");
        let partial = Path::new(&partial);

        let written = {
            let mut writer = BufWriter::new(File::create(partial)?);
            self.transport.download(url, &mut writer)
        };
        let result = written.and_then(|n| {
            fs::rename(partial, dest)?;
            Ok(n)
        });
        if result.is_err() {
            let _ = fs::remove_file(partial);
        }
        result
    }
}
