//! Error types for the Grooveshark API client.

use thiserror::Error;

/// Errors that can occur when talking to Grooveshark.
#[derive(Debug, Error)]
pub enum GroovesharkError {
    /// The landing page or client bundle no longer has the expected shape.
    ///
    /// Raised while bootstrapping the client. Usually means the service
    /// shipped a new web client and the scraping patterns need updating.
    #[error("failed to scrape client configuration: {0}")]
    Scrape(String),

    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a JSON response or encode a request body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The RPC response was valid JSON but had no `result` field.
    #[error("response to `{method}` has no result")]
    MissingResult {
        /// RPC method that was called.
        method: String,
    },

    /// The `result` payload did not have the fields the operation needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// `authenticateUser` returned no auth token.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The operation needs a logged-in user. Call `login` first.
    #[error("not logged in")]
    NotLoggedIn,

    /// A caller-supplied argument is outside the allowed set.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// File I/O error (config read/write, download write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GroovesharkError {
    /// Whether retrying the same call could succeed (timeouts and
    /// connection failures).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Convenience alias for `Result<T, GroovesharkError>`.
pub type Result<T> = std::result::Result<T, GroovesharkError>;
