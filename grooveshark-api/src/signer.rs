//! Request signing and the wire envelope.
//!
//! Signed requests carry `header.token = nonce + sha1_hex(sig)` where
//!
//! ```text
//! sig = "{method}:{communication_token}:{revision_token}:{nonce}"
//! ```
//!
//! and `nonce` is six random hex digits, fresh for every call.

use crate::clock::RandomSource;
use crate::scraper::ClientIdentity;
use serde::Serialize;
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::sync::Arc;

/// Methods sent without a `token` header field.
pub const UNSIGNED_METHODS: [&str; 3] =
    ["getCommunicationToken", "initiateSession", "getServiceStatus"];

/// Nonce length in characters.
pub const NONCE_LEN: usize = 6;

// Nonces may mix case.
const HEX_DIGITS: &[u8] = b"0123456789abcdefABCDEF";

/// Whether `method` is sent unsigned.
pub fn is_unsigned(method: &str) -> bool {
    UNSIGNED_METHODS.contains(&method)
}

/// Nonce plus digest for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub nonce: String,
    pub digest: String,
}

impl Signature {
    /// Value of the `token` header field: nonce immediately followed by digest.
    pub fn header_token(&self) -> String {
        format!("{}{}", self.nonce, self.digest)
    }
}

/// Lowercase SHA-1 hex of `method:token:revision_token:nonce`.
pub fn digest(method: &str, token: &str, revision_token: &str, nonce: &str) -> String {
    let joined = [method, token, revision_token, nonce].join(":");
    hex::encode(Sha1::digest(joined.as_bytes()))
}

/// Produces per-request signatures from a random source.
#[derive(Clone)]
pub struct RequestSigner {
    random: Arc<dyn RandomSource>,
}

impl RequestSigner {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Fresh random nonce of [`NONCE_LEN`] hex characters.
    pub fn nonce(&self) -> String {
        (0..NONCE_LEN)
            .map(|_| char::from(HEX_DIGITS[self.random.index(HEX_DIGITS.len())]))
            .collect()
    }

    /// Sign `method` with a new nonce.
    pub fn sign(&self, method: &str, token: &str, revision_token: &str) -> Signature {
        let nonce = self.nonce();
        let digest = digest(method, token, revision_token, &nonce);
        Signature { nonce, digest }
    }
}

/// `header` object of a request envelope.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignedHeader {
    pub client: String,
    pub client_revision: String,
    pub privacy: u8,
    pub country: Value,
    pub uuid: String,
    pub session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SignedHeader {
    /// Unsigned header carrying only the identity fields.
    pub fn unsigned(identity: &ClientIdentity) -> Self {
        Self {
            client: identity.client_name.clone(),
            client_revision: identity.client_revision.clone(),
            privacy: 0,
            country: identity.country.clone(),
            uuid: identity.instance_id.clone(),
            session: identity.session_id.clone(),
            token: None,
        }
    }
}

/// Body POSTed to `more.php`.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a> {
    pub header: SignedHeader,
    pub method: &'a str,
    pub parameters: &'a Value,
}
