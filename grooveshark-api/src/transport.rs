//! HTTP transport used by the client.
//!
//! [`GroovesharkClient`](crate::GroovesharkClient) never talks to `reqwest`
//! directly; it goes through the [`Transport`] trait so tests can script
//! responses without a network.

use crate::config::ClientConfig;
use crate::error::Result;
use reqwest::blocking::Client;
use std::io::{Read, Write};

/// Chunk size used when streaming downloads to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 10 * 1024;

/// Minimal request/response surface the client needs.
pub trait Transport: Send + Sync {
    /// `GET url` and return the body as text.
    fn get_text(&self, url: &str) -> Result<String>;

    /// `POST url` with a JSON `body` and return the response body as text.
    fn post_text(&self, url: &str, body: String) -> Result<String>;

    /// `GET url` and stream the body into `sink`. Returns bytes written.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;
}

/// Blocking [`reqwest`] transport with a cookie store, so cookies set by the
/// landing page are sent back with every RPC call.
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build a transport with the configured user agent and timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .cookie_store(true)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.http.get(url).send()?.error_for_status()?;
        Ok(resp.text()?)
    }

    fn post_text(&self, url: &str, body: String) -> Result<String> {
        let resp = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()?
            .error_for_status()?;
        Ok(resp.text()?)
    }

    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let mut resp = self.http.get(url).send()?.error_for_status()?;
        let mut buf = vec![0u8; DOWNLOAD_CHUNK_SIZE];
        let mut written = 0u64;
        loop {
            let n = resp.read(&mut buf)?;
            if n == 0 {
                break;
            }
            sink.write_all(&buf[..n])?;
            written += n as u64;
        }
        sink.flush()?;
        Ok(written)
    }
}
