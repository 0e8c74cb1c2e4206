//! Scripted collaborators for unit tests.

use crate::client::GroovesharkClient;
use crate::clock::{Clock, RandomSource};
use crate::config::ClientConfig;
use crate::error::{GroovesharkError, Result};
use crate::transport::Transport;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <script type="text/javascript">
        window.GS = window.GS || {};
        GS.config = {"sessionID":"5f4dcc3b5aa765d61d8327deb882cf99","country":{"ID":223,"CC1":0,"IPR":1},"user":{"UserID":0}};
    </script>
</head>
<body></body>
</html>
"#;

pub const BUNDLE: &str = r#"(function(){var n="gooeyFlubber";var q={client:"mobileshark",clientRevision:"20120830"};var n="later";x={client:"htmlshark",clientRevision:"1"}})();"#;

const BASE_URL: &str = "http://gs.test";

/// Transport answering from canned GET bodies and per-method RPC responses.
///
/// Each method has a queue of responses; the last one is repeated once the
/// queue is down to a single entry. Every POST is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    pages: Mutex<HashMap<String, String>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    responses: Mutex<HashMap<String, VecDeque<String>>>,
    posted: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport serving the standard landing page and bundle, plus the
    /// given `(method, full response)` pairs.
    pub fn bootstrapped(responses: Vec<(&str, Value)>) -> Self {
        let transport = Self::new();
        transport.serve(&format!("{BASE_URL}/"), LANDING_PAGE);
        transport.serve(&format!("{BASE_URL}/build/app.min.js"), BUNDLE);
        for (method, resp) in responses {
            transport.respond_raw(method, &resp.to_string());
        }
        transport
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: BASE_URL.into(),
            ..ClientConfig::default()
        }
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_owned(), body.to_owned());
    }

    pub fn serve_bytes(&self, url: &str, body: Vec<u8>) {
        self.files.lock().unwrap().insert(url.to_owned(), body);
    }

    pub fn respond_raw(&self, method: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_owned())
            .or_default()
            .push_back(body.to_owned());
    }

    /// All POSTs so far as `(url, parsed body)`.
    pub fn posted(&self) -> Vec<(String, Value)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.posted()
            .iter()
            .filter(|(_, body)| body["method"] == method)
            .count()
    }

    pub fn last_call_to(&self, method: &str) -> Option<(String, Value)> {
        self.posted()
            .into_iter()
            .rev()
            .find(|(_, body)| body["method"] == method)
    }
}

fn not_found(url: &str) -> GroovesharkError {
    GroovesharkError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no scripted response for {url}"),
    ))
}

impl Transport for ScriptedTransport {
    fn get_text(&self, url: &str) -> Result<String> {
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| not_found(url))
    }

    fn post_text(&self, url: &str, body: String) -> Result<String> {
        let parsed: Value = serde_json::from_str(&body)?;
        let method = parsed["method"].as_str().unwrap_or_default().to_owned();
        self.posted.lock().unwrap().push((url.to_owned(), parsed));

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&method).ok_or_else(|| not_found(url))?;
        let resp = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        resp.ok_or_else(|| not_found(url))
    }

    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let data = self
            .files
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| not_found(url))?;
        sink.write_all(&data)?;
        Ok(data.len() as u64)
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

/// Random source cycling through fixed indices, with a fixed UUID.
pub struct FixedRandom {
    indices: Vec<usize>,
    next: AtomicUsize,
}

impl FixedRandom {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            next: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for FixedRandom {
    fn index(&self, bound: usize) -> usize {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.indices[i % self.indices.len()] % bound
    }

    fn uuid(&self) -> Uuid {
        Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef)
    }
}

/// Client bootstrapped from `transport`, with a manual clock and the thread
/// RNG (so concurrent nonces differ).
pub fn test_client(
    transport: ScriptedTransport,
) -> (GroovesharkClient, Arc<ScriptedTransport>, Arc<ManualClock>) {
    let transport = Arc::new(transport);
    let clock = Arc::new(ManualClock::new());
    let client = GroovesharkClient::with_parts(
        transport.config(),
        transport.clone(),
        clock.clone(),
        Arc::new(crate::clock::ThreadRandom),
    )
    .unwrap();
    (client, transport, clock)
}

/// Fresh empty directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("grooveshark-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
