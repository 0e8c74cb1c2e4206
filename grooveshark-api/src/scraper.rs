//! Client identity bootstrap.
//!
//! The HTML5 web client does not ship its identity as an API; it is embedded
//! in two places and has to be scraped:
//!
//! 1. The landing page contains a line like
//!    `GS.config = {"sessionID":"abc…","country":{"ID":223,…}};`
//! 2. The minified bundle at `/build/app.min.js` contains the revision token
//!    (`var n="…"`) and the client name/revision pair
//!    (`client:"mobileshark",clientRevision:"20120830"`).
//!
//! Any mismatch fails with [`GroovesharkError::Scrape`]: a partial identity
//! only produces requests the service rejects.

use crate::clock::RandomSource;
use crate::config::ClientConfig;
use crate::error::{GroovesharkError, Result};
use crate::transport::Transport;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const CONFIG_MARKER: &str = "GS.config =";

static REVISION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)var n="([a-z]+)""#).expect("valid regex"));
static CLIENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"client:"(.*?)",clientRevision:"(.*?)""#).expect("valid regex")
});

/// Per-process client identity sent in every request header.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIdentity {
    /// Client name, e.g. `mobileshark`.
    pub client_name: String,
    /// Client revision string sent as `clientRevision`.
    pub client_revision: String,
    /// Secret mixed into every request signature. Never sent on its own.
    pub revision_token: String,
    /// `sessionID` from the landing page config.
    pub session_id: String,
    /// `country` from the landing page config, passed through untouched.
    pub country: Value,
    /// Random id identifying this client instance (`uuid` header field).
    pub instance_id: String,
}

/// Fields taken from the landing page's `GS.config` blob.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub session_id: String,
    pub country: Value,
}

/// Fields taken from the client bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleInfo {
    pub client_name: String,
    pub client_revision: String,
    pub revision_token: String,
}

/// Fetch both artifacts and assemble a [`ClientIdentity`].
pub fn bootstrap(
    transport: &dyn Transport,
    config: &ClientConfig,
    random: &dyn RandomSource,
) -> Result<ClientIdentity> {
    log::debug!("Scraping client config from {}", config.landing_url());
    let page = parse_page_config(&transport.get_text(&config.landing_url())?)?;

    log::debug!("Scraping client bundle from {}", config.bundle_url());
    let bundle = parse_bundle(&transport.get_text(&config.bundle_url())?)?;

    let identity = ClientIdentity {
        client_name: bundle.client_name,
        client_revision: bundle.client_revision,
        revision_token: bundle.revision_token,
        session_id: page.session_id,
        country: page.country,
        instance_id: random.uuid().to_string(),
    };
    log::debug!(
        "Bootstrapped as {} rev {}",
        identity.client_name,
        identity.client_revision
    );
    Ok(identity)
}

/// Extract `sessionID` and `country` from the landing page HTML.
pub fn parse_page_config(html: &str) -> Result<PageConfig> {
    let raw = html
        .lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix(CONFIG_MARKER))
        .ok_or_else(|| GroovesharkError::Scrape("no GS.config line in landing page".into()))?;

    let raw = raw.trim_matches(|c: char| c.is_whitespace() || matches!(c, ';' | '(' | ')'));
    let mut config: Value = serde_json::from_str(raw)
        .map_err(|e| GroovesharkError::Scrape(format!("GS.config is not valid JSON: {e}")))?;

    let session_id = config["sessionID"]
        .as_str()
        .ok_or_else(|| GroovesharkError::Scrape("GS.config has no sessionID".into()))?
        .to_owned();
    let country = config
        .get_mut("country")
        .map(Value::take)
        .ok_or_else(|| GroovesharkError::Scrape("GS.config has no country".into()))?;

    Ok(PageConfig {
        session_id,
        country,
    })
}

/// Extract the revision token and client name/revision from the bundle.
pub fn parse_bundle(js: &str) -> Result<BundleInfo> {
    let revision_token = REVISION_TOKEN_RE
        .captures(js)
        .map(|c| c[1].to_owned())
        .ok_or_else(|| GroovesharkError::Scrape("revision token not found in bundle".into()))?;

    let client = CLIENT_RE
        .captures(js)
        .ok_or_else(|| GroovesharkError::Scrape("client revision not found in bundle".into()))?;

    Ok(BundleInfo {
        client_name: client[1].to_owned(),
        client_revision: client[2].to_owned(),
        revision_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BUNDLE, FixedRandom, LANDING_PAGE, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn page_config_matches_embedded_json() {
        let page = parse_page_config(LANDING_PAGE).unwrap();
        assert_eq!(page.session_id, "5f4dcc3b5aa765d61d8327deb882cf99");
        assert_eq!(page.country, json!({ "ID": 223, "CC1": 0, "IPR": 1 }));
    }

    #[test]
    fn page_config_strips_wrapping_parens() {
        let html = "  GS.config = ({\"sessionID\":\"s\",\"country\":\"US\"});  ";
        let page = parse_page_config(html).unwrap();
        assert_eq!(page.session_id, "s");
        assert_eq!(page.country, json!("US"));
    }

    #[test]
    fn page_without_marker_fails() {
        let err = parse_page_config("<html><body>maintenance</body></html>").unwrap_err();
        assert!(matches!(err, GroovesharkError::Scrape(_)));
    }

    #[test]
    fn page_with_broken_json_fails() {
        let err = parse_page_config("GS.config = {sessionID: nope};").unwrap_err();
        assert!(matches!(err, GroovesharkError::Scrape(_)));
    }

    #[test]
    fn page_without_session_id_fails() {
        let err = parse_page_config(r#"GS.config = {"country":1};"#).unwrap_err();
        assert!(matches!(err, GroovesharkError::Scrape(_)));
    }

    #[test]
    fn bundle_uses_first_matches() {
        let info = parse_bundle(BUNDLE).unwrap();
        assert_eq!(info.revision_token, "gooeyFlubber");
        assert_eq!(info.client_name, "mobileshark");
        assert_eq!(info.client_revision, "20120830");
    }

    #[test]
    fn bundle_without_revision_token_fails() {
        let js = r#"x={client:"mobileshark",clientRevision:"20120830"}"#;
        assert!(matches!(parse_bundle(js), Err(GroovesharkError::Scrape(_))));
    }

    #[test]
    fn bundle_without_client_fails() {
        let js = r#"var n="abc";"#;
        assert!(matches!(parse_bundle(js), Err(GroovesharkError::Scrape(_))));
    }

    #[test]
    fn bootstrap_assembles_identity() {
        let transport = ScriptedTransport::bootstrapped(vec![]);
        let random = FixedRandom::new(vec![0]);
        let identity = bootstrap(&transport, &transport.config(), &random).unwrap();
        assert_eq!(identity.session_id, "5f4dcc3b5aa765d61d8327deb882cf99");
        assert_eq!(identity.client_name, "mobileshark");
        assert_eq!(identity.instance_id, random.uuid().to_string());
    }
}
