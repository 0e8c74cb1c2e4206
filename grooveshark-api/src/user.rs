//! Login API.
//!
//! Method: `authenticateUser`
//!
//! Request: `{ "username": "…", "password": "…" }`
//!
//! Result:
//! ```json
//! { "userID": 413184081, "authToken": "…", "Username": "…", … }
//! ```
//!
//! Bad credentials are not reported as a fault: the result simply carries
//! an empty `authToken` (and `userID` 0).

use crate::client::GroovesharkClient;
use crate::error::{GroovesharkError, Result};
use crate::parse::{as_u64, is_truthy};
use crate::types::UserSession;
use serde_json::json;

impl GroovesharkClient {
    /// Log in and remember the session on this client.
    ///
    /// # Errors
    ///
    /// [`GroovesharkError::InvalidCredentials`] if no auth token is returned.
    pub fn login(&self, username: &str, password: &str) -> Result<UserSession> {
        let data = json!({ "username": username, "password": password });
        let resp = self.request("authenticateUser", &data)?;

        if !is_truthy(&resp["authToken"]) {
            return Err(GroovesharkError::InvalidCredentials);
        }

        let session = UserSession {
            user_id: as_u64(&resp["userID"]).unwrap_or(0),
            auth_token: resp["authToken"].as_str().unwrap_or_default().to_owned(),
            username: resp["Username"].as_str().map(String::from),
        };
        log::debug!("Logged in as user {}", session.user_id);
        self.set_user(session.clone());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, test_client};

    #[test]
    fn login_stores_session() {
        let transport = ScriptedTransport::bootstrapped(vec![
            ("getCommunicationToken", json!({ "result": "commtok" })),
            (
                "authenticateUser",
                json!({ "result": { "userID": "77", "authToken": "auth", "Username": "bob" } }),
            ),
            ("userRemoveSongsFromLibrary", json!({ "result": { "success": true } })),
        ]);
        let (client, transport, _) = test_client(transport);

        let session = client.login("bob", "hunter2").unwrap();
        assert_eq!(session.user_id, 77);
        assert_eq!(client.user(), Some(session));

        assert!(client.remove_songs_from_library(&[]).unwrap());
        let (_, body) = transport.last_call_to("userRemoveSongsFromLibrary").unwrap();
        assert_eq!(body["parameters"]["userID"], 77);
    }

    #[test]
    fn login_accepts_numeric_and_padded_user_ids() {
        for (raw, expected) in [(json!(413_184_081), 413_184_081), (json!(" 12 "), 12)] {
            let transport = ScriptedTransport::bootstrapped(vec![
                ("getCommunicationToken", json!({ "result": "commtok" })),
                ("authenticateUser", json!({ "result": { "userID": raw, "authToken": "auth" } })),
            ]);
            let (client, _, _) = test_client(transport);
            assert_eq!(client.login("bob", "pw").unwrap().user_id, expected);
        }
    }

    #[test]
    fn empty_auth_token_is_invalid_credentials() {
        let transport = ScriptedTransport::bootstrapped(vec![
            ("getCommunicationToken", json!({ "result": "commtok" })),
            ("authenticateUser", json!({ "result": { "userID": 0, "authToken": "" } })),
        ]);
        let (client, _, _) = test_client(transport);

        let err = client.login("bob", "wrong").unwrap_err();
        assert!(matches!(err, GroovesharkError::InvalidCredentials));
        assert_eq!(client.user(), None);
    }
}
