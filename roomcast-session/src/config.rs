use crate::error::SessionError;
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use roomcast_core::SessionKey;
use roomcast_core::utils::{RECONNECT_MAX_MS, RECONNECT_MIN_STEP_MS, RECONNECT_STEP_MS};
use serde::Deserialize;
use std::time::Duration;

/// Credential the signaling server authenticates the session with.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionParams {
    /// Free-form query string appended to the endpoint as is.
    Query(String),
    /// Signed token whose payload carries a `sessionKey` claim.
    AuthToken(String),
    /// Identity supplied directly.
    SessionKey(SessionKey),
}

impl Default for SessionParams {
    fn default() -> Self {
        SessionParams::Query(String::new())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReconnectConfig {
    pub enabled: bool,
    pub step_ms: u64,
    pub max_ms: u64,
}

impl ReconnectConfig {
    /// Backoff increment, never below `RECONNECT_MIN_STEP_MS`.
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms.max(RECONNECT_MIN_STEP_MS))
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step_ms: RECONNECT_STEP_MS,
            max_ms: RECONNECT_MAX_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Host and path of the signaling server, without scheme.
    pub signaler_uri: String,
    pub params: SessionParams,
    /// `wss` when set, `ws` otherwise.
    pub secure: bool,
    /// Adds `src` with the own key to outbound `sdp` and `candidate` frames.
    pub announce_source: bool,
    pub reconnect: ReconnectConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            signaler_uri: String::new(),
            params: SessionParams::default(),
            secure: true,
            announce_source: false,
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn new(signaler_uri: impl Into<String>, params: SessionParams) -> Self {
        Self {
            signaler_uri: signaler_uri.into(),
            params,
            ..Default::default()
        }
    }

    pub fn with_auth_token(signaler_uri: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(signaler_uri, SessionParams::AuthToken(token.into()))
    }

    pub fn with_session_key(signaler_uri: impl Into<String>, key: impl Into<SessionKey>) -> Self {
        Self::new(signaler_uri, SessionParams::SessionKey(key.into()))
    }

    pub fn with_query(signaler_uri: impl Into<String>, query: impl Into<String>) -> Self {
        Self::new(signaler_uri, SessionParams::Query(query.into()))
    }

    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let query = match &self.params {
            SessionParams::Query(query) => query.clone(),
            SessionParams::AuthToken(token) => format!("authToken={token}"),
            SessionParams::SessionKey(key) => format!("sessionKey={key}"),
        };

        if query.is_empty() {
            format!("{scheme}://{}", self.signaler_uri)
        } else {
            format!("{scheme}://{}?{query}", self.signaler_uri)
        }
    }

    /// Own session key. Falls back to a random key when the query string
    /// does not name one.
    pub fn identity(&self) -> Result<SessionKey, SessionError> {
        match &self.params {
            SessionParams::Query(query) => Ok(query_session_key(query).unwrap_or_else(SessionKey::random)),
            SessionParams::AuthToken(token) => session_key_from_token(token),
            SessionParams::SessionKey(key) => Ok(key.clone()),
        }
    }
}

fn query_session_key(query: &str) -> Option<SessionKey> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == "sessionKey")
        .filter(|(_, value)| !value.is_empty())
        .map(|(_, value)| SessionKey::from(value))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims {
    session_key: SessionKey,
}

/// Reads the `sessionKey` claim from the payload segment of `header.payload.signature`.
pub fn session_key_from_token(token: &str) -> Result<SessionKey, SessionError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| SessionError::InvalidAuthToken("missing payload segment".to_owned()))?;
    let payload = payload.trim_end_matches('=');

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| SessionError::InvalidAuthToken(e.to_string()))?;

    let claims: TokenClaims =
        serde_json::from_slice(&bytes).map_err(|e| SessionError::InvalidAuthToken(e.to_string()))?;

    Ok(claims.session_key)
}
