use thiserror::Error;

/// Precondition and configuration failures surfaced to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("an event handler must be set before the session is started")]
    MissingEventHandler,

    #[error("a session may only be started once")]
    AlreadyStarted,

    #[error("the session is no longer running")]
    NotRunning,

    #[error("invalid auth token: {0}")]
    InvalidAuthToken(String),
}

/// Failure reported by a negotiation engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0}")]
    Failure(String),

    #[error("invalid session description: {0}")]
    InvalidDescription(String),

    #[error("invalid ice candidate: {0}")]
    InvalidCandidate(String),

    #[error("peer connection is closed")]
    Closed,
}

/// Failure reported by a signaling channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("signaling channel is closed")]
    Closed,
}

#[cfg(feature = "native")]
impl From<webrtc::Error> for EngineError {
    fn from(e: webrtc::Error) -> Self {
        EngineError::Failure(e.to_string())
    }
}
