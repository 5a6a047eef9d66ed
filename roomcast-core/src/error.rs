use thiserror::Error;

/// Inbound frame that cannot be dispatched. Fatal to that frame only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("failed to parse frame: {0}")]
    Malformed(String),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("unrecognized method `{0}`")]
    UnknownMethod(String),

    #[error("invalid arguments for `{method}`: {reason}")]
    InvalidArgs { method: &'static str, reason: String },
}
