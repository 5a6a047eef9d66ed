use crate::error::ProtocolError;
use crate::model::description::{IceCandidateInit, SessionDescription};
use crate::model::session_key::SessionKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Recognized values of a frame's `method` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Sdp,
    Candidate,
    Members,
    Exit,
    Ping,
    Pong,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Sdp => "sdp",
            Method::Candidate => "candidate",
            Method::Members => "members",
            Method::Exit => "exit",
            Method::Ping => "ping",
            Method::Pong => "pong",
        }
    }
}

impl FromStr for Method {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sdp" => Ok(Method::Sdp),
            "candidate" => Ok(Method::Candidate),
            "members" => Ok(Method::Members),
            "exit" => Ok(Method::Exit),
            "ping" => Ok(Method::Ping),
            "pong" => Ok(Method::Pong),
            other => Err(ProtocolError::UnknownMethod(other.to_owned())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    args: Value,
}

#[derive(Deserialize)]
struct SdpArgs {
    src: SessionKey,
    sdp: SessionDescription,
}

#[derive(Deserialize)]
struct CandidateArgs {
    src: SessionKey,
    candidate: IceCandidateInit,
}

#[derive(Deserialize)]
struct MembersArgs {
    members: Vec<SessionKey>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExitArgs {
    session_key: SessionKey,
}

/// Frame received from the signaling server.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundSignal {
    Sdp {
        src: SessionKey,
        sdp: SessionDescription,
    },
    Candidate {
        src: SessionKey,
        candidate: IceCandidateInit,
    },
    Members {
        members: Vec<SessionKey>,
    },
    Exit {
        session_key: SessionKey,
    },
    Ping,
    Pong,
}

impl InboundSignal {
    /// Parses one textual frame of the form `{ "method": ..., "args": { ... } }`.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(ProtocolError::NotAnObject);
        }

        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        let method: Method = envelope.method.parse()?;

        let signal = match method {
            Method::Sdp => {
                let args: SdpArgs = parse_args(method, envelope.args)?;
                InboundSignal::Sdp {
                    src: args.src,
                    sdp: args.sdp,
                }
            }
            Method::Candidate => {
                let args: CandidateArgs = parse_args(method, envelope.args)?;
                InboundSignal::Candidate {
                    src: args.src,
                    candidate: args.candidate,
                }
            }
            Method::Members => {
                let args: MembersArgs = parse_args(method, envelope.args)?;
                InboundSignal::Members {
                    members: args.members,
                }
            }
            Method::Exit => {
                let args: ExitArgs = parse_args(method, envelope.args)?;
                InboundSignal::Exit {
                    session_key: args.session_key,
                }
            }
            Method::Ping => InboundSignal::Ping,
            Method::Pong => InboundSignal::Pong,
        };

        Ok(signal)
    }

    pub fn method(&self) -> Method {
        match self {
            InboundSignal::Sdp { .. } => Method::Sdp,
            InboundSignal::Candidate { .. } => Method::Candidate,
            InboundSignal::Members { .. } => Method::Members,
            InboundSignal::Exit { .. } => Method::Exit,
            InboundSignal::Ping => Method::Ping,
            InboundSignal::Pong => Method::Pong,
        }
    }
}

fn parse_args<T: DeserializeOwned>(method: Method, args: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(args).map_err(|e| ProtocolError::InvalidArgs {
        method: method.as_str(),
        reason: e.to_string(),
    })
}

/// Frame sent to the signaling server.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "method", content = "args", rename_all = "lowercase")]
pub enum OutboundSignal {
    Sdp {
        #[serde(skip_serializing_if = "Option::is_none")]
        src: Option<SessionKey>,
        dst: SessionKey,
        sdp: SessionDescription,
    },
    Candidate {
        #[serde(skip_serializing_if = "Option::is_none")]
        src: Option<SessionKey>,
        dst: SessionKey,
        candidate: IceCandidateInit,
    },
    Pong,
}

impl OutboundSignal {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn method(&self) -> Method {
        match self {
            OutboundSignal::Sdp { .. } => Method::Sdp,
            OutboundSignal::Candidate { .. } => Method::Candidate,
            OutboundSignal::Pong => Method::Pong,
        }
    }

    /// Remote participant the frame is addressed to.
    pub fn dst(&self) -> Option<&SessionKey> {
        match self {
            OutboundSignal::Sdp { dst, .. } | OutboundSignal::Candidate { dst, .. } => Some(dst),
            OutboundSignal::Pong => None,
        }
    }
}
