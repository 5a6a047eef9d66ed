use crate::model::session_key::SessionKey;
use crate::model::state::{IceConnectionState, SignalingState};
use serde::Serialize;
use std::fmt;

/// Step during which a recoverable failure happened.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreatePeer,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription,
    SetRemoteDescription,
    AddIceCandidate,
    AddTrack,
    RemoveTrack,
    ClosePeer,
    SendFrame,
    DecodeFrame,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::CreatePeer => "Failed to create peer connection",
            Operation::CreateOffer => "Failed to create local offer",
            Operation::CreateAnswer => "Failed to create local answer",
            Operation::SetLocalDescription => "Failed to set local description",
            Operation::SetRemoteDescription => "Failed to handle SDP",
            Operation::AddIceCandidate => "Failed to add ice candidate",
            Operation::AddTrack => "Failed to add local track",
            Operation::RemoveTrack => "Failed to remove local track",
            Operation::ClosePeer => "Failed to close peer connection",
            Operation::SendFrame => "Failed to send signaling frame",
            Operation::DecodeFrame => "Failed to handle signaling frame",
        };
        f.write_str(s)
    }
}

/// Notification delivered to the host's event handler.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    ChannelOpen,
    ChannelError {
        message: String,
    },
    ChannelClose {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    MediaStart {
        session_key: SessionKey,
        stream_id: String,
        track_id: String,
    },
    #[serde(rename_all = "camelCase")]
    MediaStop {
        session_key: SessionKey,
        stream_id: String,
    },
    #[serde(rename_all = "camelCase")]
    PeerEnterRoom { session_key: SessionKey },
    #[serde(rename_all = "camelCase")]
    PeerLeaveRoom { session_key: SessionKey },
    #[serde(rename = "PEER_P2P_MEDIA_STATUS", rename_all = "camelCase")]
    PeerMediaStatus {
        session_key: SessionKey,
        media_state: IceConnectionState,
    },
    #[serde(rename = "PEER_P2P_SIGNALING_STATUS", rename_all = "camelCase")]
    PeerSignalingStatus {
        session_key: SessionKey,
        signaling_state: SignalingState,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        operation: Operation,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_key: Option<SessionKey>,
        message: String,
    },
}

impl SessionEvent {
    /// Remote participant the event refers to, if any.
    pub fn session_key(&self) -> Option<&SessionKey> {
        match self {
            SessionEvent::MediaStart { session_key, .. }
            | SessionEvent::MediaStop { session_key, .. }
            | SessionEvent::PeerEnterRoom { session_key }
            | SessionEvent::PeerLeaveRoom { session_key }
            | SessionEvent::PeerMediaStatus { session_key, .. }
            | SessionEvent::PeerSignalingStatus { session_key, .. } => Some(session_key),
            SessionEvent::Error { session_key, .. } => session_key.as_ref(),
            SessionEvent::ChannelOpen
            | SessionEvent::ChannelError { .. }
            | SessionEvent::ChannelClose { .. } => None,
        }
    }
}
