use roomcast_core::{IceCandidateInit, IceConnectionState, SessionKey, SignalingState};
use tokio::sync::mpsc;

/// Notifications a negotiation engine raises about its connection.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A local candidate was gathered and must reach the remote side.
    IceCandidate(IceCandidateInit),

    ConnectionStateChanged(IceConnectionState),

    SignalingStateChanged(SignalingState),

    /// A remote track arrived, grouped under its stream.
    TrackAdded { stream_id: String, track_id: String },

    /// A remote track stopped delivering media.
    TrackEnded { stream_id: String, track_id: String },
}

#[derive(Debug)]
pub(crate) struct PeerEvent {
    pub session_key: SessionKey,
    pub generation: u64,
    pub event: EngineEvent,
}

/// Sender half handed to one engine. Tags every event with the peer it
/// belongs to.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    session_key: SessionKey,
    generation: u64,
    tx: mpsc::UnboundedSender<PeerEvent>,
}

impl EngineEventSink {
    pub(crate) fn new(
        session_key: SessionKey,
        generation: u64,
        tx: mpsc::UnboundedSender<PeerEvent>,
    ) -> Self {
        Self {
            session_key,
            generation,
            tx,
        }
    }

    pub fn session_key(&self) -> &SessionKey {
        &self.session_key
    }

    /// Returns `false` once the session has shut down.
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.tx
            .send(PeerEvent {
                session_key: self.session_key.clone(),
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}
