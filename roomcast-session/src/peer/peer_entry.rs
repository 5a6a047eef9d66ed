use crate::engine::NegotiationEngine;
use crate::error::EngineError;
use crate::media::MediaStream;
use crate::peer::NegotiationState;
use roomcast_core::SessionKey;
use std::collections::HashSet;
use tracing::debug;

/// One remote participant and the connection negotiated with it.
pub struct PeerEntry<E: NegotiationEngine> {
    session_key: SessionKey,
    engine: E,
    surfaced_streams: HashSet<String>,
    pub(crate) state: NegotiationState,
    /// Set when a local offer was rolled back and still needs sending.
    pub(crate) renegotiate_pending: bool,
    generation: u64,
}

impl<E: NegotiationEngine> PeerEntry<E> {
    pub fn new(session_key: SessionKey, engine: E, generation: u64) -> Self {
        Self {
            session_key,
            engine,
            surfaced_streams: HashSet::new(),
            state: NegotiationState::Idle,
            renegotiate_pending: false,
            generation,
        }
    }

    pub fn session_key(&self) -> &SessionKey {
        &self.session_key
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a remote stream. Returns `true` the first time it is seen.
    pub fn surface_stream(&mut self, stream_id: &str) -> bool {
        self.surfaced_streams.insert(stream_id.to_owned())
    }

    /// Forgets a remote stream. Returns `true` if it had been surfaced.
    pub fn end_stream(&mut self, stream_id: &str) -> bool {
        self.surfaced_streams.remove(stream_id)
    }

    /// Attaches every track of `stream`, collecting the tracks that failed.
    pub async fn attach_stream(&self, stream: &MediaStream<E::Track>) -> Vec<EngineError> {
        let mut failures = Vec::new();
        for track in stream.tracks() {
            if let Err(e) = self.engine.add_track(track, stream.id()).await {
                failures.push(e);
            }
        }
        failures
    }

    /// Removes every outbound sender carrying a track of `stream`.
    pub async fn detach_stream(&self, stream: &MediaStream<E::Track>) -> Vec<EngineError> {
        let mut failures = Vec::new();
        for info in self.engine.senders().await {
            let carries_stream = info
                .track_id
                .as_deref()
                .is_some_and(|id| stream.contains_track(id));
            if !carries_stream {
                continue;
            }

            debug!(
                "Removing sender of track {:?} from {}",
                info.track_id, self.session_key
            );
            if let Err(e) = self.engine.remove_track(&info.sender).await {
                failures.push(e);
            }
        }
        failures
    }

    pub async fn close(self) -> Result<(), EngineError> {
        self.engine.close().await
    }
}
