use crate::engine::EngineEventSink;
use crate::error::EngineError;
use async_trait::async_trait;
use roomcast_core::{IceCandidateInit, SessionDescription, SessionKey};

/// Locally captured track as seen by the session.
pub trait MediaTrack: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Outbound sender together with the id of the track it carries.
#[derive(Debug, Clone)]
pub struct SenderInfo<S> {
    pub sender: S,
    pub track_id: Option<String>,
}

/// One negotiation connection to a remote participant.
///
/// Every method may suspend until the underlying media engine completes the
/// operation. State changes are pushed through the [`EngineEventSink`] handed
/// to [`EngineFactory::create`].
#[async_trait]
pub trait NegotiationEngine: Send + Sync + 'static {
    type Track: MediaTrack;
    type Sender: Send + Sync + 'static;

    async fn create_offer(&self) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn add_ice_candidate(&self, candidate: IceCandidateInit) -> Result<(), EngineError>;

    async fn add_track(&self, track: &Self::Track, stream_id: &str) -> Result<(), EngineError>;

    async fn remove_track(&self, sender: &Self::Sender) -> Result<(), EngineError>;

    async fn senders(&self) -> Vec<SenderInfo<Self::Sender>>;

    async fn close(&self) -> Result<(), EngineError>;
}

#[async_trait]
pub trait EngineFactory: Send + Sync + 'static {
    type Engine: NegotiationEngine;

    async fn create(
        &self,
        session_key: &SessionKey,
        events: EngineEventSink,
    ) -> Result<Self::Engine, EngineError>;
}

/// Local track type accepted by sessions built on `F`.
pub type TrackOf<F> = <<F as EngineFactory>::Engine as NegotiationEngine>::Track;
