use async_trait::async_trait;
use roomcast_core::{IceCandidateInit, SdpType, SessionDescription, SessionKey};
use roomcast_session::{
    EngineError, EngineEvent, EngineEventSink, EngineFactory, MediaStream, MediaTrack,
    NegotiationEngine, SenderInfo,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct MockTrack {
    id: String,
}

impl MockTrack {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_owned() }
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn stream(id: &str, track_ids: &[&str]) -> MediaStream<MockTrack> {
    MediaStream::new(id, track_ids.iter().map(|t| MockTrack::new(t)).collect())
}

/// Engine operation as recorded by [`MockEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpType),
    SetRemote(SdpType),
    AddCandidate(String),
    AddTrack { track_id: String, stream_id: String },
    RemoveTrack(String),
    Close,
}

#[derive(Default)]
struct FactoryState {
    peers: Vec<MockPeerHandle>,
    failing: HashSet<&'static str>,
    fail_create: bool,
}

/// Test view of one engine created by the factory.
#[derive(Clone)]
pub struct MockPeerHandle {
    pub session_key: SessionKey,
    calls: Arc<Mutex<Vec<EngineCall>>>,
    senders: Arc<Mutex<Vec<(u64, String)>>>,
    sink: EngineEventSink,
}

impl MockPeerHandle {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Track ids currently carried by outbound senders.
    pub fn sender_tracks(&self) -> Vec<String> {
        self.senders
            .lock()
            .unwrap()
            .iter()
            .map(|(_, track_id)| track_id.clone())
            .collect()
    }

    /// Raises an engine event as the real engine's callbacks would.
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.sink.emit(event)
    }

    pub fn is_closed(&self) -> bool {
        self.calls().contains(&EngineCall::Close)
    }
}

#[derive(Clone, Default)]
pub struct MockEngineFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl MockEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every engine fail the named operation, e.g. `"create_answer"`.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    pub fn fail_create(&self) {
        self.state.lock().unwrap().fail_create = true;
    }

    /// Latest engine created for `key`.
    pub fn peer(&self, key: &str) -> Option<MockPeerHandle> {
        self.state
            .lock()
            .unwrap()
            .peers
            .iter()
            .rev()
            .find(|p| p.session_key.as_str() == key)
            .cloned()
    }

    pub fn created_count(&self) -> usize {
        self.state.lock().unwrap().peers.len()
    }
}

#[async_trait]
impl EngineFactory for MockEngineFactory {
    type Engine = MockEngine;

    async fn create(
        &self,
        session_key: &SessionKey,
        events: EngineEventSink,
    ) -> Result<MockEngine, EngineError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(EngineError::Failure("engine unavailable".to_owned()));
        }

        let handle = MockPeerHandle {
            session_key: session_key.clone(),
            calls: Arc::new(Mutex::new(Vec::new())),
            senders: Arc::new(Mutex::new(Vec::new())),
            sink: events,
        };
        state.peers.push(handle.clone());

        Ok(MockEngine {
            handle,
            factory: self.state.clone(),
            next_sender: Mutex::new(0),
        })
    }
}

pub struct MockEngine {
    handle: MockPeerHandle,
    factory: Arc<Mutex<FactoryState>>,
    next_sender: Mutex<u64>,
}

impl MockEngine {
    fn record(&self, call: EngineCall, operation: &'static str) -> Result<(), EngineError> {
        self.handle.calls.lock().unwrap().push(call);
        if self.factory.lock().unwrap().failing.contains(operation) {
            return Err(EngineError::Failure(format!("{operation} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl NegotiationEngine for MockEngine {
    type Track = MockTrack;
    type Sender = u64;

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        self.record(EngineCall::CreateOffer, "create_offer")?;
        Ok(SessionDescription::offer(format!(
            "offer-to-{}",
            self.handle.session_key
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        self.record(EngineCall::CreateAnswer, "create_answer")?;
        Ok(SessionDescription::answer(format!(
            "answer-to-{}",
            self.handle.session_key
        )))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.record(EngineCall::SetLocal(desc.sdp_type), "set_local_description")
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.record(EngineCall::SetRemote(desc.sdp_type), "set_remote_description")
    }

    async fn add_ice_candidate(&self, candidate: IceCandidateInit) -> Result<(), EngineError> {
        self.record(EngineCall::AddCandidate(candidate.candidate), "add_ice_candidate")
    }

    async fn add_track(&self, track: &MockTrack, stream_id: &str) -> Result<(), EngineError> {
        self.record(
            EngineCall::AddTrack {
                track_id: track.id().to_owned(),
                stream_id: stream_id.to_owned(),
            },
            "add_track",
        )?;

        let mut next = self.next_sender.lock().unwrap();
        *next += 1;
        self.handle
            .senders
            .lock()
            .unwrap()
            .push((*next, track.id().to_owned()));
        Ok(())
    }

    async fn remove_track(&self, sender: &u64) -> Result<(), EngineError> {
        let mut senders = self.handle.senders.lock().unwrap();
        let Some(index) = senders.iter().position(|(id, _)| id == sender) else {
            return Err(EngineError::Failure("unknown sender".to_owned()));
        };
        let (_, track_id) = senders.remove(index);
        drop(senders);

        self.record(EngineCall::RemoveTrack(track_id), "remove_track")
    }

    async fn senders(&self) -> Vec<SenderInfo<u64>> {
        self.handle
            .senders
            .lock()
            .unwrap()
            .iter()
            .map(|(id, track_id)| SenderInfo {
                sender: *id,
                track_id: Some(track_id.clone()),
            })
            .collect()
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.record(EngineCall::Close, "close")
    }
}
