use crate::engine::{EngineEvent, EngineEventSink, EngineFactory, PeerEvent};
use crate::peer::PeerEntry;
use crate::session::SessionLoop;
use roomcast_core::{Operation, OutboundSignal, SessionEvent, SessionKey};
use tracing::{debug, info};

impl<F: EngineFactory> SessionLoop<F> {
    /// Makes sure an entry exists for `key`. Returns `false` if the engine
    /// could not create a connection.
    pub(super) async fn get_or_create(&mut self, key: &SessionKey) -> bool {
        if self.peers.contains(key) {
            return true;
        }

        let generation = self.peers.next_generation();
        let sink = EngineEventSink::new(key.clone(), generation, self.peer_tx.clone());

        let engine = match self.factory.create(key, sink).await {
            Ok(engine) => engine,
            Err(e) => {
                self.report(Operation::CreatePeer, Some(key), e);
                return false;
            }
        };

        let entry = PeerEntry::new(key.clone(), engine, generation);
        let mut failures = Vec::new();
        for stream in self.media.iter() {
            failures.extend(entry.attach_stream(stream).await);
        }
        self.peers.insert(entry);

        info!("Peer {} entered the room", key);
        self.emit(SessionEvent::PeerEnterRoom {
            session_key: key.clone(),
        });
        for e in failures {
            self.report(Operation::AddTrack, Some(key), e);
        }

        true
    }

    /// Closes and forgets the entry for `key`. The leave event is emitted
    /// even when no entry existed.
    pub(super) async fn remove_peer(&mut self, key: &SessionKey) {
        if let Some(entry) = self.peers.remove(key) {
            if let Err(e) = entry.close().await {
                self.report(Operation::ClosePeer, Some(key), e);
            }
        }

        info!("Peer {} left the room", key);
        self.emit(SessionEvent::PeerLeaveRoom {
            session_key: key.clone(),
        });
    }

    pub(super) async fn teardown_peers(&mut self) {
        for key in self.peers.keys() {
            self.remove_peer(&key).await;
        }
    }

    pub(super) async fn handle_peer_event(&mut self, evt: PeerEvent) {
        let PeerEvent {
            session_key,
            generation,
            event,
        } = evt;

        let Some(entry) = self.peers.get_current(&session_key, generation) else {
            debug!("Dropping event from stale connection to {}", session_key);
            return;
        };

        match event {
            EngineEvent::IceCandidate(candidate) => {
                let src = self.announced_source();
                self.send(OutboundSignal::Candidate {
                    src,
                    dst: session_key,
                    candidate,
                });
            }

            EngineEvent::ConnectionStateChanged(media_state) => {
                self.emit(SessionEvent::PeerMediaStatus {
                    session_key,
                    media_state,
                });
            }

            EngineEvent::SignalingStateChanged(signaling_state) => {
                self.emit(SessionEvent::PeerSignalingStatus {
                    session_key,
                    signaling_state,
                });
            }

            EngineEvent::TrackAdded {
                stream_id,
                track_id,
            } => {
                if !entry.surface_stream(&stream_id) {
                    debug!("Stream {} from {} already surfaced", stream_id, session_key);
                    return;
                }
                info!("Media started: stream {} from {}", stream_id, session_key);
                self.emit(SessionEvent::MediaStart {
                    session_key,
                    stream_id,
                    track_id,
                });
            }

            EngineEvent::TrackEnded { stream_id, .. } => {
                if !entry.end_stream(&stream_id) {
                    return;
                }
                info!("Media stopped: stream {} from {}", stream_id, session_key);
                self.emit(SessionEvent::MediaStop {
                    session_key,
                    stream_id,
                });
            }
        }
    }
}
