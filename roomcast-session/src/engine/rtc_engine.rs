use crate::engine::{
    EngineEvent, EngineEventSink, EngineFactory, MediaTrack, NegotiationEngine, RtcEngineConfig,
    SenderInfo,
};
use crate::error::EngineError;
use async_trait::async_trait;
use dashmap::DashMap;
use roomcast_core::{
    IceCandidateInit, IceConnectionState, SdpType, SessionDescription, SessionKey, SignalingState,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Local track handle accepted by [`RtcEngine`].
pub type RtcTrack = Arc<dyn TrackLocal + Send + Sync>;

impl MediaTrack for RtcTrack {
    fn id(&self) -> &str {
        TrackLocal::id(self.as_ref())
    }
}

/// Creates `webrtc` peer connections and keeps the remote tracks they
/// receive so the host can read media from them.
#[derive(Clone)]
pub struct RtcEngineFactory {
    config: RtcEngineConfig,
    remote_tracks: Arc<DashMap<String, Arc<TrackRemote>>>,
}

impl RtcEngineFactory {
    pub fn new(config: RtcEngineConfig) -> Self {
        Self {
            config,
            remote_tracks: Arc::new(DashMap::new()),
        }
    }

    /// Remote track announced by a `MediaStart` event.
    pub fn remote_track(&self, track_id: &str) -> Option<Arc<TrackRemote>> {
        self.remote_tracks.get(track_id).map(|t| t.value().clone())
    }

    pub fn remote_tracks_of(&self, stream_id: &str) -> Vec<Arc<TrackRemote>> {
        self.remote_tracks
            .iter()
            .filter(|entry| entry.value().stream_id() == stream_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for RtcEngineFactory {
    fn default() -> Self {
        Self::new(RtcEngineConfig::default())
    }
}

#[async_trait]
impl EngineFactory for RtcEngineFactory {
    type Engine = RtcEngine;

    async fn create(
        &self,
        session_key: &SessionKey,
        events: EngineEventSink,
    ) -> Result<RtcEngine, EngineError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: self
                .config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        if self.config.receive_audio {
            peer_connection
                .add_transceiver_from_kind(RTPCodecType::Audio, None)
                .await?;
        }
        if self.config.receive_video {
            peer_connection
                .add_transceiver_from_kind(RTPCodecType::Video, None)
                .await?;
        }

        let received: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));

        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let sink = ice_events.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(json_candidate) = candidate.to_json() else {
                    return;
                };
                match from_rtc_candidate(json_candidate) {
                    Ok(candidate) => {
                        sink.emit(EngineEvent::IceCandidate(candidate));
                    }
                    Err(e) => debug!("Skipping local candidate for {}: {}", sink.session_key(), e),
                }
            })
        }));

        let ice_state_events = events.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let sink = ice_state_events.clone();

                Box::pin(async move {
                    debug!("ICE connection state for {}: {}", sink.session_key(), s);
                    if let Some(state) = ice_state(s) {
                        sink.emit(EngineEvent::ConnectionStateChanged(state));
                    }
                })
            },
        ));

        let signaling_events = events.clone();
        peer_connection.on_signaling_state_change(Box::new(move |s: RTCSignalingState| {
            let sink = signaling_events.clone();

            Box::pin(async move {
                if let Some(state) = signaling_state(s) {
                    sink.emit(EngineEvent::SignalingStateChanged(state));
                }
            })
        }));

        let track_events = events.clone();
        let track_registry = self.remote_tracks.clone();
        let received_tracks = received.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let sink = track_events.clone();
                let registry = track_registry.clone();
                let received = received_tracks.clone();

                Box::pin(async move {
                    let stream_id = track.stream_id();
                    let track_id = track.id();
                    info!(
                        "Remote track {} (stream {}) from {}",
                        track_id,
                        stream_id,
                        sink.session_key()
                    );

                    registry.insert(track_id.clone(), track);
                    if let Ok(mut received) = received.lock() {
                        received.push((stream_id.clone(), track_id.clone()));
                    }
                    sink.emit(EngineEvent::TrackAdded {
                        stream_id,
                        track_id,
                    });
                })
            },
        ));

        // webrtc has no per-track "ended" signal; remote tracks end with the connection.
        let state_events = events.clone();
        let ended_registry = self.remote_tracks.clone();
        let ended_tracks = received.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let sink = state_events.clone();
                let registry = ended_registry.clone();
                let received = ended_tracks.clone();

                Box::pin(async move {
                    info!("Peer connection state for {}: {:?}", sink.session_key(), s);
                    if !matches!(
                        s,
                        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Closed
                    ) {
                        return;
                    }

                    let ended: Vec<(String, String)> = match received.lock() {
                        Ok(mut received) => received.drain(..).collect(),
                        Err(_) => return,
                    };
                    for (stream_id, track_id) in ended {
                        registry.remove(&track_id);
                        sink.emit(EngineEvent::TrackEnded {
                            stream_id,
                            track_id,
                        });
                    }
                })
            },
        ));

        Ok(RtcEngine {
            session_key: session_key.clone(),
            peer_connection,
        })
    }
}

/// Negotiation engine backed by a `webrtc` peer connection.
pub struct RtcEngine {
    session_key: SessionKey,
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcEngine {
    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }
}

#[async_trait]
impl NegotiationEngine for RtcEngine {
    type Track = RtcTrack;
    type Sender = Arc<RTCRtpSender>;

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        let offer = self.peer_connection.create_offer(None).await?;
        from_rtc_description(&offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        let answer = self.peer_connection.create_answer(None).await?;
        from_rtc_description(&answer)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        let mut desc = desc;
        // An empty rollback is rejected by webrtc; it needs the offer being discarded.
        if desc.sdp_type == SdpType::Rollback && desc.sdp.is_empty() {
            if let Some(pending) = self.peer_connection.pending_local_description().await {
                desc.sdp = pending.sdp;
            }
        }

        let desc = to_rtc_description(&desc)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        let desc = to_rtc_description(&desc)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidateInit) -> Result<(), EngineError> {
        let candidate = to_rtc_candidate(&candidate)?;
        self.peer_connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn add_track(&self, track: &RtcTrack, stream_id: &str) -> Result<(), EngineError> {
        debug!(
            "Adding track {} of stream {} for {}",
            MediaTrack::id(track),
            stream_id,
            self.session_key
        );
        self.peer_connection.add_track(Arc::clone(track)).await?;
        Ok(())
    }

    async fn remove_track(&self, sender: &Arc<RTCRtpSender>) -> Result<(), EngineError> {
        self.peer_connection.remove_track(sender).await?;
        Ok(())
    }

    async fn senders(&self) -> Vec<SenderInfo<Arc<RTCRtpSender>>> {
        let mut senders = Vec::new();
        for sender in self.peer_connection.get_senders().await {
            let track_id = sender
                .track()
                .await
                .map(|track| TrackLocal::id(track.as_ref()).to_owned());
            senders.push(SenderInfo { sender, track_id });
        }
        senders
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn to_rtc_description(desc: &SessionDescription) -> Result<RTCSessionDescription, EngineError> {
    serde_json::to_value(desc)
        .and_then(serde_json::from_value)
        .map_err(|e| EngineError::InvalidDescription(e.to_string()))
}

fn from_rtc_description(desc: &RTCSessionDescription) -> Result<SessionDescription, EngineError> {
    serde_json::to_value(desc)
        .and_then(serde_json::from_value)
        .map_err(|e| EngineError::InvalidDescription(e.to_string()))
}

fn to_rtc_candidate(candidate: &IceCandidateInit) -> Result<RTCIceCandidateInit, EngineError> {
    serde_json::to_value(candidate)
        .and_then(serde_json::from_value)
        .map_err(|e| EngineError::InvalidCandidate(e.to_string()))
}

fn from_rtc_candidate(candidate: RTCIceCandidateInit) -> Result<IceCandidateInit, EngineError> {
    serde_json::to_value(candidate)
        .and_then(serde_json::from_value)
        .map_err(|e| EngineError::InvalidCandidate(e.to_string()))
}

fn ice_state(state: RTCIceConnectionState) -> Option<IceConnectionState> {
    match state {
        RTCIceConnectionState::New => Some(IceConnectionState::New),
        RTCIceConnectionState::Checking => Some(IceConnectionState::Checking),
        RTCIceConnectionState::Connected => Some(IceConnectionState::Connected),
        RTCIceConnectionState::Completed => Some(IceConnectionState::Completed),
        RTCIceConnectionState::Disconnected => Some(IceConnectionState::Disconnected),
        RTCIceConnectionState::Failed => Some(IceConnectionState::Failed),
        RTCIceConnectionState::Closed => Some(IceConnectionState::Closed),
        _ => None,
    }
}

fn signaling_state(state: RTCSignalingState) -> Option<SignalingState> {
    match state {
        RTCSignalingState::Stable => Some(SignalingState::Stable),
        RTCSignalingState::HaveLocalOffer => Some(SignalingState::HaveLocalOffer),
        RTCSignalingState::HaveRemoteOffer => Some(SignalingState::HaveRemoteOffer),
        RTCSignalingState::HaveLocalPranswer => Some(SignalingState::HaveLocalPranswer),
        RTCSignalingState::HaveRemotePranswer => Some(SignalingState::HaveRemotePranswer),
        RTCSignalingState::Closed => Some(SignalingState::Closed),
        _ => None,
    }
}
