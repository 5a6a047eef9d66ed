use roomcast_core::IceServerConfig;
use roomcast_core::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use serde::Deserialize;

/// Settings applied to every peer connection the native engine creates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RtcEngineConfig {
    pub ice_servers: Vec<IceServerConfig>,
    /// Adds an audio transceiver so offers ask for remote audio.
    pub receive_audio: bool,
    /// Adds a video transceiver so offers ask for remote video.
    pub receive_video: bool,
}

impl Default for RtcEngineConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned(), DEFAULT_STUN_ADDR_2.to_owned()],
                username: None,
                credential: None,
            }],
            receive_audio: true,
            receive_video: true,
        }
    }
}
