mod description;
mod event;
mod session_key;
mod signaling;
mod state;

pub use description::{IceCandidateInit, IceServerConfig, SdpType, SessionDescription};
pub use event::{Operation, SessionEvent};
pub use session_key::SessionKey;
pub use signaling::{InboundSignal, Method, OutboundSignal};
pub use state::{IceConnectionState, SignalingState};
