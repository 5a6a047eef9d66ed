#[cfg(feature = "native")]
mod engine_config;
mod engine_event;
mod negotiation_engine;
#[cfg(feature = "native")]
mod rtc_engine;

#[cfg(feature = "native")]
pub use engine_config::*;
pub use engine_event::EngineEvent;
pub use engine_event::EngineEventSink;
pub(crate) use engine_event::PeerEvent;
pub use negotiation_engine::*;
#[cfg(feature = "native")]
pub use rtc_engine::*;
