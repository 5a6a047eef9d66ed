//! Signaling session coordinator for peer-to-peer media rooms.
//!
//! A [`Session`] keeps a signaling channel alive, negotiates one connection
//! per remote participant and reports what happens as [`SessionEvent`]s.

pub mod config;
pub mod engine;
pub mod error;
pub mod media;
pub mod peer;
mod session;
pub mod transport;

pub use config::{ReconnectConfig, SessionConfig, SessionParams, session_key_from_token};
pub use engine::*;
pub use error::{EngineError, SessionError, TransportError};
pub use media::*;
pub use roomcast_core::{Operation, SessionEvent, SessionKey};
pub use session::{EventHandler, Session};
pub use transport::*;
