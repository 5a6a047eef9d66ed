mod backoff;
mod channel;
mod channel_event;
#[cfg(feature = "native")]
mod ws_connector;

pub use backoff::*;
pub use channel::*;
pub use channel_event::*;
#[cfg(feature = "native")]
pub use ws_connector::*;
