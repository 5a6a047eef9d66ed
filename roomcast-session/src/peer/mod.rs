mod negotiation;
mod peer_entry;
mod peer_registry;

pub use negotiation::*;
pub use peer_entry::*;
pub use peer_registry::*;
