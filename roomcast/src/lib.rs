pub use roomcast_core::{SessionEvent, SessionKey};

pub mod model {
    pub use roomcast_core::model::*;
}

pub mod session {
    pub use roomcast_session::*;
}
