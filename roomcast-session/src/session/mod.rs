mod handle_frame_impl;
mod media_impl;
mod negotiate_impl;
mod peer_lifecycle_impl;
mod reconnect_impl;
mod session;
mod session_command;
mod session_loop;

pub use session::*;
pub(crate) use session_command::*;
pub(crate) use session_loop::*;
