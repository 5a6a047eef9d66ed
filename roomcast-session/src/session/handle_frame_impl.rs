use crate::engine::EngineFactory;
use crate::session::SessionLoop;
use roomcast_core::{InboundSignal, Operation, OutboundSignal, SessionEvent};
use tracing::{debug, warn};

impl<F: EngineFactory> SessionLoop<F> {
    /// Decodes one inbound frame and runs its handler. A frame that cannot be
    /// decoded is reported and dropped; the channel stays up.
    pub(super) async fn handle_frame(&mut self, text: &str) {
        let signal = match InboundSignal::decode(text) {
            Ok(signal) => signal,
            Err(e) => {
                self.drop_frame(e.to_string());
                return;
            }
        };

        debug!("Inbound {} frame", signal.method());

        match signal {
            InboundSignal::Members { members } => self.handle_members(members).await,
            InboundSignal::Sdp { src, sdp } => self.handle_sdp(src, sdp).await,
            InboundSignal::Candidate { src, candidate } => {
                self.handle_candidate(src, candidate).await
            }
            InboundSignal::Exit { session_key } => self.remove_peer(&session_key).await,
            InboundSignal::Ping => self.send(OutboundSignal::Pong),
            InboundSignal::Pong => {}
        }
    }

    pub(super) fn drop_frame(&mut self, message: String) {
        warn!("Dropping inbound frame: {}", message);
        self.emit(SessionEvent::Error {
            operation: Operation::DecodeFrame,
            session_key: None,
            message,
        });
    }
}
