use crate::engine::EngineFactory;
use crate::session::SessionLoop;
use roomcast_core::SessionEvent;
use tokio::sync::mpsc;
use tracing::{debug, info};

impl<F: EngineFactory> SessionLoop<F> {
    /// Opens a fresh channel. The backoff advanced here is the delay used
    /// before the attempt after this one.
    pub(super) fn connect(&mut self) {
        let next_delay = self.backoff.advance();
        debug!("Next reconnect delay: {:?}", next_delay);

        info!("Connecting to signaling server {}", self.config.signaler_uri);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.channel = Some(self.connector.open(&self.endpoint, events_tx));
        self.channel_rx = Some(events_rx);
    }

    pub(super) async fn handle_close(&mut self, reason: Option<String>) {
        info!("Signaling channel closed: {:?}", reason);
        self.channel = None;
        self.channel_rx = None;

        self.teardown_peers().await;
        self.emit(SessionEvent::ChannelClose { reason });

        if self.stopping {
            return;
        }
        if !self.config.reconnect.enabled {
            info!("Reconnect disabled, staying offline");
            return;
        }

        let delay = self.backoff.current();
        info!("Reconnecting in {:?}", delay);
        self.reconnect_timer = Some(Box::pin(tokio::time::sleep(delay)));
    }

    pub(super) fn begin_stop(&mut self) {
        if self.stopping {
            return;
        }
        info!("Stopping session {}", self.session_key);
        self.stopping = true;
        self.reconnect_timer = None;

        if let Some(channel) = &self.channel {
            channel.close();
        }
    }
}
