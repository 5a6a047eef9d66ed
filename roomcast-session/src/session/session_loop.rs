use crate::config::SessionConfig;
use crate::engine::{EngineFactory, PeerEvent, TrackOf};
use crate::media::{LocalMediaSet, MediaStream};
use crate::peer::PeerRegistry;
use crate::session::{EventHandler, SessionCommand};
use crate::transport::{Backoff, ChannelConnector, ChannelEvent, SignalingChannel};
use roomcast_core::{Operation, SessionEvent, SessionKey};
use std::fmt::Display;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tracing::{debug, info, warn};

/// State owned by the running session task.
///
/// Every mutation of the peer registry and the local media set happens on
/// this task, one input at a time.
pub(crate) struct SessionLoop<F: EngineFactory> {
    pub(super) session_key: SessionKey,
    pub(super) config: SessionConfig,
    pub(super) endpoint: String,
    pub(super) connector: Arc<dyn ChannelConnector>,
    pub(super) factory: F,
    pub(super) peers: PeerRegistry<F::Engine>,
    pub(super) media: LocalMediaSet<TrackOf<F>>,
    pub(super) channel: Option<Box<dyn SignalingChannel>>,
    pub(super) channel_rx: Option<mpsc::UnboundedReceiver<ChannelEvent>>,
    pub(super) backoff: Backoff,
    pub(super) reconnect_timer: Option<Pin<Box<Sleep>>>,
    pub(super) stopping: bool,
    command_rx: mpsc::UnboundedReceiver<SessionCommand<TrackOf<F>>>,
    commands_closed: bool,
    peer_rx: mpsc::UnboundedReceiver<PeerEvent>,
    pub(super) peer_tx: mpsc::UnboundedSender<PeerEvent>,
    handler: Option<EventHandler>,
}

impl<F: EngineFactory> SessionLoop<F> {
    pub(crate) fn new(
        session_key: SessionKey,
        config: SessionConfig,
        connector: Arc<dyn ChannelConnector>,
        factory: F,
        command_rx: mpsc::UnboundedReceiver<SessionCommand<TrackOf<F>>>,
    ) -> Self {
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        let backoff = Backoff::new(config.reconnect.step(), config.reconnect.max());

        Self {
            session_key,
            endpoint: config.endpoint(),
            config,
            connector,
            factory,
            peers: PeerRegistry::new(),
            media: LocalMediaSet::new(),
            channel: None,
            channel_rx: None,
            backoff,
            reconnect_timer: None,
            stopping: false,
            command_rx,
            commands_closed: false,
            peer_rx,
            peer_tx,
            handler: None,
        }
    }

    pub(crate) async fn run(mut self, handler: EventHandler) {
        self.handler = Some(handler);
        info!("Session {} started", self.session_key);

        self.connect();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv(), if !self.commands_closed => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Session handle dropped. Stopping session.");
                            self.commands_closed = true;
                            self.begin_stop();
                        }
                    }
                }

                evt = next_channel_event(&mut self.channel_rx) => {
                    self.handle_channel_event(evt).await;
                }

                Some(evt) = self.peer_rx.recv() => {
                    self.handle_peer_event(evt).await;
                }

                _ = wait_reconnect(&mut self.reconnect_timer) => {
                    self.reconnect_timer = None;
                    self.connect();
                }
            }

            if self.stopping && self.channel.is_none() {
                break;
            }
        }

        info!("Session {} finished", self.session_key);
    }

    async fn handle_command(&mut self, cmd: SessionCommand<TrackOf<F>>) {
        match cmd {
            SessionCommand::AddMedia { stream, done } => {
                self.add_media(stream).await;
                let _ = done.send(());
            }

            SessionCommand::RemoveMedia { stream, done } => {
                self.remove_media(stream).await;
                let _ = done.send(());
            }

            SessionCommand::Stop => self.begin_stop(),
        }
    }

    async fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Open => {
                info!("Signaling channel open");
                self.emit(SessionEvent::ChannelOpen);
            }

            ChannelEvent::Message(text) => self.handle_frame(&text).await,

            ChannelEvent::Undecodable(message) => self.drop_frame(message),

            ChannelEvent::Error(message) => {
                warn!("Signaling channel error: {}", message);
                self.emit(SessionEvent::ChannelError { message });
            }

            ChannelEvent::Closed(reason) => self.handle_close(reason).await,
        }
    }

    /// Stages a stream before the loop runs.
    pub(crate) fn stage_media(&mut self, stream: MediaStream<TrackOf<F>>) {
        if !self.media.add(stream) {
            warn!("Local stream already added, ignoring");
        }
    }

    pub(crate) fn unstage_media(&mut self, stream_id: &str) {
        if self.media.remove(stream_id).is_none() {
            debug!("Local stream {} was not added", stream_id);
        }
    }

    pub(super) fn emit(&mut self, event: SessionEvent) {
        debug!("Session event: {:?}", event);
        if let Some(handler) = self.handler.as_mut() {
            handler(event);
        }
    }

    /// Converts a recoverable failure into an `Error` event.
    pub(super) fn report(
        &mut self,
        operation: Operation,
        session_key: Option<&SessionKey>,
        cause: impl Display,
    ) {
        let message = cause.to_string();
        match session_key {
            Some(key) => warn!("{} for {}: {}", operation, key, message),
            None => warn!("{}: {}", operation, message),
        }

        self.emit(SessionEvent::Error {
            operation,
            session_key: session_key.cloned(),
            message,
        });
    }
}

async fn next_channel_event(rx: &mut Option<mpsc::UnboundedReceiver<ChannelEvent>>) -> ChannelEvent {
    match rx {
        Some(rx) => rx.recv().await.unwrap_or(ChannelEvent::Closed(None)),
        None => std::future::pending().await,
    }
}

async fn wait_reconnect(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}
