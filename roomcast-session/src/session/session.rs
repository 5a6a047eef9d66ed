use crate::config::SessionConfig;
use crate::engine::{EngineFactory, TrackOf};
use crate::error::SessionError;
use crate::media::MediaStream;
use crate::session::{SessionCommand, SessionLoop};
use crate::transport::ChannelConnector;
use roomcast_core::{SessionEvent, SessionKey};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Callback receiving every [`SessionEvent`].
pub type EventHandler = Box<dyn FnMut(SessionEvent) + Send + 'static>;

/// Handle to one signaling session.
///
/// The session does nothing until [`start`](Session::start) spawns its loop on
/// the current tokio runtime. Dropping the handle stops a running session.
pub struct Session<F: EngineFactory> {
    session_key: SessionKey,
    command_tx: mpsc::UnboundedSender<SessionCommand<TrackOf<F>>>,
    pending: Option<SessionLoop<F>>,
    handler: Option<EventHandler>,
    task: Option<JoinHandle<()>>,
}

impl<F: EngineFactory> Session<F> {
    /// Fails only if the configured credential does not yield a session key.
    pub fn new(
        config: SessionConfig,
        connector: Arc<dyn ChannelConnector>,
        factory: F,
    ) -> Result<Self, SessionError> {
        let session_key = config.identity()?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let pending = SessionLoop::new(session_key.clone(), config, connector, factory, command_rx);

        Ok(Self {
            session_key,
            command_tx,
            pending: Some(pending),
            handler: None,
            task: None,
        })
    }

    pub fn session_key(&self) -> &SessionKey {
        &self.session_key
    }

    pub fn is_started(&self) -> bool {
        self.pending.is_none()
    }

    /// Registers the event handler. Only one handler is kept; it must be set
    /// before [`start`](Session::start).
    pub fn set_event_handler<H>(&mut self, handler: H)
    where
        H: FnMut(SessionEvent) + Send + 'static,
    {
        if self.is_started() {
            warn!("Session already started, event handler ignored");
            return;
        }
        self.handler = Some(Box::new(handler));
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.is_started() {
            return Err(SessionError::AlreadyStarted);
        }
        let Some(handler) = self.handler.take() else {
            return Err(SessionError::MissingEventHandler);
        };
        let Some(session_loop) = self.pending.take() else {
            return Err(SessionError::AlreadyStarted);
        };

        self.task = Some(tokio::spawn(session_loop.run(handler)));
        Ok(())
    }

    /// Closes the channel. Close handling still runs once, then the loop ends.
    pub fn stop(&self) {
        if !self.is_started() {
            debug!("Session not started, nothing to stop");
            return;
        }
        let _ = self.command_tx.send(SessionCommand::Stop);
    }

    /// Waits until the session loop has finished.
    pub async fn join(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            error!("Session task failed: {}", e);
        }
    }

    /// Adds a local stream to every current and future peer.
    ///
    /// On a running session this resolves once the tracks are attached and an
    /// offer has been dispatched to every peer. Before `start` the stream is
    /// only staged.
    pub async fn add_media(&mut self, stream: MediaStream<TrackOf<F>>) -> Result<(), SessionError> {
        if let Some(pending) = self.pending.as_mut() {
            pending.stage_media(stream);
            return Ok(());
        }

        let (done, ack) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::AddMedia { stream, done })
            .map_err(|_| SessionError::NotRunning)?;
        ack.await.map_err(|_| SessionError::NotRunning)
    }

    /// Removes a local stream, matched by id, from every peer and renegotiates.
    pub async fn remove_media(
        &mut self,
        stream: &MediaStream<TrackOf<F>>,
    ) -> Result<(), SessionError> {
        if let Some(pending) = self.pending.as_mut() {
            pending.unstage_media(stream.id());
            return Ok(());
        }

        let (done, ack) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::RemoveMedia {
                stream: stream.clone(),
                done,
            })
            .map_err(|_| SessionError::NotRunning)?;
        ack.await.map_err(|_| SessionError::NotRunning)
    }
}
