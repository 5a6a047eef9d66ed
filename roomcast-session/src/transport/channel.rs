use crate::error::TransportError;
use crate::transport::ChannelEvent;
use tokio::sync::mpsc;

/// Opens duplex message channels to the signaling endpoint.
///
/// `open` must return immediately; connection progress is reported through
/// `events`. A channel that fails to connect reports `Error` followed by
/// `Closed`.
pub trait ChannelConnector: Send + Sync + 'static {
    fn open(
        &self,
        url: &str,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Box<dyn SignalingChannel>;
}

/// Handle to one open (or opening) signaling channel.
pub trait SignalingChannel: Send + Sync {
    /// Queues a textual frame for delivery.
    fn send(&self, frame: String) -> Result<(), TransportError>;

    /// Requests shutdown. The channel still reports `Closed` afterwards.
    fn close(&self);
}
