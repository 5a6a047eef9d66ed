use crate::media::MediaStream;
use tokio::sync::oneshot;

/// Requests from the [`Session`](crate::Session) handle to its running loop.
pub(crate) enum SessionCommand<T> {
    /// Add a local stream and renegotiate with every peer.
    AddMedia {
        stream: MediaStream<T>,
        done: oneshot::Sender<()>,
    },

    /// Drop a local stream and renegotiate with every peer.
    RemoveMedia {
        stream: MediaStream<T>,
        done: oneshot::Sender<()>,
    },

    /// Close the channel and end the loop once close handling has run.
    Stop,
}
