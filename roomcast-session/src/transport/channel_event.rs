/// Events a signaling channel reports back to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The channel is connected and frames can be sent.
    Open,

    /// One inbound textual frame.
    Message(String),

    /// An inbound frame that is not valid UTF-8.
    Undecodable(String),

    /// Channel-level failure. Reconnection is decided by the following `Closed`.
    Error(String),

    /// The channel is gone. Reported exactly once per opened channel.
    Closed(Option<String>),
}
