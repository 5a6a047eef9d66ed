use crate::error::TransportError;
use crate::transport::{ChannelConnector, ChannelEvent, SignalingChannel};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

enum Outgoing {
    Frame(String),
    Close,
}

/// WebSocket signaling channel backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

impl ChannelConnector for WsConnector {
    fn open(
        &self,
        url: &str,
        events: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Box<dyn SignalingChannel> {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(url.to_owned(), events, out_rx));
        Box::new(WsChannel { out_tx })
    }
}

struct WsChannel {
    out_tx: mpsc::UnboundedSender<Outgoing>,
}

impl SignalingChannel for WsChannel {
    fn send(&self, frame: String) -> Result<(), TransportError> {
        self.out_tx
            .send(Outgoing::Frame(frame))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        let _ = self.out_tx.send(Outgoing::Close);
    }
}

async fn run_socket(
    url: String,
    events: mpsc::UnboundedSender<ChannelEvent>,
    mut out_rx: mpsc::UnboundedReceiver<Outgoing>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            warn!("Failed to connect to {}: {}", url, e);
            let _ = events.send(ChannelEvent::Error(e.to_string()));
            let _ = events.send(ChannelEvent::Closed(Some(e.to_string())));
            return;
        }
    };

    info!("Signaling channel connected: {}", url);
    let _ = events.send(ChannelEvent::Open);

    let (mut write, mut read) = ws_stream.split();
    let mut reason = None;

    loop {
        tokio::select! {
            outgoing = out_rx.recv() => {
                match outgoing {
                    Some(Outgoing::Frame(text)) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            let _ = events.send(ChannelEvent::Error(e.to_string()));
                            reason = Some(e.to_string());
                            break;
                        }
                    }
                    Some(Outgoing::Close) | None => {
                        debug!("Closing signaling channel {}", url);
                        let _ = write.send(Message::Close(None)).await;
                        reason = Some("closed locally".to_owned());
                        break;
                    }
                }
            }

            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let _ = events.send(ChannelEvent::Message(text));
                    }
                    Some(Ok(Message::Binary(data))) => {
                        let _ = events.send(binary_frame_event(data));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        reason = frame.map(|f| f.reason.to_string());
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        let _ = events.send(ChannelEvent::Error(e.to_string()));
                        reason = Some(e.to_string());
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    info!("Signaling channel disconnected: {}", url);
    let _ = events.send(ChannelEvent::Closed(reason));
}

fn binary_frame_event(data: Vec<u8>) -> ChannelEvent {
    match String::from_utf8(data) {
        Ok(text) => ChannelEvent::Message(text),
        Err(e) => ChannelEvent::Undecodable(format!("binary frame is not valid UTF-8: {e}")),
    }
}
