use crate::engine::{EngineFactory, TrackOf};
use crate::media::MediaStream;
use crate::session::SessionLoop;
use roomcast_core::Operation;
use tracing::{info, warn};

impl<F: EngineFactory> SessionLoop<F> {
    /// Attaches a new stream to every peer, then renegotiates with all of them.
    pub(super) async fn add_media(&mut self, stream: MediaStream<TrackOf<F>>) {
        let added = self.media.add(stream.clone());
        if added {
            info!("Added local stream {}", stream.id());
        } else {
            warn!("Local stream {} already added, tracks left as they are", stream.id());
        }

        for key in self.peers.keys() {
            if added {
                let failures = match self.peers.get(&key) {
                    Some(entry) => entry.attach_stream(&stream).await,
                    None => continue,
                };
                for e in failures {
                    self.report(Operation::AddTrack, Some(&key), e);
                }
            }
            self.initiate_offer(&key).await;
        }
    }

    /// Detaches the tracks of `stream` from every peer, then renegotiates.
    /// A stream that was never added still has its tracks looked up.
    pub(super) async fn remove_media(&mut self, stream: MediaStream<TrackOf<F>>) {
        let stream = match self.media.remove(stream.id()) {
            Some(stored) => {
                info!("Removed local stream {}", stored.id());
                stored
            }
            None => {
                warn!("Local stream {} is not present", stream.id());
                stream
            }
        };

        for key in self.peers.keys() {
            let failures = match self.peers.get(&key) {
                Some(entry) => entry.detach_stream(&stream).await,
                None => continue,
            };
            for e in failures {
                self.report(Operation::RemoveTrack, Some(&key), e);
            }
            self.initiate_offer(&key).await;
        }
    }
}
