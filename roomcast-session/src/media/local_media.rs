use crate::engine::MediaTrack;
use crate::media::MediaStream;

/// Streams added by the host and not yet removed, in insertion order.
#[derive(Debug)]
pub struct LocalMediaSet<T> {
    streams: Vec<MediaStream<T>>,
}

impl<T: MediaTrack> LocalMediaSet<T> {
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
        }
    }

    /// Returns `false` when a stream with the same id is already present.
    pub fn add(&mut self, stream: MediaStream<T>) -> bool {
        if self.contains(stream.id()) {
            return false;
        }
        self.streams.push(stream);
        true
    }

    pub fn remove(&mut self, stream_id: &str) -> Option<MediaStream<T>> {
        let index = self.streams.iter().position(|s| s.id() == stream_id)?;
        Some(self.streams.remove(index))
    }

    pub fn contains(&self, stream_id: &str) -> bool {
        self.streams.iter().any(|s| s.id() == stream_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaStream<T>> {
        self.streams.iter()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl<T: MediaTrack> Default for LocalMediaSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
