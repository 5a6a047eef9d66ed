use crate::engine::MediaTrack;

/// Locally captured stream: a stable id plus the tracks it groups.
#[derive(Debug, Clone)]
pub struct MediaStream<T> {
    id: String,
    tracks: Vec<T>,
}

impl<T: MediaTrack> MediaStream<T> {
    pub fn new(id: impl Into<String>, tracks: Vec<T>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[T] {
        &self.tracks
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.id())
    }

    pub fn contains_track(&self, track_id: &str) -> bool {
        self.track_ids().any(|id| id == track_id)
    }
}
