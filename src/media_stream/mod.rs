//! Streams and tracks exchanged with the transport
//!
//! A [`MediaStream`] is an ordered collection of [`MediaStreamTrack`]s. Both are
//! shared with the transport, so they are handed around as `Arc`s.


pub mod constraints;
pub mod track;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use constraints::{
    intent_enabled, intent_from_state, normalize_intent, wants_any, MediaIntent,
    MediaStreamConstraints, MediaTrackConstraints, TrackConstraint,
};
pub use track::{MediaKind, MediaStreamTrack, MediaStreamTrackState};

/// MediaStream groups tracks that are sent or received as a unit.
#[derive(Debug)]
pub struct MediaStream {
    id: String,
    tracks: Mutex<Vec<Arc<MediaStreamTrack>>>,
}

impl MediaStream {
    pub fn new(id: impl Into<String>, tracks: Vec<Arc<MediaStreamTrack>>) -> Self {
        MediaStream {
            id: id.into(),
            tracks: Mutex::new(tracks),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// get_tracks returns a snapshot of every track in the stream.
    pub async fn get_tracks(&self) -> Vec<Arc<MediaStreamTrack>> {
        let tracks = self.tracks.lock().await;
        tracks.clone()
    }

    /// get_tracks_of_kind returns a snapshot of the tracks of the given kind.
    pub async fn get_tracks_of_kind(&self, kind: MediaKind) -> Vec<Arc<MediaStreamTrack>> {
        let tracks = self.tracks.lock().await;
        tracks.iter().filter(|t| t.kind() == kind).cloned().collect()
    }

    pub async fn get_track_by_id(&self, id: &str) -> Option<Arc<MediaStreamTrack>> {
        let tracks = self.tracks.lock().await;
        tracks.iter().find(|t| t.id() == id).cloned()
    }

    /// add_track appends the track unless a track with the same id is
    /// already present. Returns whether the track was added.
    pub async fn add_track(&self, track: Arc<MediaStreamTrack>) -> bool {
        let mut tracks = self.tracks.lock().await;
        if tracks.iter().any(|t| t.id() == track.id()) {
            return false;
        }
        tracks.push(track);
        true
    }

    /// remove_track detaches the track with the given id without stopping it.
    pub async fn remove_track(&self, id: &str) -> Option<Arc<MediaStreamTrack>> {
        let mut tracks = self.tracks.lock().await;
        let index = tracks.iter().position(|t| t.id() == id)?;
        Some(tracks.remove(index))
    }

    /// stop stops every track in the stream.
    pub async fn stop(&self) {
        let tracks = self.tracks.lock().await;
        for track in tracks.iter() {
            track.stop();
        }
    }
}
