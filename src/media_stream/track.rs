use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// MediaKind is the kind of media carried by a track or a media section.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MediaKind {
    #[default]
    Unspecified = 0,

    /// Audio is an audio track or section.
    Audio,

    /// Video is a video track or section.
    Video,
}

const MEDIA_KIND_AUDIO_STR: &str = "audio";
const MEDIA_KIND_VIDEO_STR: &str = "video";

impl From<&str> for MediaKind {
    fn from(raw: &str) -> Self {
        match raw {
            MEDIA_KIND_AUDIO_STR => MediaKind::Audio,
            MEDIA_KIND_VIDEO_STR => MediaKind::Video,
            _ => MediaKind::Unspecified,
        }
    }
}

impl From<u8> for MediaKind {
    fn from(v: u8) -> Self {
        match v {
            1 => MediaKind::Audio,
            2 => MediaKind::Video,
            _ => MediaKind::Unspecified,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MediaKind::Audio => write!(f, "{MEDIA_KIND_AUDIO_STR}"),
            MediaKind::Video => write!(f, "{MEDIA_KIND_VIDEO_STR}"),
            _ => write!(f, "{}", crate::UNSPECIFIED_STR),
        }
    }
}

/// MediaStreamTrackState is the ready-state of a track.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaStreamTrackState {
    #[default]
    Unspecified = 0,

    /// Live indicates the track is producing or able to produce media.
    Live,

    /// Ended indicates the track will never produce media again.
    Ended,
}

const TRACK_STATE_LIVE_STR: &str = "live";
const TRACK_STATE_ENDED_STR: &str = "ended";

impl From<&str> for MediaStreamTrackState {
    fn from(raw: &str) -> Self {
        match raw {
            TRACK_STATE_LIVE_STR => MediaStreamTrackState::Live,
            TRACK_STATE_ENDED_STR => MediaStreamTrackState::Ended,
            _ => MediaStreamTrackState::Unspecified,
        }
    }
}

impl From<u8> for MediaStreamTrackState {
    fn from(v: u8) -> Self {
        match v {
            1 => MediaStreamTrackState::Live,
            2 => MediaStreamTrackState::Ended,
            _ => MediaStreamTrackState::Unspecified,
        }
    }
}

impl fmt::Display for MediaStreamTrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MediaStreamTrackState::Live => write!(f, "{TRACK_STATE_LIVE_STR}"),
            MediaStreamTrackState::Ended => write!(f, "{TRACK_STATE_ENDED_STR}"),
            _ => write!(f, "{}", crate::UNSPECIFIED_STR),
        }
    }
}

/// MediaStreamTrack is a single audio or video source, local or remote.
///
/// Tracks are shared between the session and the transport, so all state is
/// kept in atomics and every method takes `&self`.
#[derive(Debug)]
pub struct MediaStreamTrack {
    id: String,
    kind: MediaKind,
    label: String,

    enabled: AtomicBool,
    /// set when the remote side signalled the end of the track
    ended: AtomicBool,
    ready_state: AtomicU8, //MediaStreamTrackState
}

impl MediaStreamTrack {
    pub fn new(id: impl Into<String>, kind: MediaKind, label: impl Into<String>) -> Self {
        MediaStreamTrack {
            id: id.into(),
            kind,
            label: label.into(),
            enabled: AtomicBool::new(true),
            ended: AtomicBool::new(false),
            ready_state: AtomicU8::new(MediaStreamTrackState::Live as u8),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// set_enabled toggles whether the track flows. Disabling a track keeps
    /// it attached so it can be re-enabled without renegotiation.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    pub fn ready_state(&self) -> MediaStreamTrackState {
        self.ready_state.load(Ordering::SeqCst).into()
    }

    /// is_live reports whether the track is neither flagged ended nor in the
    /// ended ready-state.
    pub fn is_live(&self) -> bool {
        !self.ended() && self.ready_state() != MediaStreamTrackState::Ended
    }

    /// stop releases the source. Stopping is permanent and idempotent.
    pub fn stop(&self) {
        self.ready_state
            .store(MediaStreamTrackState::Ended as u8, Ordering::SeqCst);
    }

    /// mark_ended records that the remote side ended this track.
    pub fn mark_ended(&self) {
        self.ended.store(true, Ordering::SeqCst);
        self.stop();
    }
}
