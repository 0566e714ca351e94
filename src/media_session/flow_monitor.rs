//! Pure queries over the live track state of a transport

use std::sync::Arc;

use crate::media_stream::{MediaKind, MediaStream};
use crate::peer_connection::signaling_state::RTCSignalingState;
use crate::peer_connection::PeerTransport;

/// streams_sending reports whether any stream holds an enabled track of `kind`.
pub(crate) async fn streams_sending(streams: &[Arc<MediaStream>], kind: MediaKind) -> bool {
    for stream in streams {
        for track in stream.get_tracks_of_kind(kind).await {
            if track.enabled() {
                return true;
            }
        }
    }
    false
}

/// streams_receiving reports whether any stream holds a live track of `kind`.
/// A kind with no tracks at all is never receiving.
pub(crate) async fn streams_receiving(streams: &[Arc<MediaStream>], kind: MediaKind) -> bool {
    for stream in streams {
        for track in stream.get_tracks_of_kind(kind).await {
            if track.is_live() {
                return true;
            }
        }
    }
    false
}

/// local_media_status is the sending flag of `kind` for `transport`.
pub async fn local_media_status(transport: &Arc<dyn PeerTransport>, kind: MediaKind) -> bool {
    let streams = transport.local_streams().await;
    streams_sending(&streams, kind).await
}

/// remote_media_status is the receiving flag of `kind` for `transport`.
pub async fn remote_media_status(transport: &Arc<dyn PeerTransport>, kind: MediaKind) -> bool {
    if transport.signaling_state() == RTCSignalingState::Closed {
        return false;
    }

    let streams = transport.remote_streams().await;
    if streams.is_empty() {
        return false;
    }

    streams_receiving(&streams, kind).await
}
