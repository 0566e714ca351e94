//! The transport seam
//!
//! A session drives exactly one [`PeerTransport`]. The transport reports what
//! happens on its side through a single [`TransportEvent`] channel, in arrival
//! order.

pub mod configuration;
pub mod ice_gathering_state;
pub mod offer_answer_options;
pub mod rtp_transceiver_direction;
pub mod sdp;
pub mod signaling_state;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::media_stream::{MediaStream, MediaStreamTrack};
use configuration::RTCConfiguration;
use ice_gathering_state::RTCIceGatheringState;
use offer_answer_options::RTCOfferOptions;
use self::sdp::session_description::RTCSessionDescription;
use signaling_state::RTCSignalingState;

/// TransportEvent is everything a transport reports to its session.
#[derive(Clone)]
pub enum TransportEvent {
    /// NegotiationNeeded fires whenever a change on the transport requires a
    /// new offer/answer round.
    NegotiationNeeded,

    /// IceCandidate carries a newly gathered candidate; `None` marks the end
    /// of candidates for the current description.
    IceCandidate(Option<String>),

    IceGatheringStateChange(RTCIceGatheringState),

    /// Track announces a remote track together with the streams it belongs to.
    Track {
        track: Arc<MediaStreamTrack>,
        streams: Vec<Arc<MediaStream>>,
    },

    /// TrackEnded reports that a remote track will not produce media again.
    TrackEnded { track_id: String },

    SignalingStateChange(RTCSignalingState),
}

impl fmt::Debug for TransportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportEvent::NegotiationNeeded => write!(f, "NegotiationNeeded"),
            TransportEvent::IceCandidate(Some(c)) => write!(f, "IceCandidate({c})"),
            TransportEvent::IceCandidate(None) => write!(f, "IceCandidate(end)"),
            TransportEvent::IceGatheringStateChange(s) => write!(f, "IceGatheringStateChange({s})"),
            TransportEvent::Track { track, streams } => write!(
                f,
                "Track({} {}, streams={})",
                track.kind(),
                track.id(),
                streams.len()
            ),
            TransportEvent::TrackEnded { track_id } => write!(f, "TrackEnded({track_id})"),
            TransportEvent::SignalingStateChange(s) => write!(f, "SignalingStateChange({s})"),
        }
    }
}

pub type TransportEventSender = mpsc::UnboundedSender<TransportEvent>;

/// PeerTransport is one end of a real-time media exchange.
///
/// Implementations must be safe to call after `close`; operations that can
/// no longer run return [`Error::ErrConnectionClosed`].
///
/// [`Error::ErrConnectionClosed`]: crate::Error::ErrConnectionClosed
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self, options: Option<RTCOfferOptions>) -> Result<RTCSessionDescription>;

    /// set_local_description applies `desc` and starts candidate gathering
    /// for it.
    async fn set_local_description(&self, desc: RTCSessionDescription) -> Result<()>;

    /// local_description returns the resolved local description, which may
    /// differ from the one last applied.
    async fn local_description(&self) -> Option<RTCSessionDescription>;

    async fn set_remote_description(&self, desc: RTCSessionDescription) -> Result<()>;
    async fn remote_description(&self) -> Option<RTCSessionDescription>;

    async fn add_stream(&self, stream: Arc<MediaStream>) -> Result<()>;

    /// add_track attaches `track` as part of the already attached `stream`.
    async fn add_track(&self, track: Arc<MediaStreamTrack>, stream: Arc<MediaStream>) -> Result<()>;

    async fn remove_stream(&self, stream: &Arc<MediaStream>) -> Result<()>;
    async fn local_streams(&self) -> Vec<Arc<MediaStream>>;
    async fn remote_streams(&self) -> Vec<Arc<MediaStream>>;

    fn signaling_state(&self) -> RTCSignalingState;

    async fn close(&self) -> Result<()>;
}

/// TransportFactory creates the transport of a session. It is invoked at most
/// once per session.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn new_transport(
        &self,
        configuration: RTCConfiguration,
        events: TransportEventSender,
    ) -> Result<Arc<dyn PeerTransport>>;
}
