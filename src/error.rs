use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// ErrorKind groups every [`Error`] into one of the three failure families a
/// call layer has to react to differently.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A capture device was unavailable or access was denied.
    MediaAcquisition,

    /// A session description was malformed, rejected, or lacked something
    /// the remote side requires.
    Negotiation,

    /// The session or its transport was already closed.
    TransportClosed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::MediaAcquisition => write!(f, "MediaAcquisitionError"),
            ErrorKind::Negotiation => write!(f, "NegotiationError"),
            ErrorKind::TransportClosed => write!(f, "TransportClosedError"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// ErrMediaAcquisition indicates that capture devices could not be
    /// opened for the requested constraints.
    #[error("media acquisition failed: {0}")]
    ErrMediaAcquisition(String),

    /// ErrNoMediaRequested indicates a capture request that asked for
    /// neither audio nor video.
    #[error("capture requested without audio or video")]
    ErrNoMediaRequested,

    /// ErrNoVideoSection indicates that video was requested but the
    /// generated offer has no video media section.
    #[error("no video section found in offer")]
    ErrNoVideoSection,

    /// ErrMissingRequiredCodec indicates that the video section of an offer
    /// does not list the codec the remote side depends on.
    #[error("offer does not include {0} codec")]
    ErrMissingRequiredCodec(String),

    /// ErrNoLocalDescription indicates that the transport produced no
    /// resolved local description after it was applied.
    #[error("transport has no local description")]
    ErrNoLocalDescription,

    /// ErrEmptySessionDescription indicates an empty description text.
    #[error("session description is empty")]
    ErrEmptySessionDescription,

    /// ErrRemoteDescriptionRejected indicates that the transport refused to
    /// apply the remote description.
    #[error("remote description rejected: {0}")]
    ErrRemoteDescriptionRejected(String),

    /// ErrIncorrectNegotiationState indicates an answer that arrived while
    /// no offer was outstanding.
    #[error("operation can not be run in negotiation state {0}")]
    ErrIncorrectNegotiationState(String),

    /// ErrTransportOperation wraps a failure reported by the transport while
    /// producing or applying a description.
    #[error("transport operation failed: {0}")]
    ErrTransportOperation(String),

    /// ErrConnectionClosed indicates an operation executed after the
    /// transport has already been closed.
    #[error("connection closed")]
    ErrConnectionClosed,

    /// ErrSessionEnded indicates an operation executed after `end()`.
    #[error("media session ended")]
    ErrSessionEnded,

    /// ErrDeferredEnableCancelled indicates a deferred enable whose wait
    /// was abandoned because the session went away.
    #[error("deferred enable cancelled")]
    ErrDeferredEnableCancelled,

    #[error("SdpError: {0}")]
    ErrSdp(#[from] sdp::Error),

    #[error("invalid configuration: {0}")]
    ErrInvalidConfiguration(String),

    /// ErrNoTurnCredentials indicates a TURN server configured without a
    /// username or a credential.
    #[error("turn server credentials required")]
    ErrNoTurnCredentials,
}

impl Error {
    /// kind classifies the error into one of the three failure families.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ErrMediaAcquisition(_) | Error::ErrNoMediaRequested => {
                ErrorKind::MediaAcquisition
            }
            Error::ErrConnectionClosed
            | Error::ErrSessionEnded
            | Error::ErrDeferredEnableCancelled => ErrorKind::TransportClosed,
            _ => ErrorKind::Negotiation,
        }
    }

    pub fn is_negotiation(&self) -> bool {
        self.kind() == ErrorKind::Negotiation
    }

    pub fn is_transport_closed(&self) -> bool {
        self.kind() == ErrorKind::TransportClosed
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ErrInvalidConfiguration(e.to_string())
    }
}
