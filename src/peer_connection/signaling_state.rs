use std::fmt;

/// RTCSignalingState is the offer/answer state the transport reports. The
/// session only ever offers, so a remote offer never shows up here.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCSignalingState {
    #[default]
    Unspecified = 0,
    Stable,
    /// The local offer is applied and the answer is outstanding.
    HaveLocalOffer,
    /// Terminal. The transport was closed.
    Closed,
}

impl RTCSignalingState {
    fn as_str(&self) -> &'static str {
        match self {
            RTCSignalingState::Unspecified => crate::UNSPECIFIED_STR,
            RTCSignalingState::Stable => "stable",
            RTCSignalingState::HaveLocalOffer => "have-local-offer",
            RTCSignalingState::Closed => "closed",
        }
    }
}

impl fmt::Display for RTCSignalingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transports keep the state in an atomic; unknown values read back as
/// `Unspecified`.
impl From<u8> for RTCSignalingState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCSignalingState::Stable,
            2 => RTCSignalingState::HaveLocalOffer,
            3 => RTCSignalingState::Closed,
            _ => RTCSignalingState::Unspecified,
        }
    }
}
