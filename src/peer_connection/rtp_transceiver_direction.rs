use std::fmt;

/// RTPTransceiverDirection is the negotiated direction of one media section.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTPTransceiverDirection {
    #[default]
    Unspecified,

    /// Sendrecv indicates media flows both ways.
    Sendrecv,

    /// Sendonly indicates the local side only sends.
    Sendonly,

    /// Recvonly indicates the local side only receives.
    Recvonly,

    /// Inactive indicates no media flows in either direction.
    Inactive,
}

const RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR: &str = "sendrecv";
const RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR: &str = "sendonly";
const RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR: &str = "recvonly";
const RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR: &str = "inactive";

/// parses a direction attribute key
impl From<&str> for RTPTransceiverDirection {
    fn from(raw: &str) -> Self {
        match raw {
            RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR => RTPTransceiverDirection::Sendrecv,
            RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR => RTPTransceiverDirection::Sendonly,
            RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR => RTPTransceiverDirection::Recvonly,
            RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR => RTPTransceiverDirection::Inactive,
            _ => RTPTransceiverDirection::Unspecified,
        }
    }
}

impl fmt::Display for RTPTransceiverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTPTransceiverDirection::Sendrecv => {
                write!(f, "{RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR}")
            }
            RTPTransceiverDirection::Sendonly => {
                write!(f, "{RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR}")
            }
            RTPTransceiverDirection::Recvonly => {
                write!(f, "{RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR}")
            }
            RTPTransceiverDirection::Inactive => {
                write!(f, "{RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR}")
            }
            _ => write!(f, "{}", crate::UNSPECIFIED_STR),
        }
    }
}

impl RTPTransceiverDirection {
    pub fn has_send(&self) -> bool {
        matches!(
            self,
            RTPTransceiverDirection::Sendrecv | RTPTransceiverDirection::Sendonly
        )
    }

    pub fn has_recv(&self) -> bool {
        matches!(
            self,
            RTPTransceiverDirection::Sendrecv | RTPTransceiverDirection::Recvonly
        )
    }
}
