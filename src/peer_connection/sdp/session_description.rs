use std::io::Cursor;

use sdp::description::session::SessionDescription;
use serde::{Deserialize, Serialize};

use super::sdp_type::RTCSdpType;
use crate::error::{Error, Result};

/// RTCSessionDescription is a typed session description as exchanged with the
/// transport and the remote party.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCSessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: RTCSdpType,

    pub sdp: String,
}

impl RTCSessionDescription {
    /// offer wraps the text of a local offer.
    pub fn offer(sdp: String) -> Self {
        RTCSessionDescription {
            sdp_type: RTCSdpType::Offer,
            sdp,
        }
    }

    /// answer validates the text of a remote answer and wraps it.
    pub fn answer(sdp: String) -> Result<Self> {
        let desc = RTCSessionDescription {
            sdp_type: RTCSdpType::Answer,
            sdp,
        };
        desc.unmarshal()?;
        Ok(desc)
    }

    /// unmarshal is a helper to deserialize the sdp
    pub fn unmarshal(&self) -> Result<SessionDescription> {
        if self.sdp.trim().is_empty() {
            return Err(Error::ErrEmptySessionDescription);
        }
        let mut reader = Cursor::new(self.sdp.as_bytes());
        let parsed = SessionDescription::unmarshal(&mut reader)?;
        Ok(parsed)
    }
}
