//! Session-description post-processing
//!
//! Text transforms applied to descriptions produced by the transport before
//! they leave the session, plus read-only queries over applied descriptions.


pub mod sdp_type;
pub mod session_description;

use regex::Regex;

use crate::error::{Error, Result};
use crate::media_stream::MediaKind;
use crate::peer_connection::rtp_transceiver_direction::RTPTransceiverDirection;
use session_description::RTCSessionDescription;

pub(crate) const SDP_LINE_SEPARATOR: &str = "\r\n";
pub(crate) const SDP_BANDWIDTH_TIAS_PREFIX: &str = "b=TIAS:";

lazy_static! {
    static ref MEDIA_LINE_REGEX: Regex = Regex::new(r"^m=([A-Za-z]+)[ \t]").unwrap();
    static ref RTPMAP_LINE_REGEX: Regex =
        Regex::new(r"^a=rtpmap:(\d+)[ \t]+([^/\s]+)/(\d+)").unwrap();
}

/// BandwidthLimits are the per-kind `b=TIAS` ceilings, in bits per second.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BandwidthLimits {
    pub audio_bps: u64,
    pub video_bps: u64,
}

impl Default for BandwidthLimits {
    fn default() -> Self {
        BandwidthLimits {
            audio_bps: 64000,
            video_bps: 1000000,
        }
    }
}

fn media_line_kind(line: &str) -> Option<&str> {
    MEDIA_LINE_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// limit_bandwidth places a `b=TIAS:<bps>` line immediately after every `m=`
/// line. Audio sections get the audio ceiling, every other section the video
/// ceiling. `b=TIAS` lines already present anywhere in the text are dropped
/// first, so applying the transform twice yields the same text.
pub fn limit_bandwidth(sdp: &str, limits: BandwidthLimits) -> String {
    let mut lines = Vec::new();
    for line in sdp.split(SDP_LINE_SEPARATOR) {
        if line.starts_with(SDP_BANDWIDTH_TIAS_PREFIX) {
            continue;
        }
        lines.push(line.to_owned());
        if let Some(kind) = media_line_kind(line) {
            let bps = if MediaKind::from(kind) == MediaKind::Audio {
                limits.audio_bps
            } else {
                limits.video_bps
            };
            lines.push(format!("{SDP_BANDWIDTH_TIAS_PREFIX}{bps}"));
        }
    }

    lines.join(SDP_LINE_SEPARATOR)
}

/// ensure_codec checks that some video section of `sdp` lists `codec` in its
/// rtpmap, compared case-insensitively. It is a no-op unless `wants_video`.
pub fn ensure_codec(wants_video: bool, codec: &str, sdp: &str) -> Result<()> {
    if !wants_video {
        return Ok(());
    }

    let mut in_video = false;
    let mut has_video_section = false;
    for line in sdp.split(SDP_LINE_SEPARATOR) {
        if let Some(kind) = media_line_kind(line) {
            in_video = MediaKind::from(kind) == MediaKind::Video;
            has_video_section |= in_video;
            continue;
        }
        if !in_video {
            continue;
        }
        if let Some(caps) = RTPMAP_LINE_REGEX.captures(line) {
            if caps
                .get(2)
                .is_some_and(|name| name.as_str().eq_ignore_ascii_case(codec))
            {
                return Ok(());
            }
        }
    }

    if has_video_section {
        Err(Error::ErrMissingRequiredCodec(codec.to_owned()))
    } else {
        Err(Error::ErrNoVideoSection)
    }
}

/// direction_of returns the direction of the first section of `kind` in
/// `desc`, or `None` when there is no such section. A section without an
/// explicit direction attribute is `sendrecv`.
pub(crate) fn direction_of(
    desc: &RTCSessionDescription,
    kind: MediaKind,
) -> Result<Option<RTPTransceiverDirection>> {
    let parsed = desc.unmarshal()?;
    let kind = kind.to_string();

    let media = match parsed
        .media_descriptions
        .iter()
        .find(|md| md.media_name.media == kind)
    {
        Some(media) => media,
        None => return Ok(None),
    };

    for attr in &media.attributes {
        let direction = RTPTransceiverDirection::from(attr.key.as_str());
        if direction != RTPTransceiverDirection::Unspecified {
            return Ok(Some(direction));
        }
    }

    Ok(Some(RTPTransceiverDirection::Sendrecv))
}

/// media_direction derives the negotiated direction of `kind` from the
/// applied local description, and the remote one for the audio hold case.
pub(crate) fn media_direction(
    kind: MediaKind,
    local: Option<&RTCSessionDescription>,
    remote: Option<&RTCSessionDescription>,
) -> Result<RTPTransceiverDirection> {
    let local = match local {
        Some(local) => local,
        None => return Ok(RTPTransceiverDirection::Inactive),
    };

    let direction = match direction_of(local, kind)? {
        Some(direction) => direction,
        None => return Ok(RTPTransceiverDirection::Inactive),
    };

    // a remote party that put us on hold answers our sendonly audio with inactive
    if kind == MediaKind::Audio && direction == RTPTransceiverDirection::Sendonly {
        if let Some(remote) = remote {
            if direction_of(remote, kind)? == Some(RTPTransceiverDirection::Inactive) {
                return Ok(RTPTransceiverDirection::Inactive);
            }
        }
    }

    Ok(direction)
}
