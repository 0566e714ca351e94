#[cfg(test)]
mod setting_engine_test;

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::{Error, Result};
use crate::peer_connection::sdp::BandwidthLimits;

const DEFAULT_ICE_GATHERING_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_NEGOTIATION_DEBOUNCE: Duration = Duration::from_millis(20);
const DEFAULT_AUDIO_BANDWIDTH_BPS: u64 = 64000;
const DEFAULT_VIDEO_BANDWIDTH_BPS: u64 = 1000000;
const DEFAULT_REQUIRED_VIDEO_CODEC: &str = "H264";
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// SettingEngine allows influencing behavior in ways that are not
/// part of the offer/answer contract: wait bounds, bandwidth ceilings,
/// the codec remote parties depend on, and diagnostics.
///
/// It can be loaded from JSON; durations are given in milliseconds and
/// missing members keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingEngine {
    #[serde(rename = "ice_gathering_timeout_ms", with = "duration_ms")]
    pub(crate) ice_gathering_timeout: Duration,
    pub(crate) audio_bandwidth_bps: u64,
    pub(crate) video_bandwidth_bps: u64,
    pub(crate) required_video_codec: String,
    #[serde(rename = "negotiation_debounce_ms", with = "duration_ms")]
    pub(crate) negotiation_debounce: Duration,
    pub(crate) log_sdp: bool,
    pub(crate) event_channel_capacity: usize,
}

impl Default for SettingEngine {
    fn default() -> Self {
        SettingEngine {
            ice_gathering_timeout: DEFAULT_ICE_GATHERING_TIMEOUT,
            audio_bandwidth_bps: DEFAULT_AUDIO_BANDWIDTH_BPS,
            video_bandwidth_bps: DEFAULT_VIDEO_BANDWIDTH_BPS,
            required_video_codec: DEFAULT_REQUIRED_VIDEO_CODEC.to_owned(),
            negotiation_debounce: DEFAULT_NEGOTIATION_DEBOUNCE,
            log_sdp: false,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl SettingEngine {
    /// from_json parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let s: SettingEngine = serde_json::from_str(json)?;
        s.validate()?;
        Ok(s)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.audio_bandwidth_bps == 0 || self.video_bandwidth_bps == 0 {
            return Err(Error::ErrInvalidConfiguration(
                "bandwidth ceilings must be positive".to_owned(),
            ));
        }
        if self.required_video_codec.trim().is_empty() {
            return Err(Error::ErrInvalidConfiguration(
                "required video codec must not be empty".to_owned(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::ErrInvalidConfiguration(
                "event channel capacity must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// set_ice_gathering_timeout bounds how long offer creation waits for
    /// the end of candidates before going on with what was gathered.
    pub fn set_ice_gathering_timeout(&mut self, timeout: Duration) {
        self.ice_gathering_timeout = timeout;
    }

    /// set_bandwidth_limits sets the `b=TIAS` ceilings in bits per second.
    pub fn set_bandwidth_limits(&mut self, audio_bps: u64, video_bps: u64) -> Result<()> {
        if audio_bps == 0 || video_bps == 0 {
            return Err(Error::ErrInvalidConfiguration(
                "bandwidth ceilings must be positive".to_owned(),
            ));
        }
        self.audio_bandwidth_bps = audio_bps;
        self.video_bandwidth_bps = video_bps;
        Ok(())
    }

    /// set_required_video_codec sets the codec every video offer must list.
    pub fn set_required_video_codec(&mut self, codec: &str) -> Result<()> {
        if codec.trim().is_empty() {
            return Err(Error::ErrInvalidConfiguration(
                "required video codec must not be empty".to_owned(),
            ));
        }
        self.required_video_codec = codec.trim().to_owned();
        Ok(())
    }

    /// set_negotiation_debounce sets the quiet window after which a burst of
    /// renegotiation signals is reported as one.
    pub fn set_negotiation_debounce(&mut self, window: Duration) {
        self.negotiation_debounce = window;
    }

    /// enable_sdp_logging logs every offer and answer at info level.
    pub fn enable_sdp_logging(&mut self, enabled: bool) {
        self.log_sdp = enabled;
    }

    pub fn set_event_channel_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::ErrInvalidConfiguration(
                "event channel capacity must be positive".to_owned(),
            ));
        }
        self.event_channel_capacity = capacity;
        Ok(())
    }

    pub(crate) fn bandwidth_limits(&self) -> BandwidthLimits {
        BandwidthLimits {
            audio_bps: self.audio_bandwidth_bps,
            video_bps: self.video_bandwidth_bps,
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use tokio::time::Duration;

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
