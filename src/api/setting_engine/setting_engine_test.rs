use super::*;

#[test]
fn test_setting_engine_defaults() {
    let s = SettingEngine::default();

    assert_eq!(s.ice_gathering_timeout, Duration::from_millis(500));
    assert_eq!(
        s.bandwidth_limits(),
        BandwidthLimits {
            audio_bps: 64000,
            video_bps: 1000000,
        }
    );
    assert_eq!(s.required_video_codec, "H264");
    assert_eq!(s.negotiation_debounce, Duration::from_millis(20));
    assert!(!s.log_sdp);
    assert!(s.validate().is_ok());
}

#[test]
fn test_set_bandwidth_limits() -> Result<()> {
    let mut s = SettingEngine::default();

    assert!(
        s.set_bandwidth_limits(0, 1000).is_err(),
        "Setting engine should fail a zero audio ceiling."
    );
    assert_eq!(s.audio_bandwidth_bps, 64000, "failed set must not change state");

    s.set_bandwidth_limits(32000, 500000)?;
    assert_eq!(s.audio_bandwidth_bps, 32000);
    assert_eq!(s.video_bandwidth_bps, 500000);

    Ok(())
}

#[test]
fn test_set_required_video_codec() -> Result<()> {
    let mut s = SettingEngine::default();

    assert!(s.set_required_video_codec("  ").is_err());
    s.set_required_video_codec(" VP8 ")?;
    assert_eq!(s.required_video_codec, "VP8");

    Ok(())
}

#[test]
fn test_set_timeouts() {
    let mut s = SettingEngine::default();

    s.set_ice_gathering_timeout(Duration::from_secs(1));
    s.set_negotiation_debounce(Duration::from_millis(5));
    assert_eq!(s.ice_gathering_timeout, Duration::from_secs(1));
    assert_eq!(s.negotiation_debounce, Duration::from_millis(5));
}

#[test]
fn test_setting_engine_from_json() -> Result<()> {
    let s = SettingEngine::from_json(
        r#"{"ice_gathering_timeout_ms":250,"video_bandwidth_bps":2000000,"log_sdp":true}"#,
    )?;

    assert_eq!(s.ice_gathering_timeout, Duration::from_millis(250));
    assert_eq!(s.video_bandwidth_bps, 2000000);
    assert_eq!(s.audio_bandwidth_bps, 64000, "missing members keep defaults");
    assert!(s.log_sdp);

    assert!(SettingEngine::from_json(r#"{"event_channel_capacity":0}"#).is_err());
    assert!(SettingEngine::from_json("not json").is_err());

    let round_trip = SettingEngine::from_json(&serde_json::to_string(&s)?)?;
    assert_eq!(round_trip, s);

    Ok(())
}
