use super::*;
use crate::media_session::mock::{MockMediaDevices, MockTransportFactory};
use crate::media_stream::{MediaTrackConstraints, TrackConstraint};
use crate::peer_connection::configuration::{RTCConfiguration, RTCIceServer};

#[test]
fn test_build_requires_collaborators() {
    let result = MediaSessionBuilder::new()
        .with_media_devices(Arc::new(MockMediaDevices::default()))
        .build();
    assert!(
        matches!(result, Err(Error::ErrInvalidConfiguration(_))),
        "build must fail without a transport factory"
    );

    let result = MediaSessionBuilder::new()
        .with_transport_factory(Arc::new(MockTransportFactory::default()))
        .build();
    assert!(
        matches!(result, Err(Error::ErrInvalidConfiguration(_))),
        "build must fail without media devices"
    );
}

#[tokio::test]
async fn test_new_media_session() -> Result<()> {
    let mut s = SettingEngine::default();
    s.set_bandwidth_limits(32000, 500000)?;

    let session = MediaSessionBuilder::new()
        .with_setting_engine(s)
        .with_transport_factory(Arc::new(MockTransportFactory::default()))
        .with_media_devices(Arc::new(MockMediaDevices::default()))
        .with_audio(true)
        .with_offer_to_receive_video(true)
        .build()?;

    assert_eq!(
        session.internal.setting_engine.audio_bandwidth_bps, 32000,
        "Failed to set settings engine"
    );
    assert!(session.audio().await);
    assert!(!session.video().await);
    assert!(!session.offer_to_receive_audio());
    assert!(session.offer_to_receive_video());
    assert!(!session.sending_audio(), "nothing is sent before an offer");
    assert!(session.local_media_stream().is_none());
    assert!(!session.ended());
    assert!(session.id().starts_with("MediaSession-"));
    assert_eq!(session.id().len(), "MediaSession-".len() + 16);

    Ok(())
}

#[tokio::test]
async fn test_build_with_constraint_intent() -> Result<()> {
    let constraints: MediaTrackConstraints =
        serde_json::from_value(serde_json::json!({"width": 1280, "height": 720}))?;

    let session = MediaSessionBuilder::new()
        .with_transport_factory(Arc::new(MockTransportFactory::default()))
        .with_media_devices(Arc::new(MockMediaDevices::default()))
        .with_video(constraints.clone())
        .build()?;

    assert!(session.video().await, "a constraint implies the kind is wanted");
    assert_eq!(
        session.video_constraint().await,
        TrackConstraint::Constrained(constraints)
    );
    assert_eq!(session.audio_constraint().await, TrackConstraint::Any);

    Ok(())
}

#[test]
fn test_build_rejects_invalid_settings() {
    let mut s = SettingEngine::default();
    s.required_video_codec = String::new();

    let result = MediaSessionBuilder::new()
        .with_setting_engine(s)
        .with_transport_factory(Arc::new(MockTransportFactory::default()))
        .with_media_devices(Arc::new(MockMediaDevices::default()))
        .build();
    assert!(matches!(result, Err(Error::ErrInvalidConfiguration(_))));
}

#[test]
fn test_build_validates_ice_servers() {
    let configuration = RTCConfiguration {
        ice_servers: vec![RTCIceServer {
            urls: vec!["turn:turn.example.org:3478".to_owned()],
            ..Default::default()
        }],
    };

    let result = MediaSessionBuilder::new()
        .with_configuration(configuration)
        .with_transport_factory(Arc::new(MockTransportFactory::default()))
        .with_media_devices(Arc::new(MockMediaDevices::default()))
        .build();
    assert!(matches!(result, Err(Error::ErrNoTurnCredentials)));
}
