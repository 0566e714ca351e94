#[cfg(test)]
mod api_test;

pub mod setting_engine;

use std::sync::Arc;

use setting_engine::*;

use crate::error::{Error, Result};
use crate::media_devices::MediaDevices;
use crate::media_session::{MediaSession, MediaSessionParams};
use crate::media_stream::{MediaIntent, MediaStream};
use crate::peer_connection::configuration::RTCConfiguration;
use crate::peer_connection::TransportFactory;

/// MediaSessionBuilder assembles the collaborators and the initial intent of
/// a [`MediaSession`].
#[derive(Default)]
pub struct MediaSessionBuilder {
    setting_engine: Option<Arc<SettingEngine>>,
    configuration: RTCConfiguration,
    transport_factory: Option<Arc<dyn TransportFactory>>,
    media_devices: Option<Arc<dyn MediaDevices>>,
    audio: MediaIntent,
    video: MediaIntent,
    offer_to_receive_audio: bool,
    offer_to_receive_video: bool,
    local_media_stream: Option<Arc<MediaStream>>,
}

impl MediaSessionBuilder {
    pub fn new() -> Self {
        MediaSessionBuilder::default()
    }

    /// build creates the session and spawns its driver on the current tokio
    /// runtime. A transport factory and media devices are required.
    pub fn build(mut self) -> Result<MediaSession> {
        let setting_engine = match self.setting_engine.take() {
            Some(setting_engine) => setting_engine,
            None => Arc::new(SettingEngine::default()),
        };
        setting_engine.validate()?;
        self.configuration.validate()?;

        let transport_factory = self.transport_factory.take().ok_or_else(|| {
            Error::ErrInvalidConfiguration("a transport factory is required".to_owned())
        })?;
        let media_devices = self.media_devices.take().ok_or_else(|| {
            Error::ErrInvalidConfiguration("media devices are required".to_owned())
        })?;

        Ok(MediaSession::new(MediaSessionParams {
            setting_engine,
            configuration: self.configuration,
            transport_factory,
            media_devices,
            audio: self.audio,
            video: self.video,
            offer_to_receive_audio: self.offer_to_receive_audio,
            offer_to_receive_video: self.offer_to_receive_video,
            local_media_stream: self.local_media_stream,
        }))
    }

    /// with_setting_engine allows providing a SettingEngine to the session.
    /// Settings should not be changed after passing the engine to a session.
    pub fn with_setting_engine(mut self, setting_engine: SettingEngine) -> Self {
        self.setting_engine = Some(Arc::new(setting_engine));
        self
    }

    /// with_configuration sets the ice servers handed to the transport
    /// factory. They are validated by [`MediaSessionBuilder::build`].
    pub fn with_configuration(mut self, configuration: RTCConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// with_transport_factory sets how the session creates its transport.
    pub fn with_transport_factory(mut self, transport_factory: Arc<dyn TransportFactory>) -> Self {
        self.transport_factory = Some(transport_factory);
        self
    }

    pub fn with_media_devices(mut self, media_devices: Arc<dyn MediaDevices>) -> Self {
        self.media_devices = Some(media_devices);
        self
    }

    /// with_audio sets the initial audio intent, a flag or a constraint.
    pub fn with_audio(mut self, audio: impl Into<MediaIntent>) -> Self {
        self.audio = audio.into();
        self
    }

    /// with_video sets the initial video intent, a flag or a constraint.
    pub fn with_video(mut self, video: impl Into<MediaIntent>) -> Self {
        self.video = video.into();
        self
    }

    pub fn with_offer_to_receive_audio(mut self, offer_to_receive: bool) -> Self {
        self.offer_to_receive_audio = offer_to_receive;
        self
    }

    pub fn with_offer_to_receive_video(mut self, offer_to_receive: bool) -> Self {
        self.offer_to_receive_video = offer_to_receive;
        self
    }

    /// with_local_media_stream hands over an already acquired local stream,
    /// which the first offer then uses instead of acquiring capture.
    pub fn with_local_media_stream(mut self, stream: Arc<MediaStream>) -> Self {
        self.local_media_stream = Some(stream);
        self
    }
}
