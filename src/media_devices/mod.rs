use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::media_stream::{MediaStream, MediaStreamConstraints};

/// MediaDevices opens capture devices.
///
/// Implementations return [`Error::ErrMediaAcquisition`] when a device is
/// unavailable or access is denied.
///
/// [`Error::ErrMediaAcquisition`]: crate::Error::ErrMediaAcquisition
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// get_user_media acquires a stream holding one live track for every kind
    /// requested in `constraints`.
    async fn get_user_media(&self, constraints: &MediaStreamConstraints) -> Result<Arc<MediaStream>>;
}
