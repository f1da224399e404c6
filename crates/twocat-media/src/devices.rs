use std::future::Future;

use thiserror::Error;

use crate::audio::AudioConfig;
use crate::stream::CaptureStream;
use crate::video::VideoConfig;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("No camera or microphone available")]
    NoDevice,

    #[error("Permission to use the camera and microphone was denied")]
    PermissionDenied,

    #[error("Capture error: {0}")]
    CaptureError(String),
}

/// What a call asks the devices for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub audio: Option<AudioConfig>,
    pub video: Option<VideoConfig>,
}

impl CaptureConstraints {
    /// Combined microphone and camera capture with default settings.
    pub fn audio_video() -> Self {
        Self {
            audio: Some(AudioConfig::default()),
            video: Some(VideoConfig::default()),
        }
    }
}

/// Source of local capture streams.
///
/// Implementations must not leak partially acquired tracks: if one device
/// opens and the next fails, the opened one is stopped before the error is
/// returned (dropping a [`CaptureStream`] does this).
pub trait MediaDevices: Send + Sync {
    fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> impl Future<Output = Result<CaptureStream, MediaError>> + Send;
}

/// Backend for headless environments: reports that no device exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevices;

impl MediaDevices for NoDevices {
    async fn open(&self, _constraints: &CaptureConstraints) -> Result<CaptureStream, MediaError> {
        Err(MediaError::NoDevice)
    }
}
