//! # twocat-media
//!
//! Local camera and microphone capture for call rooms. Only acquisition and
//! release are modelled here; there is no signaling or transport.

pub mod audio;
pub mod devices;
pub mod stream;
pub mod track;
pub mod video;

pub use devices::{CaptureConstraints, MediaDevices, MediaError, NoDevices};
pub use stream::CaptureStream;
pub use track::{LocalTrack, MediaTrack, TrackKind};
