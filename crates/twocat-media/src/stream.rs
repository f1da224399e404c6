use tracing::info;

use crate::track::MediaTrack;

/// Tracks acquired together for one call.
///
/// Every track is stopped by [`CaptureStream::stop`] or, failing that, when
/// the stream is dropped, so device indicators never outlive the call.
pub struct CaptureStream {
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl CaptureStream {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stop and detach every track.
    pub fn stop(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        for track in &self.tracks {
            track.stop();
        }
        info!(tracks = self.tracks.len(), "Capture stream stopped");
        self.tracks.clear();
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CaptureStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureStream")
            .field("tracks", &self.tracks.iter().map(|t| t.kind()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{LocalTrack, TrackKind};

    fn stream() -> (CaptureStream, LocalTrack, LocalTrack) {
        let audio = LocalTrack::new(TrackKind::Audio, "mic");
        let video = LocalTrack::new(TrackKind::Video, "cam");
        let stream = CaptureStream::new(vec![Box::new(audio.clone()), Box::new(video.clone())]);
        (stream, audio, video)
    }

    #[test]
    fn test_stop_detaches_all_tracks() {
        let (mut stream, audio, video) = stream();
        assert_eq!(stream.tracks().len(), 2);
        assert!(stream.is_live());

        stream.stop();
        assert!(!audio.is_live());
        assert!(!video.is_live());
        assert!(stream.tracks().is_empty());
    }

    #[test]
    fn test_drop_stops_tracks() {
        let (stream, audio, video) = stream();
        drop(stream);
        assert!(!audio.is_live());
        assert!(!video.is_live());
    }
}
