//! Fakes shared by the client tests.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::{broadcast, Notify};

use twocat_media::{CaptureConstraints, CaptureStream, LocalTrack, MediaDevices, MediaError, TrackKind};
use twocat_shared::classification::LinkVerdict;
use twocat_shared::error::ClassificationError;
use twocat_store::Database;

use crate::classify::LinkClassifier;
use crate::events::ViewEvent;
use crate::Client;

/// Answers every link with the same raw classifier response.
pub struct StaticClassifier(pub Value);

impl StaticClassifier {
    pub fn safe() -> Self {
        Self(json!({"type": "safe", "reason": "ok"}))
    }
}

impl LinkClassifier for StaticClassifier {
    async fn classify(&self, _url: &str) -> Result<LinkVerdict, ClassificationError> {
        LinkVerdict::from_value(self.0.clone())
    }
}

pub struct FailingClassifier;

impl LinkClassifier for FailingClassifier {
    async fn classify(&self, _url: &str) -> Result<LinkVerdict, ClassificationError> {
        Err(ClassificationError::Request("connection refused".into()))
    }
}

/// Signals `started` when asked, then waits for `release` before answering.
pub struct GatedClassifier {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
    pub verdict: Value,
}

impl LinkClassifier for GatedClassifier {
    async fn classify(&self, _url: &str) -> Result<LinkVerdict, ClassificationError> {
        self.started.notify_one();
        self.release.notified().await;
        LinkVerdict::from_value(self.verdict.clone())
    }
}

/// Opens a microphone and a camera track and remembers them.
#[derive(Clone, Default)]
pub struct FakeDevices {
    opened: Arc<Mutex<Vec<LocalTrack>>>,
}

impl FakeDevices {
    pub fn opened(&self) -> Vec<LocalTrack> {
        self.opened.lock().unwrap().clone()
    }
}

impl MediaDevices for FakeDevices {
    async fn open(&self, _constraints: &CaptureConstraints) -> Result<CaptureStream, MediaError> {
        let audio = LocalTrack::new(TrackKind::Audio, "fake-mic");
        let video = LocalTrack::new(TrackKind::Video, "fake-cam");
        self.opened
            .lock()
            .unwrap()
            .extend([audio.clone(), video.clone()]);
        Ok(CaptureStream::new(vec![Box::new(audio), Box::new(video)]))
    }
}

pub struct DeniedDevices;

impl MediaDevices for DeniedDevices {
    async fn open(&self, _constraints: &CaptureConstraints) -> Result<CaptureStream, MediaError> {
        Err(MediaError::PermissionDenied)
    }
}

pub fn test_client<C: LinkClassifier, D: MediaDevices>(classifier: C, devices: D) -> Client<C, D> {
    Client::new(Database::open_in_memory().unwrap(), classifier, devices, 64)
}

pub fn drain(rx: &mut broadcast::Receiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
