use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// One captured device feed. Stopping releases the device; a stopped track
/// never becomes live again.
pub trait MediaTrack: Send + Sync {
    fn kind(&self) -> TrackKind;
    fn stop(&self);
    fn is_live(&self) -> bool;
}

/// Track backed by a shared live flag. Clones share the flag, so a device
/// backend keeps a clone in its capture loop and stops feeding frames once
/// any clone is stopped.
#[derive(Debug, Clone)]
pub struct LocalTrack {
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MediaTrack for LocalTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!(kind = ?self.kind, label = %self.label, "Track stopped");
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }
}
