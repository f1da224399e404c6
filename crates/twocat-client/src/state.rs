//! Application state owned by the [`Client`](crate::Client).
//!
//! The [`AppState`] struct is wrapped in `Arc<Mutex<>>` so that intent
//! handlers and background link checks can share it. The lock is never held
//! across an await point.

use std::sync::{Mutex, MutexGuard};

use twocat_media::CaptureStream;
use twocat_store::Database;

use crate::blob_urls::BlobUrlRegistry;
use crate::error::ClientError;

/// Central application state.
pub struct AppState {
    /// Handle to the local post database.
    pub database: Database,

    /// Board whose threads are on screen. Set on board selection, cleared
    /// when going back to the board list.
    pub current_board: Option<String>,

    /// Active call, if any. Dropping it releases the capture devices.
    pub call: Option<CallSession>,

    /// Display URLs handed out for attachments currently on screen.
    pub blob_urls: BlobUrlRegistry,
}

pub struct CallSession {
    pub room: String,
    pub stream: CaptureStream,
}

impl AppState {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            current_board: None,
            call: None,
            blob_urls: BlobUrlRegistry::default(),
        }
    }

    pub fn is_current_board(&self, board: &str) -> bool {
        self.current_board.as_deref() == Some(board)
    }
}

pub(crate) fn lock(state: &Mutex<AppState>) -> Result<MutexGuard<'_, AppState>, ClientError> {
    state
        .lock()
        .map_err(|e| ClientError::LockPoisoned(e.to_string()))
}
