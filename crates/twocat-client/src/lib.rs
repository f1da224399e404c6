//! 2cat client core.
//!
//! The [`Client`] owns the application state, accepts user [`Intent`]s and
//! publishes [`ViewEvent`]s to whoever renders the interface. Board contents
//! live in the local store (`twocat-store`); links attached to posts are
//! checked by an external classifier in the background.

pub mod blob_urls;
pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod intents;
pub mod state;
pub mod thread;
pub mod views;

#[cfg(test)]
mod test_support;

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use twocat_media::MediaDevices;
use twocat_store::Database;

pub use classify::{HttpLinkClassifier, LinkClassifier};
pub use config::ClientConfig;
pub use error::ClientError;
pub use events::ViewEvent;
pub use intents::{Intent, PostDraft};
pub use state::AppState;

use events::emit_event;

const DEFAULT_LOG_FILTER: &str = "twocat_client=debug,twocat_store=info,twocat_media=info,warn";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Output goes to stderr.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

pub struct Client<C, D> {
    state: Arc<Mutex<AppState>>,
    classifier: Arc<C>,
    devices: D,
    events: broadcast::Sender<ViewEvent>,
}

impl<C: LinkClassifier, D: MediaDevices> Client<C, D> {
    pub fn new(database: Database, classifier: C, devices: D, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            state: Arc::new(Mutex::new(AppState::new(database))),
            classifier: Arc::new(classifier),
            devices,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    /// Route an intent to its handler. Failures are also published as a
    /// [`ViewEvent::Notice`] so the interface can show them.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), ClientError> {
        let result = match intent {
            Intent::ListBoards => self.list_boards().map(drop),
            Intent::SelectBoard { name } => self.select_board(&name).map(drop),
            Intent::BackToBoards => self.back_to_boards(),
            Intent::CreatePost(draft) => self.create_post(draft).map(drop),
            Intent::DeletePost { id } => self.delete_post(id).map(drop),
            Intent::FetchMedia { url } => self.fetch_media(&url).map(drop),
            Intent::JoinCall { room } => self.join_call(&room).await,
            Intent::LeaveCall => self.leave_call(),
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Intent failed");
            emit_event(
                &self.events,
                ViewEvent::Notice {
                    message: e.to_string(),
                },
            );
        }
        result
    }

    fn lock(&self) -> Result<MutexGuard<'_, AppState>, ClientError> {
        state::lock(&self.state)
    }
}
