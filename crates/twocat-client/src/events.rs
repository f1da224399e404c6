use serde::Serialize;
use tokio::sync::broadcast;

use crate::views::{BoardDirectory, BoardView, CallState, MediaView, PostDto};

/// Everything the presentation layer is told about.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ViewEvent {
    BoardsListed(BoardDirectory),
    BoardRendered(BoardView),
    BoardClosed,
    /// A post changed in place, e.g. its link was classified.
    PostUpdated(PostDto),
    /// Attachment bytes requested through a display URL.
    Media(MediaView),
    CallStateChanged(CallState),
    CallFailed { room: String, message: String },
    Notice { message: String },
}

pub fn emit_event(events: &broadcast::Sender<ViewEvent>, event: ViewEvent) {
    if let Err(broadcast::error::SendError(event)) = events.send(event) {
        tracing::debug!(?event, "No subscribers for view event");
    }
}
