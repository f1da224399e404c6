use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use twocat_media::MediaDevices;
use twocat_shared::types::PostId;
use twocat_store::Post;

use crate::classify::LinkClassifier;
use crate::commands::boards::render_board;
use crate::commands::links::run_link_check;
use crate::error::ClientError;
use crate::events::{emit_event, ViewEvent};
use crate::intents::PostDraft;
use crate::Client;

/// Result of a successful submission.
#[derive(Debug)]
pub struct CreatedPost {
    pub post: Post,
    /// Background link check, present when the post carries a link and a
    /// tokio runtime was available to run it.
    pub link_check: Option<JoinHandle<()>>,
}

impl<C: LinkClassifier, D: MediaDevices> Client<C, D> {
    /// Store a new post on the current board and re-render it.
    pub fn create_post(&self, draft: PostDraft) -> Result<CreatedPost, ClientError> {
        draft.validate()?;

        let (post, view) = {
            let mut state = self.lock()?;
            let board = state
                .current_board
                .clone()
                .ok_or(ClientError::NoBoardSelected)?;

            if let Some(parent) = draft.parent_id {
                match state.database.get_post(parent)? {
                    Some(p) if p.board_name == board => {}
                    _ => return Err(ClientError::ParentNotFound(parent)),
                }
            }

            let post = state.database.add_post(&draft.to_new_post(&board))?;
            let view = render_board(&mut state, &board);
            (post, view)
        };
        info!(id = %post.id, board = %post.board_name, reply = post.is_reply(), "Post created");

        // The post is stored from here on, so a failed refresh must not
        // surface as a failed submission.
        let link_check = if post.link_url.is_some() {
            self.spawn_link_check(post.id)
        } else {
            None
        };

        match view {
            Ok(view) => emit_event(&self.events, ViewEvent::BoardRendered(view)),
            Err(e) => {
                warn!(id = %post.id, error = %e, "Post stored but board refresh failed");
                emit_event(
                    &self.events,
                    ViewEvent::Notice {
                        message: e.to_string(),
                    },
                );
            }
        }

        Ok(CreatedPost { post, link_check })
    }

    /// Delete a post, returning what was removed. Replies stay and show up
    /// as threads of their own.
    pub fn delete_post(&self, id: PostId) -> Result<Option<Post>, ClientError> {
        let (removed, view) = {
            let mut state = self.lock()?;
            let removed = state.database.delete_post(id)?;
            state.blob_urls.revoke(id);

            let view = match (&removed, state.current_board.clone()) {
                (Some(post), Some(board)) if post.board_name == board => {
                    Some(render_board(&mut state, &board)?)
                }
                _ => None,
            };
            (removed, view)
        };

        match &removed {
            Some(post) => info!(id = %id, board = %post.board_name, "Post deleted"),
            None => warn!(id = %id, "Delete requested for unknown post"),
        }
        if let Some(view) = view {
            emit_event(&self.events, ViewEvent::BoardRendered(view));
        }
        Ok(removed)
    }

    fn spawn_link_check(&self, id: PostId) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(id = %id, "No async runtime, link stays pending");
            return None;
        };

        let state = Arc::clone(&self.state);
        let classifier = Arc::clone(&self.classifier);
        let events = self.events.clone();
        Some(runtime.spawn(async move {
            if let Err(e) = run_link_check(&state, classifier.as_ref(), &events, id).await {
                warn!(id = %id, error = %e, "Link check failed");
            }
        }))
    }
}
