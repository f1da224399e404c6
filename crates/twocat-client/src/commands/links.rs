use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use twocat_media::MediaDevices;
use twocat_shared::constants::{REASON_CHECK_FAILED, REASON_INVALID_RESPONSE};
use twocat_shared::error::ClassificationError;
use twocat_shared::types::{LinkStatus, PostId};
use twocat_store::Post;

use crate::classify::LinkClassifier;
use crate::error::ClientError;
use crate::events::{emit_event, ViewEvent};
use crate::state::{lock, AppState};
use crate::views::PostDto;
use crate::Client;

impl<C: LinkClassifier, D: MediaDevices> Client<C, D> {
    /// Classify a post's pending link and store the verdict. Returns the
    /// updated post, or `None` when nothing was written.
    pub async fn check_link(&self, id: PostId) -> Result<Option<Post>, ClientError> {
        run_link_check(&self.state, self.classifier.as_ref(), &self.events, id).await
    }
}

pub(crate) async fn run_link_check<C: LinkClassifier>(
    state: &Mutex<AppState>,
    classifier: &C,
    events: &broadcast::Sender<ViewEvent>,
    id: PostId,
) -> Result<Option<Post>, ClientError> {
    let url = {
        let state = lock(state)?;
        match state.database.get_post(id)? {
            Some(post) if post.link_status == Some(LinkStatus::Pending) => post.link_url,
            _ => None,
        }
    };
    let Some(url) = url else {
        debug!(id = %id, "No pending link to check");
        return Ok(None);
    };

    let (status, reason) = match classifier.classify(&url).await {
        Ok(verdict) => (verdict.category.status(), verdict.reason),
        Err(e @ (ClassificationError::UnexpectedType(_) | ClassificationError::Malformed(_))) => {
            warn!(id = %id, error = %e, "Classifier answer rejected");
            (LinkStatus::Error, REASON_INVALID_RESPONSE.to_string())
        }
        Err(e) => {
            warn!(id = %id, error = %e, "Classifier unavailable");
            (LinkStatus::Error, REASON_CHECK_FAILED.to_string())
        }
    };

    let (post, dto) = {
        let state = lock(state)?;

        // The post may have been deleted or classified while we waited.
        let Some(mut post) = state.database.get_post(id)? else {
            info!(id = %id, "Post deleted before its link was classified");
            return Ok(None);
        };
        if !LinkStatus::can_follow(post.link_status, status) {
            debug!(id = %id, current = ?post.link_status, "Link already classified");
            return Ok(None);
        }

        post.link_status = Some(status);
        post.link_reason = Some(reason);
        if !state.database.update_post(&post)? {
            return Ok(None);
        }

        let dto = state.is_current_board(&post.board_name).then(|| {
            PostDto::from_post(&post, state.blob_urls.get(post.id).map(str::to_string))
        });
        (post, dto)
    };
    info!(id = %id, status = %status, "Link classified");

    if let Some(dto) = dto {
        emit_event(events, ViewEvent::PostUpdated(dto));
    }
    Ok(Some(post))
}
