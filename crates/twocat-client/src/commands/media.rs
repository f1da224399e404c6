use tracing::debug;

use twocat_media::MediaDevices;
use twocat_shared::types::Attachment;

use crate::classify::LinkClassifier;
use crate::error::ClientError;
use crate::events::{emit_event, ViewEvent};
use crate::views::MediaView;
use crate::Client;

impl<C: LinkClassifier, D: MediaDevices> Client<C, D> {
    /// Attachment behind a display URL. Revoked or unknown URLs yield `None`.
    pub fn attachment(&self, url: &str) -> Result<Option<Attachment>, ClientError> {
        let state = self.lock()?;
        let Some(id) = state.blob_urls.resolve(url) else {
            return Ok(None);
        };
        Ok(state.database.get_post(id)?.and_then(|post| post.file))
    }

    /// Publish the attachment behind a display URL as a [`ViewEvent::Media`].
    pub fn fetch_media(&self, url: &str) -> Result<MediaView, ClientError> {
        let attachment = self
            .attachment(url)?
            .ok_or_else(|| ClientError::MediaNotFound(url.to_string()))?;
        let media = MediaView::new(url, &attachment);
        debug!(url, bytes = attachment.len(), "Media fetched");

        emit_event(&self.events, ViewEvent::Media(media.clone()));
        Ok(media)
    }
}
