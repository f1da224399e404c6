//! Display URLs for attachments.
//!
//! Each post with displayable media gets an opaque `blob:` URL while it is on
//! screen. URLs are revoked when the post is deleted, when the board is
//! re-rendered and when the board is closed.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use twocat_shared::constants::BLOB_URL_PREFIX;
use twocat_shared::types::PostId;

#[derive(Debug, Default)]
pub struct BlobUrlRegistry {
    urls: HashMap<PostId, String>,
}

impl BlobUrlRegistry {
    /// Hand out a fresh URL for the post's attachment, revoking any previous one.
    pub fn create(&mut self, id: PostId) -> String {
        let url = format!("{BLOB_URL_PREFIX}{}", Uuid::new_v4());
        if let Some(old) = self.urls.insert(id, url.clone()) {
            debug!(post = %id, url = %old, "replaced blob url");
        }
        url
    }

    pub fn get(&self, id: PostId) -> Option<&str> {
        self.urls.get(&id).map(String::as_str)
    }

    pub fn resolve(&self, url: &str) -> Option<PostId> {
        self.urls
            .iter()
            .find_map(|(id, u)| (u == url).then_some(*id))
    }

    pub fn revoke(&mut self, id: PostId) -> bool {
        self.urls.remove(&id).is_some()
    }

    pub fn revoke_all(&mut self) {
        if !self.urls.is_empty() {
            debug!(count = self.urls.len(), "revoking blob urls");
        }
        self.urls.clear();
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
