//! Domain model structs persisted in the local database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use twocat_shared::constants::DEFAULT_USERNAME;
use twocat_shared::types::{Attachment, FileType, LinkStatus, PostId};

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A stored post. Top-level posts have no `parent_id`; replies point at the
/// post they answer, which may since have been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Auto-assigned, never reused.
    pub id: PostId,
    /// Board the post belongs to (e.g. `/g/linux/`).
    pub board_name: String,
    /// Optional media attachment.
    pub file: Option<Attachment>,
    /// Display kind derived from the attachment's media type at creation.
    pub file_type: Option<FileType>,
    /// Free text, possibly empty.
    pub comment: String,
    pub link_url: Option<String>,
    /// `Pending` as soon as a link is attached, then set once by classification.
    pub link_status: Option<LinkStatus>,
    pub link_reason: Option<String>,
    pub username: String,
    /// Creation time, millisecond precision.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub parent_id: Option<PostId>,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// NewPost
// ---------------------------------------------------------------------------

/// Input for creating a post; the store fills in id, timestamp and the
/// derived fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub board_name: String,
    pub file: Option<Attachment>,
    pub comment: String,
    pub link_url: Option<String>,
    pub username: Option<String>,
    pub parent_id: Option<PostId>,
}

impl NewPost {
    pub fn new(board_name: impl Into<String>) -> Self {
        Self {
            board_name: board_name.into(),
            ..Self::default()
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn reply_to(mut self, parent: PostId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Link URL with blank values treated as absent.
    pub fn normalized_link(&self) -> Option<&str> {
        self.link_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn normalized_username(&self) -> &str {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_USERNAME)
    }

    /// Build the record that will be stored under `id`.
    pub(crate) fn to_post(&self, id: PostId, timestamp: DateTime<Utc>) -> Post {
        let link_url = self.normalized_link().map(str::to_string);
        let link_status = link_url.as_ref().map(|_| LinkStatus::Pending);

        Post {
            id,
            board_name: self.board_name.clone(),
            file_type: self.file.as_ref().and_then(Attachment::file_type),
            file: self.file.clone(),
            comment: self.comment.clone(),
            link_url,
            link_status,
            link_reason: None,
            username: self.normalized_username().to_string(),
            timestamp,
            parent_id: self.parent_id,
        }
    }
}
