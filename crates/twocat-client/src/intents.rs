//! User intents accepted by [`Client::dispatch`](crate::Client::dispatch).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer};

use twocat_shared::error::ValidationError;
use twocat_shared::types::{Attachment, PostId};
use twocat_store::NewPost;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    ListBoards,
    SelectBoard { name: String },
    BackToBoards,
    CreatePost(PostDraft),
    DeletePost { id: PostId },
    FetchMedia { url: String },
    JoinCall { room: String },
    LeaveCall,
}

/// Post form contents as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(deserialize_with = "decode_file")]
    pub file: Option<Attachment>,
    pub comment: String,
    pub link_url: Option<String>,
    pub username: Option<String>,
    pub parent_id: Option<PostId>,
}

// Files arrive as `{"mediaType": "...", "data": "<base64>"}`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileInput {
    media_type: String,
    data: String,
}

fn decode_file<'de, D>(deserializer: D) -> Result<Option<Attachment>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(input) = Option::<FileInput>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let data = STANDARD
        .decode(input.data.trim())
        .map_err(serde::de::Error::custom)?;
    Ok(Some(Attachment::new(input.media_type, data)))
}

impl PostDraft {
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

    fn attachment(&self) -> Option<&Attachment> {
        self.file.as_ref().filter(|f| !f.is_empty())
    }

    fn trimmed_link(&self) -> Option<&str> {
        self.link_url
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    /// Reject drafts that carry nothing, or a link that is not http(s).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let link = self.trimmed_link();
        if self.attachment().is_none() && link.is_none() && self.comment.trim().is_empty() {
            return Err(ValidationError::EmptyPost);
        }
        if let Some(link) = link {
            if !(link.starts_with("http://") || link.starts_with("https://")) {
                return Err(ValidationError::InvalidLink);
            }
        }
        Ok(())
    }

    pub fn to_new_post(&self, board_name: &str) -> NewPost {
        NewPost {
            board_name: board_name.to_string(),
            file: self.attachment().cloned(),
            comment: self.comment.trim().to_string(),
            link_url: self.trimmed_link().map(str::to_string),
            username: self.username.clone(),
            parent_id: self.parent_id,
        }
    }
}
