//! Serializable view models handed to the presentation layer.
//!
//! Board views never carry attachment bytes: a post's media is referenced
//! through the display URL registered for it and fetched separately as a
//! [`MediaView`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use twocat_media::{CaptureStream, TrackKind};
use twocat_shared::boards::Board;
use twocat_shared::constants::EMPTY_COMMENT;
use twocat_shared::types::{Attachment, FileType, LinkStatus, PostId};
use twocat_store::Post;

use crate::blob_urls::BlobUrlRegistry;
use crate::thread::{flatten, ThreadNode};

/// Nesting shown in a thread view. Replies below this depth are listed, in
/// render order, under their deepest shown ancestor.
pub const MAX_REPLY_DEPTH: usize = 16;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: PostId,
    pub board_name: String,
    pub username: String,
    /// Comment as displayed; blank comments read "No comment.".
    pub comment: String,
    pub file_type: Option<FileType>,
    pub media_url: Option<String>,
    pub link_url: Option<String>,
    pub link_status: Option<LinkStatus>,
    pub link_reason: Option<String>,
    pub timestamp: String,
    pub parent_id: Option<PostId>,
    pub is_reply: bool,
}

impl PostDto {
    pub fn from_post(post: &Post, media_url: Option<String>) -> Self {
        Self {
            id: post.id,
            board_name: post.board_name.clone(),
            username: post.username.clone(),
            comment: if post.comment.trim().is_empty() {
                EMPTY_COMMENT.to_string()
            } else {
                post.comment.clone()
            },
            file_type: post.file_type,
            media_url,
            link_url: post.link_url.clone(),
            link_status: post.link_status,
            link_reason: post.link_reason.clone(),
            timestamp: post.timestamp.to_rfc3339(),
            parent_id: post.parent_id,
            is_reply: post.is_reply(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadView {
    #[serde(flatten)]
    pub post: PostDto,
    /// Set on roots whose parent is gone.
    pub orphan: bool,
    pub replies: Vec<ThreadView>,
}

impl ThreadView {
    pub fn from_node(node: &ThreadNode, urls: &BlobUrlRegistry) -> Self {
        Self::nested(node, urls, 0)
    }

    fn nested(node: &ThreadNode, urls: &BlobUrlRegistry, depth: usize) -> Self {
        let replies = if depth + 1 < MAX_REPLY_DEPTH {
            node.children
                .iter()
                .map(|child| Self::nested(child, urls, depth + 1))
                .collect()
        } else {
            flatten(&node.children)
                .into_iter()
                .map(|(_, post)| Self::single(post, urls))
                .collect()
        };
        Self {
            post: Self::dto(&node.post, urls),
            orphan: node.is_orphan(),
            replies,
        }
    }

    fn single(post: &Post, urls: &BlobUrlRegistry) -> Self {
        Self {
            post: Self::dto(post, urls),
            orphan: false,
            replies: Vec::new(),
        }
    }

    fn dto(post: &Post, urls: &BlobUrlRegistry) -> PostDto {
        PostDto::from_post(post, urls.get(post.id).map(str::to_string))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub name: String,
    pub title: String,
    pub post_count: usize,
    pub threads: Vec<ThreadView>,
}

impl BoardView {
    pub fn new(name: &str, title: String, forest: &[ThreadNode], urls: &BlobUrlRegistry) -> Self {
        Self {
            name: name.to_string(),
            title,
            post_count: forest.iter().map(|root| 1 + root.reply_count()).sum(),
            threads: forest
                .iter()
                .map(|root| ThreadView::from_node(root, urls))
                .collect(),
        }
    }
}

/// Attachment bytes behind a display URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub url: String,
    pub media_type: String,
    /// Base64 (standard alphabet, padded).
    pub data: String,
}

impl MediaView {
    pub fn new(url: &str, attachment: &Attachment) -> Self {
        Self {
            url: url.to_string(),
            media_type: attachment.media_type.clone(),
            data: STANDARD.encode(&attachment.data),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    pub name: String,
    pub title: String,
    pub post_count: usize,
    pub sub_boards: Vec<BoardEntry>,
}

impl BoardEntry {
    pub fn new(board: &Board, count: &impl Fn(&str) -> usize) -> Self {
        Self {
            name: board.name.to_string(),
            title: board.title(),
            post_count: count(board.name),
            sub_boards: board
                .sub_boards
                .iter()
                .map(|sub| Self::new(sub, count))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardDirectory {
    pub boards: Vec<BoardEntry>,
    pub call_rooms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallState {
    pub in_call: bool,
    pub room: Option<String>,
    pub tracks: Vec<TrackKind>,
}

impl CallState {
    pub fn idle() -> Self {
        Self {
            in_call: false,
            room: None,
            tracks: Vec::new(),
        }
    }

    pub fn active(room: &str, stream: &CaptureStream) -> Self {
        Self {
            in_call: true,
            room: Some(room.to_string()),
            tracks: stream.tracks().iter().map(|t| t.kind()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_post_dto_hides_bytes() {
        let post = Post {
            id: PostId(3),
            board_name: "/g/".into(),
            file: Some(Attachment::new("image/png", vec![1u8, 2, 3])),
            file_type: Some(FileType::Image),
            comment: String::new(),
            link_url: Some("https://example.com".into()),
            link_status: Some(LinkStatus::Pending),
            link_reason: None,
            username: "Anonymous".into(),
            timestamp: Utc.timestamp_millis_opt(1_000).unwrap(),
            parent_id: None,
        };
        let dto = PostDto::from_post(&post, Some("blob:twocat/abc".into()));
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["mediaUrl"], "blob:twocat/abc");
        assert_eq!(json["fileType"], "image");
        assert_eq!(json["linkStatus"], "pending");
        assert_eq!(json["isReply"], false);
        assert_eq!(json["comment"], "No comment.");
        assert!(json.get("file").is_none());
    }

    #[test]
    fn test_deep_threads_are_capped() {
        let posts: Vec<Post> = (1..=2_000)
            .map(|i| Post {
                id: PostId(i),
                board_name: "/b/".into(),
                file: None,
                file_type: None,
                comment: format!("post {i}"),
                link_url: None,
                link_status: None,
                link_reason: None,
                username: "Anonymous".into(),
                timestamp: Utc.timestamp_millis_opt(i).unwrap(),
                parent_id: (i > 1).then(|| PostId(i - 1)),
            })
            .collect();
        let forest = crate::thread::assemble(posts);
        let view = BoardView::new("/b/", "/b/ - Random".into(), &forest, &BlobUrlRegistry::default());
        assert_eq!(view.post_count, 2_000);

        let mut level = &view.threads[0];
        let mut depth = 0;
        while level.replies.len() == 1 {
            level = &level.replies[0];
            depth += 1;
        }
        assert_eq!(depth, MAX_REPLY_DEPTH - 1);
        assert_eq!(level.replies.len(), 2_000 - MAX_REPLY_DEPTH);
        assert_eq!(level.replies[0].post.id, PostId(MAX_REPLY_DEPTH as i64 + 1));
        assert!(level.replies.iter().all(|r| r.replies.is_empty()));

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"id\":2000"));
    }

    #[test]
    fn test_media_view_encodes_bytes() {
        let media = MediaView::new("blob:twocat/x", &Attachment::new("image/png", vec![0u8, 1, 2]));
        assert_eq!(media.data, "AAEC");
        assert_eq!(media.media_type, "image/png");
    }

    #[test]
    fn test_board_entry_counts_sub_boards() {
        let board = twocat_shared::boards::find_board("/g/").unwrap();
        let entry = BoardEntry::new(board, &|name| usize::from(name == "/g/linux/"));
        assert_eq!(entry.title, "/g/ - Technology and Gadgets");
        assert_eq!(entry.post_count, 0);
        assert_eq!(entry.sub_boards.len(), 3);
        assert_eq!(entry.sub_boards[0].post_count, 1);
    }
}
