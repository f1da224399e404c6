//! CRUD operations for [`Post`] records.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use twocat_shared::types::{Attachment, FileType, LinkStatus, PostId};

use crate::database::Database;
use crate::error::Result;
use crate::models::{NewPost, Post};

const POST_COLUMNS: &str = "id, board_name, file, file_media_type, file_type, comment, \
     link_url, link_status, link_reason, username, timestamp, parent_id";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Store a new post stamped with the current time and return the full
    /// record, including the assigned id.
    pub fn add_post(&self, new_post: &NewPost) -> Result<Post> {
        let now = Utc::now();
        let now = DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        self.insert_post_at(new_post, now)
    }

    /// Like [`Database::add_post`] with an explicit creation time.
    pub fn insert_post_at(&self, new_post: &NewPost, timestamp: DateTime<Utc>) -> Result<Post> {
        let mut post = new_post.to_post(PostId(0), timestamp);

        self.conn().execute(
            "INSERT INTO posts (board_name, file, file_media_type, file_type, comment,
                                link_url, link_status, link_reason, username, timestamp, parent_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                post.board_name,
                post.file.as_ref().map(|f| f.data.as_ref()),
                post.file.as_ref().map(|f| f.media_type.as_str()),
                post.file_type.map(|t| t.as_str()),
                post.comment,
                post.link_url,
                post.link_status.map(|s| s.as_str()),
                post.link_reason,
                post.username,
                post.timestamp.timestamp_millis(),
                post.parent_id.map(|p| p.0),
            ],
        )?;

        post.id = PostId(self.conn().last_insert_rowid());

        tracing::debug!(
            id = %post.id,
            board = %post.board_name,
            parent = ?post.parent_id,
            "post stored"
        );

        Ok(post)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All posts of a board, newest first. Posts sharing a timestamp keep
    /// insertion order.
    pub fn load_posts(&self, board_name: &str) -> Result<Vec<Post>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {POST_COLUMNS}
             FROM posts
             WHERE board_name = ?1
             ORDER BY timestamp DESC, id ASC"
        ))?;

        let rows = stmt.query_map(params![board_name], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    pub fn get_post(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id.0],
                row_to_post,
            )
            .optional()?)
    }

    pub fn count_posts(&self, board_name: &str) -> Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM posts WHERE board_name = ?1",
            params![board_name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite the stored record with the same id.
    ///
    /// Returns `false` when no such record exists; a deleted post is never
    /// brought back.
    pub fn update_post(&self, post: &Post) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE posts
             SET board_name = ?2, file = ?3, file_media_type = ?4, file_type = ?5,
                 comment = ?6, link_url = ?7, link_status = ?8, link_reason = ?9,
                 username = ?10, timestamp = ?11, parent_id = ?12
             WHERE id = ?1",
            params![
                post.id.0,
                post.board_name,
                post.file.as_ref().map(|f| f.data.as_ref()),
                post.file.as_ref().map(|f| f.media_type.as_str()),
                post.file_type.map(|t| t.as_str()),
                post.comment,
                post.link_url,
                post.link_status.map(|s| s.as_str()),
                post.link_reason,
                post.username,
                post.timestamp.timestamp_millis(),
                post.parent_id.map(|p| p.0),
            ],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a post and return the record as it was, so the caller can
    /// release anything tied to it. Replies are left in place.
    pub fn delete_post(&self, id: PostId) -> Result<Option<Post>> {
        let tx = self.conn().unchecked_transaction()?;

        let existing = tx
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id.0],
                row_to_post,
            )
            .optional()?;

        if existing.is_some() {
            tx.execute("DELETE FROM posts WHERE id = ?1", params![id.0])?;
        }
        tx.commit()?;

        Ok(existing)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct BadValue(String);

/// Map a `rusqlite::Row` to a [`Post`].
fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    let id: i64 = row.get(0)?;
    let board_name: String = row.get(1)?;
    let file_data: Option<Vec<u8>> = row.get(2)?;
    let file_media_type: Option<String> = row.get(3)?;
    let file_type_str: Option<String> = row.get(4)?;
    let comment: Option<String> = row.get(5)?;
    let link_url: Option<String> = row.get(6)?;
    let link_status_str: Option<String> = row.get(7)?;
    let link_reason: Option<String> = row.get(8)?;
    let username: String = row.get(9)?;
    let ts_millis: i64 = row.get(10)?;
    let parent_id: Option<i64> = row.get(11)?;

    let file = file_data.map(|data| Attachment {
        media_type: file_media_type.unwrap_or_default(),
        data: Bytes::from(data),
    });

    let file_type = file_type_str
        .map(|s| s.parse::<FileType>())
        .transpose()
        .map_err(|e| conversion_error(4, BadValue(e)))?;

    let link_status = link_status_str
        .map(|s| s.parse::<LinkStatus>())
        .transpose()
        .map_err(|e| conversion_error(7, BadValue(e)))?;

    let timestamp = DateTime::<Utc>::from_timestamp_millis(ts_millis)
        .ok_or_else(|| conversion_error(10, BadValue(format!("timestamp out of range: {ts_millis}"))))?;

    Ok(Post {
        id: PostId(id),
        board_name,
        file,
        file_type,
        comment: comment.unwrap_or_default(),
        link_url,
        link_status,
        link_reason,
        username,
        timestamp,
        parent_id: parent_id.map(PostId),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn add_post_returns_stored_record() {
        let db = db();
        let post = db.add_post(&NewPost::new("/b/").comment("hi")).unwrap();

        assert!(post.id.0 > 0);
        assert_eq!(post.username, "Anonymous");
        assert_eq!(post.link_status, None);
        assert_eq!(post.parent_id, None);
        assert_eq!(db.get_post(post.id).unwrap(), Some(post));
    }

    #[test]
    fn ids_increase_and_are_not_reused() {
        let db = db();
        let a = db.add_post(&NewPost::new("/b/").comment("a")).unwrap();
        let b = db.add_post(&NewPost::new("/b/").comment("b")).unwrap();
        assert!(b.id > a.id);

        db.delete_post(b.id).unwrap();
        let c = db.add_post(&NewPost::new("/b/").comment("c")).unwrap();
        assert!(c.id > b.id);
    }

    #[test]
    fn file_type_is_derived_from_media_type() {
        let db = db();
        let video = db
            .add_post(&NewPost::new("/b/").file(Attachment::new("video/mp4", vec![1, 2, 3])))
            .unwrap();
        let image = db
            .add_post(&NewPost::new("/b/").file(Attachment::new("image/png", vec![4])))
            .unwrap();
        let pdf = db
            .add_post(&NewPost::new("/b/").file(Attachment::new("application/pdf", vec![5, 6])))
            .unwrap();

        assert_eq!(video.file_type, Some(FileType::Video));
        assert_eq!(image.file_type, Some(FileType::Image));
        assert_eq!(pdf.file_type, None);

        let stored = db.get_post(pdf.id).unwrap().unwrap();
        assert_eq!(stored.file_type, None);
        assert_eq!(stored.file.unwrap().data.as_ref(), &[5, 6]);
    }

    #[test]
    fn link_sets_pending_status() {
        let db = db();
        let linked = db
            .add_post(&NewPost::new("/b/").link("http://example.com"))
            .unwrap();
        let blank = db.add_post(&NewPost::new("/b/").comment("x").link("   ")).unwrap();

        assert_eq!(linked.link_status, Some(LinkStatus::Pending));
        assert_eq!(linked.link_reason, None);
        assert_eq!(blank.link_url, None);
        assert_eq!(blank.link_status, None);
    }

    #[test]
    fn blank_username_defaults_to_anonymous() {
        let db = db();
        let named = db
            .add_post(&NewPost::new("/b/").comment("x").username("  moot "))
            .unwrap();
        let blank = db.add_post(&NewPost::new("/b/").comment("x").username("   ")).unwrap();

        assert_eq!(named.username, "moot");
        assert_eq!(blank.username, "Anonymous");
    }

    #[test]
    fn load_posts_is_board_scoped_and_newest_first() {
        let db = db();
        let old = db.insert_post_at(&NewPost::new("/b/").comment("old"), at(1_000)).unwrap();
        let tie_a = db.insert_post_at(&NewPost::new("/b/").comment("tie a"), at(2_000)).unwrap();
        let tie_b = db.insert_post_at(&NewPost::new("/b/").comment("tie b"), at(2_000)).unwrap();
        let new = db.insert_post_at(&NewPost::new("/b/").comment("new"), at(3_000)).unwrap();
        db.insert_post_at(&NewPost::new("/g/").comment("other"), at(4_000)).unwrap();

        let ids: Vec<PostId> = db.load_posts("/b/").unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![new.id, tie_a.id, tie_b.id, old.id]);

        assert!(db.load_posts("/g/").unwrap().iter().all(|p| p.board_name == "/g/"));
        assert!(db.load_posts("/empty/").unwrap().is_empty());
        assert_eq!(db.count_posts("/b/").unwrap(), 4);
    }

    #[test]
    fn delete_leaves_replies_in_place() {
        let db = db();
        let parent = db.add_post(&NewPost::new("/b/").comment("parent")).unwrap();
        let reply = db
            .add_post(&NewPost::new("/b/").comment("reply").reply_to(parent.id))
            .unwrap();

        let removed = db.delete_post(parent.id).unwrap();
        assert_eq!(removed, Some(parent.clone()));
        assert_eq!(db.get_post(parent.id).unwrap(), None);

        let remaining = db.load_posts("/b/").unwrap();
        assert_eq!(remaining, vec![reply]);
        assert_eq!(remaining[0].parent_id, Some(parent.id));
    }

    #[test]
    fn delete_missing_post_returns_none() {
        let db = db();
        assert_eq!(db.delete_post(PostId(42)).unwrap(), None);
    }

    #[test]
    fn update_overwrites_and_never_resurrects() {
        let db = db();
        let mut post = db.add_post(&NewPost::new("/b/").link("http://example.com")).unwrap();

        post.link_status = Some(LinkStatus::Malware);
        post.link_reason = Some("flagged".into());
        assert!(db.update_post(&post).unwrap());

        let stored = db.get_post(post.id).unwrap().unwrap();
        assert_eq!(stored.link_status, Some(LinkStatus::Malware));
        assert_eq!(stored.link_reason.as_deref(), Some("flagged"));

        db.delete_post(post.id).unwrap();
        assert!(!db.update_post(&post).unwrap());
        assert_eq!(db.get_post(post.id).unwrap(), None);
    }

    #[test]
    fn timestamps_have_millisecond_precision() {
        let db = db();
        let post = db.add_post(&NewPost::new("/b/").comment("x")).unwrap();
        assert_eq!(post.timestamp.timestamp_subsec_nanos() % 1_000_000, 0);
        assert_eq!(db.get_post(post.id).unwrap().unwrap().timestamp, post.timestamp);
    }

    /// Layout written by releases at schema v3/v4, before replies existed.
    fn create_legacy_db(path: &std::path::Path, version: u32) {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                board_name TEXT NOT NULL,
                file BLOB,
                file_media_type TEXT,
                file_type TEXT,
                comment TEXT NOT NULL DEFAULT '',
                link_url TEXT,
                link_status TEXT,
                link_reason TEXT,
                username TEXT NOT NULL DEFAULT 'Anonymous',
                timestamp INTEGER NOT NULL
            );
            CREATE INDEX idx_posts_board_name ON posts(board_name);
            INSERT INTO posts (board_name, comment, username, timestamp)
                VALUES ('/b/', 'from before replies', 'Anonymous', 1000);
            INSERT INTO posts (board_name, comment, link_url, link_status, link_reason, username, timestamp)
                VALUES ('/b/', 'linked', 'http://example.com', 'safe', 'ok', 'anon', 2000);",
        )
        .unwrap();
        conn.pragma_update(None, "user_version", version).unwrap();
    }

    #[test]
    fn upgrade_from_v3_keeps_posts_as_top_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        create_legacy_db(&path, 3);

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), 5);

        let posts = db.load_posts("/b/").unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.parent_id.is_none()));
        assert_eq!(posts[0].link_status, Some(LinkStatus::Safe));
        assert_eq!(posts[1].comment, "from before replies");

        let reply = db
            .add_post(&NewPost::new("/b/").comment("reply").reply_to(posts[1].id))
            .unwrap();
        assert_eq!(db.get_post(reply.id).unwrap().unwrap().parent_id, Some(posts[1].id));
    }

    #[test]
    fn upgrade_from_v4_does_not_lose_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        create_legacy_db(&path, 4);

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), 5);
        assert_eq!(db.count_posts("/b/").unwrap(), 2);
    }
}
