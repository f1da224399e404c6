//! v005 -- Replies.
//!
//! Adds a nullable `parent_id`. Rows written before this step read back as
//! top-level posts. No index on it: threads are assembled in memory from a
//! board's posts.

use super::v003_posts::POSTS;
use super::{Column, Effect, Upgrade};

pub const UPGRADE: Upgrade = Upgrade {
    version: 5,
    name: "v005_parent_id",
    effects: &[
        Effect::EnsureCollection(POSTS),
        Effect::EnsureColumn {
            collection: "posts",
            column: Column::new("parent_id", "INTEGER"),
        },
    ],
};
