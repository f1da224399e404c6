//! v003 -- Post collection keyed by auto-assigned id, indexed by board.
//!
//! Also removes the `videos` collection used by releases before posts existed.

use super::{Column, Effect, Schema, Upgrade};

pub const POSTS: Schema = Schema {
    name: "posts",
    columns: &[
        Column::new("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
        Column::new("board_name", "TEXT NOT NULL"),
        Column::new("file", "BLOB"),
        Column::new("file_media_type", "TEXT"),
        Column::new("file_type", "TEXT"),           // 'image' | 'video'
        Column::new("comment", "TEXT NOT NULL DEFAULT ''"),
        Column::new("link_url", "TEXT"),
        Column::new("link_status", "TEXT"),         // 'pending' | 'safe' | 'malware' | 'porn' | 'error'
        Column::new("link_reason", "TEXT"),
        Column::new("username", "TEXT NOT NULL DEFAULT 'Anonymous'"),
        Column::new("timestamp", "INTEGER NOT NULL"), // epoch millis
    ],
};

pub const BOARD_INDEX: Effect = Effect::EnsureIndex {
    name: "idx_posts_board_name",
    collection: "posts",
    column: "board_name",
};

pub const UPGRADE: Upgrade = Upgrade {
    version: 3,
    name: "v003_posts",
    effects: &[
        Effect::DropCollection("videos"),
        Effect::EnsureCollection(POSTS),
        BOARD_INDEX,
    ],
};
