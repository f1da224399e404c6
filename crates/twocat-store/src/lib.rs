//! # twocat-store
//!
//! Local post storage for 2cat, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection`, upgrades the schema on open and provides typed
//! CRUD helpers for posts.

pub mod database;
pub mod migrations;
pub mod models;
pub mod posts;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
