//! Database migration runner.
//!
//! Each schema version is described by an [`Upgrade`]: a list of idempotent
//! [`Effect`]s. On every [`Database::open_at`](crate::Database::open_at) call
//! the runner reads `PRAGMA user_version` and applies, in order and inside a
//! single transaction, every upgrade whose version is above it.

pub mod v003_posts;
pub mod v004_reaffirm_posts;
pub mod v005_parent_id;

use rusqlite::{Connection, Transaction};

use crate::error::{Result, StoreError};

/// Current schema version. Bump this and add a new upgrade module whenever
/// the schema changes.
pub const CURRENT_VERSION: u32 = twocat_shared::constants::SCHEMA_VERSION;

/// All upgrades, oldest first.
pub const UPGRADES: &[Upgrade] = &[
    v003_posts::UPGRADE,
    v004_reaffirm_posts::UPGRADE,
    v005_parent_id::UPGRADE,
];

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub decl: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, decl: &'static str) -> Self {
        Self { name, decl }
    }
}

/// Table layout used when a collection has to be created.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

#[derive(Debug, Clone, Copy)]
pub enum Effect {
    /// Drop the collection if it exists.
    DropCollection(&'static str),
    /// Create the collection if it does not exist.
    EnsureCollection(Schema),
    /// Create a non-unique single-column index if it does not exist.
    EnsureIndex {
        name: &'static str,
        collection: &'static str,
        column: &'static str,
    },
    /// Add the column unless the collection already has it.
    EnsureColumn {
        collection: &'static str,
        column: Column,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Upgrade {
    pub version: u32,
    pub name: &'static str,
    pub effects: &'static [Effect],
}

impl Effect {
    fn apply(&self, tx: &Transaction<'_>) -> rusqlite::Result<()> {
        match self {
            Effect::DropCollection(name) => {
                tx.execute_batch(&format!("DROP TABLE IF EXISTS {name};"))
            }
            Effect::EnsureCollection(schema) => {
                let columns = schema
                    .columns
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.decl))
                    .collect::<Vec<_>>()
                    .join(", ");
                tx.execute_batch(&format!(
                    "CREATE TABLE IF NOT EXISTS {} ({columns});",
                    schema.name
                ))
            }
            Effect::EnsureIndex {
                name,
                collection,
                column,
            } => tx.execute_batch(&format!(
                "CREATE INDEX IF NOT EXISTS {name} ON {collection}({column});"
            )),
            Effect::EnsureColumn { collection, column } => {
                if has_column(tx, collection, column.name)? {
                    return Ok(());
                }
                tx.execute_batch(&format!(
                    "ALTER TABLE {collection} ADD COLUMN {} {};",
                    column.name, column.decl
                ))
            }
        }
    }
}

fn has_column(conn: &Connection, collection: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2")?;
    stmt.exists(rusqlite::params![collection, column])
}

/// Read the schema version recorded in the database header.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Run all pending upgrades against the open connection.
///
/// Either every pending upgrade is applied and the version bumped, or the
/// transaction rolls back and the database is left as it was.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;

    tracing::info!(
        current_version = current,
        target_version = CURRENT_VERSION,
        "checking database migrations"
    );

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;

    for upgrade in UPGRADES.iter().filter(|u| u.version > current) {
        tracing::info!(version = upgrade.version, "applying migration {}", upgrade.name);
        for effect in upgrade.effects {
            effect.apply(&tx).map_err(|e| {
                StoreError::Migration(format!("{} ({effect:?}): {e}", upgrade.name))
            })?;
        }
    }

    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
    tx.commit()?;

    Ok(())
}
