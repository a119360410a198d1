//! Location schema history.
//!
//! Steps are append-only: a shipped step is never edited, new columns or
//! indexes arrive as a new entry at the end of [`STEPS`].

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "locations",
        sql: include_str!("0001_locations.sql"),
    },
    SchemaStep {
        version: 2,
        name: "location_indexes",
        sql: include_str!("0002_location_indexes.sql"),
    },
];

/// Schema version a freshly opened location database ends up at.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings the location schema up to [`latest_version`].
///
/// All pending steps share one transaction, so a failing step leaves the
/// database at the version it had before the call.
///
/// # Errors
/// - `DbError::SchemaTooNew` when `user_version` is ahead of this build.
/// - `DbError::Migration` naming the step that failed.
pub fn upgrade_schema(conn: &mut Connection) -> DbResult<()> {
    let found = current_user_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        found,
        supported,
        pending.len()
    );
    Ok(())
}

pub(crate) fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
