use anyhow::{bail, Context, Result};
use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 1;

/// Brings a fresh database up to `SCHEMA_VERSION`. Files written by a newer
/// build are refused rather than downgraded.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    let found: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    match found {
        SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn
                .transaction()
                .context("failed to open schema transaction")?;
            tx.execute_batch(include_str!("schemas/schema_v1.sql"))
                .context("failed to create kv_entries table")?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)
                .context("failed to stamp schema version")?;
            tx.commit().context("failed to commit schema")
        }
        newer if newer > SCHEMA_VERSION => {
            bail!("store schema v{newer} was written by a newer build (supported: v{SCHEMA_VERSION})")
        }
        other => bail!("unrecognized store schema version {other}"),
    }
}
