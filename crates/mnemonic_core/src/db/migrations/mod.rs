//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Re-check additive column steps on every open.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A column step never adds a column that already exists, so running the
//!   executor any number of times leaves the same schema.

use crate::db::{schema_version, table_columns, DbError, DbResult, ENTRIES_TABLE};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    step: Step,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Sql(&'static str),
    AddColumns(&'static [AddColumn]),
}

#[derive(Debug, Clone, Copy)]
struct AddColumn {
    table: &'static str,
    column: &'static str,
    decl: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        step: Step::Sql(include_str!("0001_init.sql")),
    },
    Migration {
        version: 2,
        step: Step::AddColumns(&[
            AddColumn {
                table: ENTRIES_TABLE,
                column: "note",
                decl: "TEXT",
            },
            AddColumn {
                table: ENTRIES_TABLE,
                column: "image",
                decl: "BLOB",
            },
        ]),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Columns every ready `mnemonic_words` table must carry.
pub fn required_entry_columns() -> &'static [&'static str] {
    &["id", "word", "story", "note", "image"]
}

/// Applies all pending migrations on the provided connection.
///
/// SQL steps run once, gated by `user_version`. Column steps run on every
/// call and only add what is missing.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = schema_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        let pending = migration.version > current_version;
        match migration.step {
            Step::Sql(sql) if pending => tx.execute_batch(sql)?,
            Step::Sql(_) => {}
            Step::AddColumns(columns) => add_missing_columns(&tx, columns)?,
        }
        if pending {
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
            info!(
                "event=db_migrate module=db status=ok version={}",
                migration.version
            );
        }
    }
    tx.commit()?;

    Ok(())
}

fn add_missing_columns(tx: &Transaction<'_>, columns: &[AddColumn]) -> DbResult<()> {
    for column in columns {
        let existing = table_columns(tx, column.table)?;
        if existing.iter().any(|name| name.eq_ignore_ascii_case(column.column)) {
            continue;
        }

        tx.execute_batch(&format!(
            "ALTER TABLE {} ADD COLUMN {} {};",
            column.table, column.column, column.decl
        ))?;
        info!(
            "event=db_migrate module=db status=ok action=add_column table={} column={}",
            column.table, column.column
        );
    }
    Ok(())
}
