//! Scoped, per-operation access to the entries database file.
//!
//! # Responsibility
//! - Own the database path and hand out one connection per operation.
//! - Release the connection on every exit path, error paths included.
//!
//! # Invariants
//! - No connection outlives the closure it was opened for.
//! - Every connection handed out has passed migrations and repository
//!   readiness checks.
//! - No retries: the first storage failure is returned to the caller.

use crate::db::{open_db, schema_version, DbResult};
use crate::model::entry::{EntryId, EntryStory, MnemonicEntry, NewEntry};
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
use crate::service::entry_service::EntryService;
use log::debug;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File-backed mnemonic store.
#[derive(Debug, Clone)]
pub struct MnemonicStore {
    db_path: PathBuf,
}

impl MnemonicStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Creates or migrates the schema and returns the resulting version.
    ///
    /// Safe to call on every startup.
    pub fn initialize(&self) -> DbResult<u32> {
        let conn = open_db(&self.db_path)?;
        schema_version(&conn)
    }

    /// Runs `op` with a freshly opened connection, closing it afterwards.
    pub fn with_connection<T, E>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        let started_at = Instant::now();
        let conn = open_db(&self.db_path).map_err(RepoError::from)?;
        let result = op(&conn);
        drop(conn);
        debug!(
            "event=db_session module=store status={} duration_ms={}",
            if result.is_ok() { "ok" } else { "error" },
            started_at.elapsed().as_millis()
        );
        result
    }

    /// Runs `op` against a repository bound to a scoped connection.
    pub fn with_repo<T, E>(
        &self,
        op: impl FnOnce(SqliteEntryRepository<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        self.with_connection(|conn| {
            let repo = SqliteEntryRepository::try_new(conn)?;
            op(repo)
        })
    }

    /// Runs `op` against the use-case service bound to a scoped connection.
    pub fn with_service<T, E>(
        &self,
        op: impl FnOnce(&EntryService<SqliteEntryRepository<'_>>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        self.with_repo(|repo| op(&EntryService::new(repo)))
    }

    /// Inserts one entry as given; see [`EntryRepository::insert_entry`].
    pub fn insert_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        self.with_repo(|repo| repo.insert_entry(entry))
    }

    pub fn find_by_word(&self, word: &str) -> RepoResult<Option<EntryStory>> {
        self.with_repo(|repo| repo.find_by_word(word))
    }

    pub fn sample_random_entry(&self) -> RepoResult<Option<MnemonicEntry>> {
        self.with_repo(|repo| repo.sample_random_entry())
    }

    pub fn count_entries(&self) -> RepoResult<u64> {
        self.with_repo(|repo| repo.count_entries())
    }
}
