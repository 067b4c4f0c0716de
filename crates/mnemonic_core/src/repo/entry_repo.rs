//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert / exact lookup / random sample over `mnemonic_words`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation is a single statement; no partial writes are possible.
//! - A failed insert leaves the table unchanged.
//! - Random samples are uniform over the rows present at call time and carry
//!   no state between calls.

use crate::db::migrations::{latest_version, required_entry_columns};
use crate::db::{schema_version, table_columns, DbError, ENTRIES_TABLE};
use crate::model::entry::{EntryId, EntryStory, MnemonicEntry, NewEntry};
use rusqlite::{ffi, params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    word,
    story,
    note,
    image
FROM mnemonic_words";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Insert rejected because the word is already stored.
    DuplicateWord(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateWord(word) => write!(f, "the word '{word}' already exists"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for entry operations.
pub trait EntryRepository {
    /// Inserts one entry and returns its assigned id.
    fn insert_entry(&self, entry: &NewEntry) -> RepoResult<EntryId>;
    /// Exact, case-sensitive lookup by word.
    fn find_by_word(&self, word: &str) -> RepoResult<Option<EntryStory>>;
    /// One uniformly random entry, or `None` when the table is empty.
    fn sample_random_entry(&self) -> RepoResult<Option<MnemonicEntry>>;
    /// One uniformly random entry whose story does not contain `marker`.
    fn sample_random_entry_excluding(&self, marker: &str) -> RepoResult<Option<MnemonicEntry>>;
    /// Number of stored entries.
    fn count_entries(&self) -> RepoResult<u64>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for &R {
    fn insert_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        (**self).insert_entry(entry)
    }

    fn find_by_word(&self, word: &str) -> RepoResult<Option<EntryStory>> {
        (**self).find_by_word(word)
    }

    fn sample_random_entry(&self) -> RepoResult<Option<MnemonicEntry>> {
        (**self).sample_random_entry()
    }

    fn sample_random_entry_excluding(&self, marker: &str) -> RepoResult<Option<MnemonicEntry>> {
        (**self).sample_random_entry_excluding(marker)
    }

    fn count_entries(&self) -> RepoResult<u64> {
        (**self).count_entries()
    }
}

/// SQLite-backed entry repository over a borrowed, migrated connection.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is behind this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema does
    ///   not carry the entry shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        let result = self.conn.execute(
            "INSERT INTO mnemonic_words (word, story, note, image)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                entry.word.as_str(),
                entry.story.as_str(),
                entry.note.as_deref(),
                entry.image.as_deref(),
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateWord(entry.word.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_word(&self, word: &str) -> RepoResult<Option<EntryStory>> {
        let mut stmt = self.conn.prepare(
            "SELECT story, note
             FROM mnemonic_words
             WHERE word = ?1;",
        )?;

        let mut rows = stmt.query([word])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(EntryStory {
                story: row.get("story")?,
                note: row.get("note")?,
            }));
        }

        Ok(None)
    }

    fn sample_random_entry(&self) -> RepoResult<Option<MnemonicEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY RANDOM() LIMIT 1;"))?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn sample_random_entry_excluding(&self, marker: &str) -> RepoResult<Option<MnemonicEntry>> {
        // instr() is byte-exact, matching str::contains; LIKE would fold case.
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE instr(story, ?1) = 0
             ORDER BY RANDOM()
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([marker])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn count_entries(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM mnemonic_words;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<MnemonicEntry> {
    Ok(MnemonicEntry {
        id: row.get("id")?,
        word: row.get("word")?,
        story: row.get("story")?,
        note: row.get("note")?,
        image: row.get("image")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let columns = table_columns(conn, ENTRIES_TABLE)?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(ENTRIES_TABLE));
    }
    for column in required_entry_columns() {
        if !columns.iter().any(|name| name.eq_ignore_ascii_case(column)) {
            return Err(RepoError::MissingRequiredColumn {
                table: ENTRIES_TABLE,
                column: *column,
            });
        }
    }

    Ok(())
}
