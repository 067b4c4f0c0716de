//! Entry use-case service.
//!
//! # Responsibility
//! - Validate and normalize user input before it reaches storage.
//! - Translate duplicate inserts into a user-facing error.
//! - Implement random review with an optional excluded story marker.
//!
//! # Invariants
//! - Review never loops unboundedly: after `max_attempts` rejected samples a
//!   single filtered query decides the result.
//! - Review results stay uniform over the entries that qualify.
//! - Logs carry lengths and counts only, never entry text.

use crate::model::entry::{EntryId, EntryStory, EntryValidationError, MnemonicEntry, NewEntry};
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_REVIEW_MAX_ATTEMPTS: u32 = 32;

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryServiceError {
    /// Input rejected before storage was touched.
    Validation(EntryValidationError),
    /// The word is already stored; the table is unchanged.
    DuplicateWord(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl EntryServiceError {
    /// Whether this error should be shown as a warning rather than a failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DuplicateWord(_))
    }
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateWord(word) => write!(f, "the word '{word}' already exists"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateWord(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateWord(word) => Self::DuplicateWord(word),
            other => Self::Repo(other),
        }
    }
}

impl From<EntryValidationError> for EntryServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Filtering rule for random review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPolicy {
    /// Entries whose story contains this text are skipped.
    pub excluded_marker: Option<String>,
    /// Plain samples drawn before falling back to a filtered query.
    pub max_attempts: u32,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            excluded_marker: None,
            max_attempts: DEFAULT_REVIEW_MAX_ATTEMPTS,
        }
    }
}

impl ReviewPolicy {
    pub fn excluding(marker: impl Into<String>) -> Self {
        Self {
            excluded_marker: Some(marker.into()),
            ..Self::default()
        }
    }

    /// Active marker; an empty marker would match every story, so it counts
    /// as no marker.
    pub fn marker(&self) -> Option<&str> {
        self.excluded_marker
            .as_deref()
            .filter(|marker| !marker.is_empty())
    }
}

/// Entry service facade over repository implementations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, normalizes and stores one entry.
    ///
    /// # Errors
    /// - `Validation` when word or story is blank after trimming.
    /// - `DuplicateWord` when the trimmed word is already stored.
    pub fn add_entry(&self, entry: NewEntry) -> Result<EntryId, EntryServiceError> {
        let entry = entry.normalized()?;
        match self.repo.insert_entry(&entry) {
            Ok(id) => {
                info!(
                    "event=entry_add module=service status=ok id={id} word_len={} has_note={} image_bytes={}",
                    entry.word.chars().count(),
                    entry.note.is_some(),
                    entry.image.as_ref().map_or(0, Vec::len)
                );
                Ok(id)
            }
            Err(err) => {
                let err = EntryServiceError::from(err);
                warn!(
                    "event=entry_add module=service status=error error_code={}",
                    error_code(&err)
                );
                Err(err)
            }
        }
    }

    /// Looks up the story for a word, trimming the query first.
    pub fn lookup(&self, word: &str) -> Result<Option<EntryStory>, EntryServiceError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(EntryValidationError::EmptyWord.into());
        }
        let found = self.repo.find_by_word(word)?;
        debug!(
            "event=entry_lookup module=service status=ok found={}",
            found.is_some()
        );
        Ok(found)
    }

    /// Draws one entry for review, skipping stories with the excluded marker.
    ///
    /// Returns `None` when the table is empty or no entry qualifies.
    pub fn review(&self, policy: &ReviewPolicy) -> RepoResult<Option<MnemonicEntry>> {
        let Some(marker) = policy.marker() else {
            return self.repo.sample_random_entry();
        };

        for attempt in 1..=policy.max_attempts {
            match self.repo.sample_random_entry()? {
                None => return Ok(None),
                Some(entry) if entry.story_contains(marker) => {
                    debug!("event=entry_review module=service status=skipped attempt={attempt}");
                }
                Some(entry) => {
                    debug!("event=entry_review module=service status=ok attempts={attempt}");
                    return Ok(Some(entry));
                }
            }
        }

        warn!(
            "event=entry_review module=service status=fallback attempts={}",
            policy.max_attempts
        );
        self.repo.sample_random_entry_excluding(marker)
    }

    pub fn count_entries(&self) -> RepoResult<u64> {
        self.repo.count_entries()
    }
}

fn error_code(err: &EntryServiceError) -> &'static str {
    match err {
        EntryServiceError::Validation(EntryValidationError::EmptyWord) => "empty_word",
        EntryServiceError::Validation(EntryValidationError::EmptyStory) => "empty_story",
        EntryServiceError::DuplicateWord(_) => "duplicate_word",
        EntryServiceError::Repo(_) => "storage_failed",
    }
}
