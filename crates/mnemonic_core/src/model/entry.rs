//! Mnemonic entry records.
//!
//! # Responsibility
//! - Define the persisted entry, its insert payload and its lookup projection.
//! - Provide caller-side normalization for insert payloads.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - Storage accepts any payload; trimming and emptiness checks happen only
//!   through [`NewEntry::normalized`], which front ends call before insert.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identifier.
pub type EntryId = i64;

/// One persisted word/story/note/image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnemonicEntry {
    pub id: EntryId,
    /// Vocabulary word, unique across the table.
    pub word: String,
    /// The mnemonic story itself.
    pub story: String,
    pub note: Option<String>,
    /// Raw image file bytes, stored as-is.
    #[serde(default, skip_serializing)]
    pub image: Option<Vec<u8>>,
}

impl MnemonicEntry {
    /// Returns whether the story contains `marker` (case-sensitive).
    pub fn story_contains(&self, marker: &str) -> bool {
        self.story.contains(marker)
    }

    /// Size of the attached image in bytes, `0` when absent.
    pub fn image_len(&self) -> usize {
        self.image.as_ref().map_or(0, Vec::len)
    }
}

/// Insert payload for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub word: String,
    pub story: String,
    pub note: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl NewEntry {
    pub fn new(word: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            story: story.into(),
            note: None,
            image: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    /// Returns a copy with surrounding whitespace removed from `word`, `story`
    /// and `note`, and a blank note collapsed to `None`.
    ///
    /// # Errors
    /// - `EmptyWord` / `EmptyStory` when either is empty after trimming.
    pub fn normalized(self) -> Result<Self, EntryValidationError> {
        let word = self.word.trim();
        if word.is_empty() {
            return Err(EntryValidationError::EmptyWord);
        }
        let story = self.story.trim();
        if story.is_empty() {
            return Err(EntryValidationError::EmptyStory);
        }
        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            word: word.to_string(),
            story: story.to_string(),
            note,
            image: self.image,
        })
    }
}

/// Lookup projection returned by a search by word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryStory {
    pub story: String,
    pub note: Option<String>,
}

/// Caller-side validation failure for entry input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyWord,
    EmptyStory,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWord => write!(f, "please enter a word"),
            Self::EmptyStory => write!(f, "please enter a story"),
        }
    }
}

impl Error for EntryValidationError {}
