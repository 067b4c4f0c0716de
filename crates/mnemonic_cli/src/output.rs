//! Result rendering for the CLI: plain text by default, JSON with `--json`.

use mnemonic_core::{EntryId, EntryStory, MnemonicEntry};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Prints `value` as pretty JSON or as its `Display` text.
pub fn emit<T: Serialize + Display>(value: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub database: String,
    pub schema_version: u32,
}

impl Display for InitOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Database ready: {} (schema v{})",
            self.database, self.schema_version
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AddOutput {
    pub id: EntryId,
    pub word: String,
}

impl Display for AddOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mnemonic for '{}' saved!", self.word)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub word: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SearchOutput {
    pub fn new(word: &str, found: Option<EntryStory>) -> Self {
        let found_flag = found.is_some();
        let (story, note) = match found {
            Some(entry) => (Some(entry.story), entry.note),
            None => (None, None),
        };
        Self {
            word: word.to_string(),
            found: found_flag,
            story,
            note,
        }
    }
}

impl Display for SearchOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(story) = &self.story else {
            return write!(f, "No mnemonic story found for '{}'.", self.word);
        };
        write!(f, "Mnemonic for '{}':\n\n{story}", self.word)?;
        if let Some(note) = &self.note {
            write!(f, "\n\nNote: {note}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RandomOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<MnemonicEntry>,
    pub image_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_image: Option<String>,
}

impl RandomOutput {
    pub fn new(entry: Option<MnemonicEntry>, saved_image: Option<String>) -> Self {
        let image_bytes = entry.as_ref().map_or(0, MnemonicEntry::image_len);
        Self {
            entry,
            image_bytes,
            saved_image,
        }
    }
}

impl Display for RandomOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(entry) = &self.entry else {
            return write!(f, "No entries to review.");
        };
        write!(f, "{}\n\n{}", entry.word, entry.story)?;
        if let Some(note) = &entry.note {
            write!(f, "\n\nNote: {note}")?;
        }
        if self.image_bytes > 0 {
            write!(f, "\n\n[image: {} bytes]", self.image_bytes)?;
        }
        if let Some(path) = &self.saved_image {
            write!(f, "\nImage saved to {path}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct InfoOutput {
    pub version: String,
    pub database: String,
    pub schema_version: u32,
    pub latest_schema_version: u32,
    pub entries: u64,
}

impl Display for InfoOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "mnemonic {}", self.version)?;
        writeln!(f, "database: {}", self.database)?;
        writeln!(
            f,
            "schema:   v{} (latest v{})",
            self.schema_version, self.latest_schema_version
        )?;
        write!(f, "entries:  {}", self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomOutput, SearchOutput};
    use mnemonic_core::{EntryStory, MnemonicEntry};

    #[test]
    fn search_output_renders_story_and_note() {
        let output = SearchOutput::new(
            "abate",
            Some(EntryStory {
                story: "imagine a bat flying away".to_string(),
                note: Some("means to lessen".to_string()),
            }),
        );
        let text = output.to_string();
        assert!(text.starts_with("Mnemonic for 'abate':"));
        assert!(text.contains("imagine a bat flying away"));
        assert!(text.ends_with("Note: means to lessen"));
    }

    #[test]
    fn search_output_for_missing_word() {
        let output = SearchOutput::new("abate", None);
        assert_eq!(output.to_string(), "No mnemonic story found for 'abate'.");

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["found"], false);
        assert!(json.get("story").is_none());
    }

    #[test]
    fn random_output_json_omits_image_bytes_but_reports_size() {
        let output = RandomOutput::new(
            Some(MnemonicEntry {
                id: 1,
                word: "abate".to_string(),
                story: "a bat".to_string(),
                note: None,
                image: Some(vec![0; 42]),
            }),
            None,
        );
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["image_bytes"], 42);
        assert_eq!(json["entry"]["word"], "abate");
        assert!(json["entry"].get("image").is_none());
        assert!(output.to_string().contains("[image: 42 bytes]"));
    }
}
