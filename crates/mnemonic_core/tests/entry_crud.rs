use mnemonic_core::db::migrations::latest_version;
use mnemonic_core::db::open_db_in_memory;
use mnemonic_core::{
    EntryRepository, EntryStory, NewEntry, RepoError, SqliteEntryRepository,
};
use rusqlite::Connection;
use std::collections::HashMap;

#[test]
fn insert_then_lookup_returns_story_and_note() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let entry =
        NewEntry::new("abate", "imagine a bat flying away").with_note("means to lessen");
    repo.insert_entry(&entry).unwrap();

    let found = repo.find_by_word("abate").unwrap().unwrap();
    assert_eq!(
        found,
        EntryStory {
            story: "imagine a bat flying away".to_string(),
            note: Some("means to lessen".to_string()),
        }
    );
}

#[test]
fn duplicate_word_is_rejected_and_first_row_kept() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.insert_entry(
        &NewEntry::new("abate", "imagine a bat flying away").with_note("means to lessen"),
    )
    .unwrap();

    let err = repo
        .insert_entry(&NewEntry::new("abate", "another story").with_image(vec![1, 2, 3]))
        .unwrap_err();
    assert!(matches!(&err, RepoError::DuplicateWord(word) if word == "abate"));

    assert_eq!(repo.count_entries().unwrap(), 1);
    let found = repo.find_by_word("abate").unwrap().unwrap();
    assert_eq!(found.story, "imagine a bat flying away");
    assert_eq!(found.note.as_deref(), Some("means to lessen"));
}

#[test]
fn lookup_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.insert_entry(&NewEntry::new("abate", "a bat")).unwrap();

    assert!(repo.find_by_word("Abate").unwrap().is_none());
    assert!(repo.find_by_word("abat").unwrap().is_none());
    assert!(repo.find_by_word("abate ").unwrap().is_none());
    assert!(repo.find_by_word("never-inserted").unwrap().is_none());
}

#[test]
fn words_differing_only_in_case_are_distinct() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.insert_entry(&NewEntry::new("Polish", "from Poland")).unwrap();
    repo.insert_entry(&NewEntry::new("polish", "make shiny")).unwrap();

    assert_eq!(repo.find_by_word("Polish").unwrap().unwrap().story, "from Poland");
    assert_eq!(repo.find_by_word("polish").unwrap().unwrap().story, "make shiny");
}

#[test]
fn repository_stores_text_as_given() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.insert_entry(&NewEntry::new(" padded ", "  story  ")).unwrap();

    let found = repo.find_by_word(" padded ").unwrap().unwrap();
    assert_eq!(found.story, "  story  ");
}

#[test]
fn sample_on_empty_table_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    assert!(repo.sample_random_entry().unwrap().is_none());
    assert!(repo.sample_random_entry_excluding("[skip]").unwrap().is_none());
    assert_eq!(repo.count_entries().unwrap(), 0);
}

#[test]
fn sample_returns_full_row_with_image_bytes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let image = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00];
    let id = repo
        .insert_entry(
            &NewEntry::new("abate", "a bat")
                .with_note("lessen")
                .with_image(image.clone()),
        )
        .unwrap();

    let sampled = repo.sample_random_entry().unwrap().unwrap();
    assert_eq!(sampled.id, id);
    assert_eq!(sampled.word, "abate");
    assert_eq!(sampled.story, "a bat");
    assert_eq!(sampled.note.as_deref(), Some("lessen"));
    assert_eq!(sampled.image, Some(image));
}

#[test]
fn sample_is_roughly_uniform() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let words = ["abate", "abase", "aberrant", "abjure", "abscond"];
    for word in words {
        repo.insert_entry(&NewEntry::new(word, format!("story for {word}")))
            .unwrap();
    }

    let trials = 5_000;
    let mut counts: HashMap<String, u32> = HashMap::new();
    for _ in 0..trials {
        let entry = repo.sample_random_entry().unwrap().unwrap();
        *counts.entry(entry.word).or_default() += 1;
    }

    // Expected 1000 each; the bound is many standard deviations wide.
    assert_eq!(counts.len(), words.len());
    for word in words {
        let count = counts[word];
        assert!((700..=1300).contains(&count), "{word} sampled {count} times");
    }
}

#[test]
fn sample_excluding_never_returns_marked_story() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.insert_entry(&NewEntry::new("abate", "[skip] a bat")).unwrap();
    repo.insert_entry(&NewEntry::new("abase", "a base jumper")).unwrap();
    repo.insert_entry(&NewEntry::new("abjure", "[SKIP] upper case is different"))
        .unwrap();

    for _ in 0..50 {
        let entry = repo.sample_random_entry_excluding("[skip]").unwrap().unwrap();
        assert!(!entry.story.contains("[skip]"));
    }

    repo.insert_entry(&NewEntry::new("aberrant", "[skip] a")).unwrap();
    assert!(repo.sample_random_entry_excluding("a").unwrap().is_none());
}

#[test]
fn ids_are_assigned_and_increasing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let first = repo.insert_entry(&NewEntry::new("abate", "a")).unwrap();
    let second = repo.insert_entry(&NewEntry::new("abase", "b")).unwrap();
    assert!(second > first);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_entries_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("mnemonic_words"))
    ));
}

#[test]
fn repository_rejects_connection_missing_image_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE mnemonic_words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT UNIQUE NOT NULL,
            story TEXT NOT NULL,
            note TEXT
        );
        PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "mnemonic_words",
            column: "image"
        })
    ));
}
