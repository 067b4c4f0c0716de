//! Subcommand handlers. Each handler performs one storage round trip.

use crate::output::{emit, AddOutput, InfoOutput, InitOutput, RandomOutput, SearchOutput};
use crate::{Cli, Commands};
use anyhow::Context;
use log::info;
use mnemonic_core::db::migrations::latest_version;
use mnemonic_core::{core_version, init_logging, Config, MnemonicStore, NewEntry, ReviewPolicy};
use std::path::{Path, PathBuf};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    start_logging(&config);

    let store = MnemonicStore::new(config.database.clone());
    let json = cli.json;
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    match cli.command {
        Commands::Init => {
            let schema_version = store.initialize()?;
            emit(
                &InitOutput {
                    database: store.db_path().display().to_string(),
                    schema_version,
                },
                json,
            )
        }
        Commands::Add {
            word,
            story,
            note,
            image,
        } => add(&store, word, story, note, image.as_deref(), json),
        Commands::Search { word } => {
            let found = store.with_service(|service| service.lookup(&word))?;
            emit(&SearchOutput::new(word.trim(), found), json)
        }
        Commands::Random {
            exclude,
            max_attempts,
            save_image,
        } => {
            let policy = review_policy(&config.review, exclude, max_attempts);
            random(&store, &policy, save_image.as_deref(), json)
        }
        Commands::Info => {
            let schema_version = store.initialize()?;
            let entries = store.count_entries()?;
            emit(
                &InfoOutput {
                    version: core_version().to_string(),
                    database: store.db_path().display().to_string(),
                    schema_version,
                    latest_schema_version: latest_version(),
                    entries,
                },
                json,
            )
        }
    }
}

fn add(
    store: &MnemonicStore,
    word: String,
    story: String,
    note: Option<String>,
    image: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let mut entry = NewEntry::new(word, story);
    entry.note = note;
    if let Some(path) = image {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image `{}`", path.display()))?;
        entry = entry.with_image(bytes);
    }

    let word = entry.word.trim().to_string();
    let id = store.with_service(|service| service.add_entry(entry))?;
    emit(&AddOutput { id, word }, json)
}

fn random(
    store: &MnemonicStore,
    policy: &ReviewPolicy,
    save_image: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let picked = store.with_service(|service| service.review(policy))?;

    let mut saved_image = None;
    if let (Some(path), Some(entry)) = (save_image, picked.as_ref()) {
        if let Some(bytes) = entry.image.as_deref() {
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write image `{}`", path.display()))?;
            saved_image = Some(path.display().to_string());
        }
    }

    emit(&RandomOutput::new(picked, saved_image), json)
}

fn review_policy(
    base: &ReviewPolicy,
    exclude: Option<String>,
    max_attempts: Option<u32>,
) -> ReviewPolicy {
    ReviewPolicy {
        excluded_marker: exclude.or_else(|| base.excluded_marker.clone()),
        max_attempts: max_attempts.unwrap_or(base.max_attempts),
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn start_logging(config: &Config) {
    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let log_dir = config.resolved_log_dir(&base);
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::review_policy;
    use mnemonic_core::ReviewPolicy;

    #[test]
    fn flags_override_configured_review_policy() {
        let base = ReviewPolicy {
            excluded_marker: Some("[skip]".to_string()),
            max_attempts: 10,
        };

        let merged = review_policy(&base, None, None);
        assert_eq!(merged, base);

        let merged = review_policy(&base, Some("#hard".to_string()), Some(3));
        assert_eq!(merged.excluded_marker.as_deref(), Some("#hard"));
        assert_eq!(merged.max_attempts, 3);
    }
}
