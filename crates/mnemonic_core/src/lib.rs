//! Core domain logic for the mnemonic word store.
//! This crate is the single source of truth for storage and review rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_DB_FILE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{EntryId, EntryStory, EntryValidationError, MnemonicEntry, NewEntry};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
pub use service::entry_service::{EntryService, EntryServiceError, ReviewPolicy};
pub use store::MnemonicStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
