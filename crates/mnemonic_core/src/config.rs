//! Application configuration.
//!
//! # Responsibility
//! - Describe the database path, logging and review settings.
//! - Load overrides from an optional TOML file.
//!
//! # Invariants
//! - A missing config file is not an error; defaults apply.
//! - The resolved log directory is always absolute.

use crate::logging::default_log_level;
use crate::service::entry_service::ReviewPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "mnemonic.db";
/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "mnemonic.toml";

const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: PathBuf,
    pub log_level: String,
    /// Defaults to `logs/` next to the database file.
    pub log_dir: Option<PathBuf>,
    pub review: ReviewPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            review: ReviewPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Loads `path`, or returns defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Absolute log directory: the configured one, or `logs/` beside the
    /// database file. Relative paths are resolved against `base`.
    pub fn resolved_log_dir(&self, base: &Path) -> PathBuf {
        let dir = match &self.log_dir {
            Some(dir) => dir.clone(),
            None => self
                .database
                .parent()
                .map(|parent| parent.join(LOG_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME)),
        };
        if dir.is_absolute() {
            dir
        } else {
            base.join(dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, DEFAULT_DB_FILE};
    use std::path::{Path, PathBuf};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(config.review.max_attempts, 32);
    }

    #[test]
    fn partial_file_keeps_defaults_for_unset_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mnemonic.toml");
        std::fs::write(
            &path,
            "database = \"words/gre.db\"\n\n[review]\nexcluded_marker = \"[skip]\"\n",
        )
        .unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("words/gre.db"));
        assert_eq!(config.review.excluded_marker.as_deref(), Some("[skip]"));
        assert_eq!(config.review.max_attempts, 32);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mnemonic.toml");
        std::fs::write(&path, "database = [").unwrap();

        let err = Config::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn log_dir_defaults_next_to_database() {
        let config = Config {
            database: PathBuf::from("data/mnemonic.db"),
            ..Config::default()
        };
        assert_eq!(
            config.resolved_log_dir(Path::new("/home/user")),
            PathBuf::from("/home/user/data/logs")
        );

        let bare = Config::default();
        assert_eq!(
            bare.resolved_log_dir(Path::new("/srv")),
            PathBuf::from("/srv/logs")
        );
    }
}
