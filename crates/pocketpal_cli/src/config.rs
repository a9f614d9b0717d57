//! CLI runtime configuration.
//!
//! # Responsibility
//! - Resolve data/log locations and log level from the environment.
//!
//! # Invariants
//! - All resolved paths are absolute, as required by core logging.

use pocketpal_core::default_log_level;
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "POCKETPAL_HOME";
const LOG_LEVEL_ENV: &str = "POCKETPAL_LOG_LEVEL";
const DEFAULT_DIR_NAME: &str = "PocketPal";
const NOTES_FILE_NAME: &str = "pocket-pal-notes.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl CliConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::resolve(
            std::env::var_os(HOME_ENV).map(PathBuf::from),
            std::env::var(LOG_LEVEL_ENV).ok(),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    /// Resolves configuration from explicit values.
    ///
    /// `data_dir` wins over `user_home`; the default data directory is
    /// `<user_home>/PocketPal`.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        log_level: Option<String>,
        user_home: Option<PathBuf>,
    ) -> Result<Self, String> {
        let data_dir = match data_dir.filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => dir,
            None => user_home
                .map(|home| home.join(DEFAULT_DIR_NAME))
                .ok_or_else(|| format!("cannot resolve data directory; set {HOME_ENV}"))?,
        };
        if !data_dir.is_absolute() {
            return Err(format!(
                "data directory must be absolute, got `{}`",
                data_dir.display()
            ));
        }

        let log_level = log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    /// Notebook snapshot file.
    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
