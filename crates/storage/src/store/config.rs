#![forbid(unsafe_code)]

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "jobs.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub const ENV_STORAGE_DIR: &str = "JM_STORAGE_DIR";
pub const ENV_DB_FILE: &str = "JM_DB_FILE";
pub const ENV_BUSY_TIMEOUT_MS: &str = "JM_BUSY_TIMEOUT_MS";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    /// How long a writer waits on a held lock before the store reports contention.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            db_file_name: default_db_file_name(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(&self.db_file_name)
    }

    pub fn from_env(fallback_dir: impl AsRef<Path>) -> Self {
        Self::from_lookup(fallback_dir, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        fallback_dir: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::new(
            var(ENV_STORAGE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| fallback_dir.as_ref().to_path_buf()),
        );
        if let Some(db_file_name) = var(ENV_DB_FILE) {
            config.db_file_name = db_file_name;
        }
        if let Some(busy_timeout_ms) = var(ENV_BUSY_TIMEOUT_MS).and_then(|v| v.parse().ok()) {
            config.busy_timeout_ms = busy_timeout_ms;
        }
        config
    }
}

fn default_db_file_name() -> String {
    DEFAULT_DB_FILE_NAME.to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}
