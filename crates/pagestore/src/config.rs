//! Store configuration with environment variable and file-based loading.
//!
//! Environment variables:
//! - `PAGESTORE_PATH`: Base path holding one directory per namespace
//! - `PAGESTORE_ATOMIC_WRITES`: Set to "false" to write record files in place
//!
//! Default path: `~/.pagestore/pages`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Permission bits for namespace directories (rwxr--r--).
pub const DEFAULT_DIR_MODE: u32 = 0o744;

pub const ENV_PATH: &str = "PAGESTORE_PATH";
pub const ENV_ATOMIC_WRITES: &str = "PAGESTORE_ATOMIC_WRITES";

/// Configuration for a [`FileStore`](crate::FileStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base path. Records live in `{base_path}/{namespace}/{key}`.
    pub base_path: PathBuf,

    /// Write each record to a temp file and rename it into place, so readers
    /// never observe a half-written record.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_path: default_store_path(),
            atomic_writes: true,
        }
    }
}

fn default_store_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".pagestore").join("pages"))
        .unwrap_or_else(|| PathBuf::from(".pagestore/pages"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl StoreConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let base_path = env::var(ENV_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_store_path());

        let atomic_writes = match env::var(ENV_ATOMIC_WRITES) {
            Ok(v) => parse_bool(&v)
                .with_context(|| format!("invalid boolean in {ENV_ATOMIC_WRITES}: {v:?}"))?,
            Err(_) => true,
        };

        Ok(Self {
            base_path,
            atomic_writes,
        })
    }

    /// Load configuration from a TOML file, falling back to environment.
    ///
    /// The file should contain a `[store]` section:
    /// ```toml
    /// [store]
    /// base_path = "/var/lib/linkbot/pages"
    /// atomic_writes = true
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let table: toml::Table = contents
            .parse()
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;

        match table.get("store") {
            Some(section) => section
                .clone()
                .try_into()
                .context("failed to parse [store] section"),
            None => Self::from_env(),
        }
    }

    pub fn with_base_path(path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: path.into(),
            atomic_writes: true,
        }
    }

    /// Directory holding a namespace's records.
    ///
    /// Only the plain name components of `namespace` are kept, so roots,
    /// drive prefixes and `..` can never lead outside `base_path`.
    pub fn namespace_dir(&self, namespace: &str) -> PathBuf {
        let relative: PathBuf = Path::new(namespace)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.base_path.join(relative)
    }
}
