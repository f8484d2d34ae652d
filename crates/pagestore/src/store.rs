//! FileStore: filesystem-backed page storage.
//!
//! Implements the PageStore trait with one directory per namespace and one
//! file per record, named by the record's content key.
//!
//! Layout:
//! ```text
//! {base_path}/
//! ├── bob/
//! │   ├── 982df09f0bd983b395d5d3cfc0995c66e31a088a   # encoded Record
//! │   └── .205635...a2c1.tmp                         # in-flight write, never listed
//! └── alice/
//!     └── 3f1c...
//! ```
//!
//! The filesystem is the only source of truth: nothing is cached between
//! calls, and no locking is done beyond what the filesystem gives a single
//! create, rename, stat or unlink.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{StoreConfig, DEFAULT_DIR_MODE};
use crate::error::{Operation, Result, StoreError};
use crate::key::ContentKey;
use crate::record::Record;

/// Trait for page storage backends.
pub trait PageStore: Send + Sync {
    /// Persist a record, replacing any record with the same locator and namespace.
    fn save(&self, record: &Record) -> Result<()>;

    /// Pick one record from a namespace uniformly at random.
    ///
    /// Returns [`StoreError::NoSavedPages`] when the namespace holds nothing.
    fn pick_random(&self, namespace: &str) -> Result<Record>;

    /// Delete a record. Deleting a record that isn't stored is an error
    /// whose kind is [`ErrorKind::NotFound`](crate::ErrorKind::NotFound).
    fn remove(&self, record: &Record) -> Result<()>;

    /// Check whether a record is stored. Absence is `Ok(false)`, not an error.
    fn is_exist(&self, record: &Record) -> Result<bool>;
}

/// Filesystem-based page store.
#[derive(Debug, Clone)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    /// Create a FileStore with the given configuration.
    ///
    /// Nothing is touched on disk until the first save.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a FileStore rooted at a specific path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::with_base_path(path))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path where a record is (or would be) stored.
    pub fn record_path(&self, record: &Record) -> PathBuf {
        self.key_path(&record.namespace, &record.key())
    }

    fn key_path(&self, namespace: &str, key: &ContentKey) -> PathBuf {
        self.config.namespace_dir(namespace).join(key.as_str())
    }

    /// Content keys currently stored in a namespace, sorted.
    ///
    /// Files whose names are not valid keys are skipped.
    pub fn list(&self, namespace: &str) -> Result<Vec<ContentKey>> {
        let dir = self.config.namespace_dir(namespace);
        let keys = record_files(Operation::List, &dir)?
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        Ok(keys)
    }

    /// Pick a random record using the supplied random source.
    ///
    /// Candidates are ordered by key before sampling, so a seeded
    /// source gives repeatable picks over the same directory contents.
    pub fn pick_random_with<R: Rng>(&self, namespace: &str, rng: &mut R) -> Result<Record> {
        let dir = self.config.namespace_dir(namespace);
        let files = record_files(Operation::PickRandom, &dir)?;

        if files.is_empty() {
            return Err(StoreError::NoSavedPages {
                namespace: namespace.to_string(),
            });
        }

        let (_, path) = &files[rng.gen_range(0..files.len())];
        let record = read_record(Operation::PickRandom, path)?;
        debug!(
            namespace,
            path = %path.display(),
            candidates = files.len(),
            "picked random page"
        );
        Ok(record)
    }

    fn write_atomic(
        &self,
        dir: &Path,
        target: &Path,
        key: &ContentKey,
        data: &[u8],
    ) -> Result<()> {
        let tmp = dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));

        if let Err(e) = write_synced(&tmp, data) {
            discard_temp(&tmp);
            return Err(StoreError::io(Operation::Save, tmp, e));
        }

        if let Err(e) = fs::rename(&tmp, target) {
            discard_temp(&tmp);
            return Err(StoreError::io(Operation::Save, target, e));
        }

        Ok(())
    }
}

impl PageStore for FileStore {
    fn save(&self, record: &Record) -> Result<()> {
        let dir = self.config.namespace_dir(&record.namespace);
        create_namespace_dir(&dir).map_err(|e| StoreError::io(Operation::Save, &dir, e))?;

        let key = record.key();
        let path = dir.join(key.as_str());
        let data = record.encode().map_err(|source| StoreError::Encode {
            op: Operation::Save,
            source,
        })?;

        if self.config.atomic_writes {
            self.write_atomic(&dir, &path, &key, &data)?;
        } else {
            fs::write(&path, &data).map_err(|e| StoreError::io(Operation::Save, &path, e))?;
        }

        debug!(namespace = %record.namespace, %key, "saved page");
        Ok(())
    }

    fn pick_random(&self, namespace: &str) -> Result<Record> {
        self.pick_random_with(namespace, &mut rand::thread_rng())
    }

    fn remove(&self, record: &Record) -> Result<()> {
        let path = self.record_path(record);
        fs::remove_file(&path).map_err(|e| StoreError::io(Operation::Remove, &path, e))?;

        debug!(namespace = %record.namespace, path = %path.display(), "removed page");
        Ok(())
    }

    fn is_exist(&self, record: &Record) -> Result<bool> {
        let path = self.record_path(record);
        match fs::metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(Operation::IsExist, path, e)),
        }
    }
}

/// Create a namespace directory (and any missing parents). Idempotent.
fn create_namespace_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DEFAULT_DIR_MODE);
    }
    builder.create(dir)
}

/// Regular files in a namespace directory that are named by a content key,
/// sorted by key.
///
/// Temp files from atomic writes and anything else dropped into the
/// directory are not key-named, so they are never listed or picked.
fn record_files(op: Operation, dir: &Path) -> Result<Vec<(ContentKey, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(op, dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(op, dir, e))?;
        let name = entry.file_name();
        let Some(key) = name.to_str().and_then(|n| n.parse::<ContentKey>().ok()) else {
            continue;
        };
        let file_type = entry
            .file_type()
            .map_err(|e| StoreError::io(op, entry.path(), e))?;
        if file_type.is_file() {
            files.push((key, entry.path()));
        }
    }
    files.sort();
    Ok(files)
}

fn read_record(op: Operation, path: &Path) -> Result<Record> {
    let data = fs::read(path).map_err(|e| StoreError::io(op, path, e))?;
    Record::decode(&data).map_err(|source| StoreError::Decode {
        op,
        path: path.to_path_buf(),
        source,
    })
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn discard_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to clean up temp file");
        }
    }
}
