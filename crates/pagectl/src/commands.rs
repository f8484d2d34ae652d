use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use pagestore::{ContentKey, FileStore, PageStore, Record, StoreConfig};
use tracing::info;

/// Exit code for `pick` on a namespace with nothing in it.
pub const EXIT_NO_SAVED_PAGES: u8 = 2;

/// Resolve configuration: explicit base path, then config file, then environment.
pub fn open_store(base_path: Option<PathBuf>, config_file: Option<&Path>) -> Result<FileStore> {
    let mut config = match config_file {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::from_env()?,
    };
    if let Some(base_path) = base_path {
        config.base_path = base_path;
    }

    info!(
        base_path = %config.base_path.display(),
        atomic_writes = config.atomic_writes,
        "opening page store"
    );
    Ok(FileStore::new(config))
}

pub fn save(store: &FileStore, namespace: &str, locator: &str) -> Result<()> {
    let record = Record::new(locator, namespace);
    store.save(&record)?;
    println!("{}", record.key());
    Ok(())
}

pub fn pick(store: &FileStore, namespace: &str) -> Result<ExitCode> {
    match store.pick_random(namespace) {
        Ok(record) => {
            println!("{}", record.locator);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_no_saved_pages() => {
            eprintln!("no saved pages for {namespace}");
            Ok(ExitCode::from(EXIT_NO_SAVED_PAGES))
        }
        Err(e) => Err(e).context("pick failed"),
    }
}

pub fn remove(
    store: &FileStore,
    namespace: &str,
    locator: &str,
    ignore_missing: bool,
) -> Result<()> {
    match store.remove(&Record::new(locator, namespace)) {
        Ok(()) => Ok(()),
        Err(e) if ignore_missing && e.is_not_found() => {
            info!(namespace, locator, "page was not saved, nothing to remove");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn exists(store: &FileStore, namespace: &str, locator: &str) -> Result<()> {
    let found = store.is_exist(&Record::new(locator, namespace))?;
    println!("{found}");
    Ok(())
}

pub fn list(store: &FileStore, namespace: &str) -> Result<()> {
    for key in store.list(namespace)? {
        println!("{key}");
    }
    Ok(())
}

pub fn key(namespace: &str, locator: &str) {
    println!("{}", ContentKey::from_parts(locator, namespace));
}
