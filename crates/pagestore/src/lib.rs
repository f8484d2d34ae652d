//! Content-addressed file storage for saved pages.
//!
//! A page is a [`Record`]: a locator (usually a URL) saved by a namespace
//! (usually a user). Each record is stored as one file whose name is the SHA-1
//! of `locator || namespace`, so saving the same page twice just overwrites it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pagestore::{FileStore, PageStore, Record, StoreConfig};
//!
//! // Create from environment (reads PAGESTORE_PATH)
//! let config = StoreConfig::from_env().unwrap();
//! let store = FileStore::new(config);
//!
//! // Or at a specific path
//! let store = FileStore::at_path("/var/lib/linkbot/pages");
//!
//! let page = Record::new("https://example.com/article", "bob");
//! store.save(&page).unwrap();
//! assert!(store.is_exist(&page).unwrap());
//!
//! match store.pick_random("bob") {
//!     Ok(page) => println!("read later: {}", page.locator),
//!     Err(e) if e.is_no_saved_pages() => println!("nothing saved yet"),
//!     Err(e) => eprintln!("storage error: {e}"),
//! }
//!
//! store.remove(&page).unwrap();
//! ```
//!
//! # Layout
//!
//! ```text
//! {base_path}/{namespace}/{sha1-hex(locator || namespace)}
//! ```
//!
//! # Concurrency
//!
//! Every call goes straight to the filesystem; there is no cache and no lock.
//! With atomic writes enabled (the default), a record file is either absent,
//! the old version, or the new version, never a partial write. Concurrent
//! saves and removes of the same record race, and the last one wins.

pub mod config;
pub mod error;
pub mod key;
pub mod record;
pub mod store;

pub use config::{StoreConfig, DEFAULT_DIR_MODE};
pub use error::{ErrorKind, Operation, StoreError};
pub use key::{ContentKey, KeyError};
pub use record::{CodecError, Record};
pub use store::{FileStore, PageStore};
