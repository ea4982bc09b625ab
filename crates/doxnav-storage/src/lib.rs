//! Storage abstraction for Doxygen documentation builds.
//!
//! A documentation root holds one or more HTML builds, each with its own
//! `navtreedata.js`. The [`Storage`] trait discovers those builds
//! ([`VersionRef`]) and reads their scripts, so the rest of the system
//! never touches the filesystem directly.
//!
//! - [`FsStorage`] reads builds from a local directory
//! - [`MockStorage`] keeps builds in memory (behind the `mock` feature)
//!
//! # Example
//!
//! ```no_run
//! use doxnav_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new("doc/html".into());
//! for version in storage.scan()? {
//!     let script = storage.read(&version)?;
//!     println!("{}: {} bytes", version.label, script.len());
//! }
//! # Ok::<(), doxnav_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{
    DEFAULT_LABEL, NAVTREE_FILE, Storage, StorageError, StorageErrorKind, VersionRef,
    label_for_dir,
};
