//! Versioned navigation tree library.
//!
//! Loads the `navtreedata.js` of every documentation build exposed by a
//! [`Storage`](doxnav_storage::Storage), validates it and builds its
//! deep-link index. Queries go through [`Library`], which reloads when
//! builds change.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use doxnav_site::{Library, LibraryOptions};
//! use doxnav_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new("doc/html".into()));
//! let library = Library::new(storage, LibraryOptions::default());
//!
//! let location = library.locate("ear-5.0", "d6/d86/md_User_guide.html#use-cases")?;
//! assert_eq!(location.title, "Use cases");
//! # Ok::<(), doxnav_site::LibraryError>(())
//! ```

mod library;
mod state;

pub use library::{Library, LibraryError, LibraryOptions};
pub use state::{LibraryState, LoadFailure, Location, Version, VersionSummary};
