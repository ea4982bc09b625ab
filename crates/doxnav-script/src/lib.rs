//! Reader and writer for Doxygen navigation tree scripts.
//!
//! Doxygen stores the sidebar of a generated site as JavaScript literals:
//! `navtreedata.js` declares the root forest (`NAVTREE`), the chunk index
//! (`NAVTREEINDEX`) and two toggle messages; `navtreeindexN.js` maps
//! hrefs to positions; deferred child scripts hold subtrees loaded on
//! demand. This crate reads those files without a JavaScript engine and
//! writes them back in the generator's exact layout.
//!
//! # Example
//!
//! ```
//! use doxnav_script::{load, write_navtree};
//!
//! let source = "var NAVTREE =\n[\n  [ \"EAR\", \"index.html\", null ]\n];\n\n\
//!               var NAVTREEINDEX =\n[\n\"index.html\"\n];\n\n\
//!               var SYNCONMSG = 'click to disable panel synchronisation';\n\
//!               var SYNCOFFMSG = 'click to enable panel synchronisation';";
//!
//! let data = load(source).unwrap();
//! assert_eq!(data.tree.roots()[0].title, "EAR");
//! assert_eq!(write_navtree(&data), source);
//! ```

mod decode;
mod error;
mod lexer;
mod parser;
mod writer;

pub use decode::{
    NAVTREE, NAVTREEINDEX, SYNCOFFMSG, SYNCONMSG, decode, decode_deferred, decode_index_chunk,
};
pub use error::{DecodeError, ParseError, ParseErrorKind, ScriptError};
pub use parser::{Declaration, MAX_DEPTH, Script, Value, parse};
pub use writer::{write_deferred, write_index_chunk, write_navtree};

use doxnav_tree::NavTreeData;

/// Parse and decode a `navtreedata.js` script.
pub fn load(source: &str) -> Result<NavTreeData, ScriptError> {
    let script = parse(source)?;
    Ok(decode(&script)?)
}

/// File name of the chunk script with the given number.
#[must_use]
pub fn index_chunk_file_name(number: usize) -> String {
    format!("navtreeindex{number}.js")
}
