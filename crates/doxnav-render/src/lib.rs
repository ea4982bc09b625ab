//! HTML, text and JSON views of Doxygen navigation trees.
//!
//! - [`render_sidebar`]: static `<nav>` sidebar for pages served without
//!   the generator's JavaScript viewer
//! - [`render_outline`]: indented plain-text outline for terminals
//! - [`ViewerTree`]: JSON model consumed by client-side viewers

mod outline;
mod sidebar;
mod viewer;

pub use outline::render_outline;
pub use sidebar::{RenderOptions, escape, render_sidebar};
pub use viewer::{ViewerItem, ViewerTree};
