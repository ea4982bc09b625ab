//! HTTP request handlers.

pub(crate) mod diff;
pub(crate) mod locate;
pub(crate) mod versions;
