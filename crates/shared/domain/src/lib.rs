//! Types every other crate agrees on: the config tree, feature switches,
//! entity constants, and the typed page-copy catalog in [`content`].
//! Nothing here does I/O; keep it that way so the site bundle, the server,
//! and the slice crates can all depend on it without dragging a runtime in.

pub mod config;
pub mod constants;
pub mod content;
pub mod features;
pub mod registry;
