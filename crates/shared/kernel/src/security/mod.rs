//! Security helpers shared by all slices.

pub mod resource;

pub use resource::{ResourceGuard, ResourceGuardError};
