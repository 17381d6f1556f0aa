//! Shared interface components: chrome, choreography surfaces and the
//! content sections the pages compose.

pub mod backdrop;
pub mod chrome;
pub mod intro;
pub mod reveal;
pub mod sections;
