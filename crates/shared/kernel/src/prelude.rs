//! Convenience re-exports for slice crates.

#[cfg(not(target_arch = "wasm32"))]
pub use crate::config::load_config;
pub use crate::safe_nanoid;
pub use crate::security::resource::ResourceGuard;
#[cfg(feature = "server")]
pub use crate::server::{ApiState, Problem, RequireSession};
pub use crate::session::{MemorySessionStore, SessionStore, SessionStoreExt};
pub use atelier_domain::config::ApiConfig;
