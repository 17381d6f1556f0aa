//! Per-visitor session flags.
//!
//! The intro sequencer reads and writes the [`INTRO_PLAYED`] flag here so the
//! choreographed entrance runs once per browsing session. Web clients back this
//! with `sessionStorage`; native shells and tests use [`MemorySessionStore`].
//! Unrelated to auth sessions, which are stateless JWTs.

use atelier_domain::constants::INTRO_PLAYED;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::Debug;

/// String key/value store scoped to one visitor session.
pub trait SessionStore: Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local store for native shells and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<FxHashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Intro-flag helpers on top of any [`SessionStore`].
pub trait SessionStoreExt: SessionStore {
    /// True once the intro has fully played this session.
    fn intro_played(&self) -> bool {
        self.get(INTRO_PLAYED).as_deref() == Some("1")
    }

    fn mark_intro_played(&self) {
        self.set(INTRO_PLAYED, "1");
    }
}

impl<T: SessionStore + ?Sized> SessionStoreExt for T {}
