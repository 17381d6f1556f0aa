//! Type-erased registry pieces for feature slices.
//!
//! Each slice crate boots into one long-lived state value (config snapshot,
//! repository, caches). The server keeps those behind a single trait-object
//! map and hands concrete references back out by downcast, so the kernel
//! never has to name a feature type.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Slice state held by the server for the lifetime of the process.
///
/// Implemented by the `#[atelier_slice]` expansion; the only obligation is
/// an upcast the registry uses to downcast later.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A booted slice, keyed by the concrete type that produced it.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), state: Box::new(state) }
    }

    /// Whether this slice came from `T`.
    #[must_use]
    pub fn is<T: FeatureSlice>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}
