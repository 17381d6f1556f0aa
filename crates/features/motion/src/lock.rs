use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Shared scroll-lock latch with counted holders.
///
/// The intro sequencer and the mobile menu both suppress page scrolling while
/// active. Each acquires a [`ScrollLockGuard`]; the page stays locked while at
/// least one guard is alive. Guards release on drop, so every code path out of
/// a holder (natural completion, cancellation, unmount) releases exactly once.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Arc<AtomicUsize>,
}

impl ScrollLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks scrolling until the returned guard is dropped.
    #[must_use]
    pub fn acquire(&self) -> ScrollLockGuard {
        self.holders.fetch_add(1, Ordering::Relaxed);
        ScrollLockGuard { holders: Arc::clone(&self.holders) }
    }

    /// Whether any holder currently suppresses scrolling.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::Relaxed) > 0
    }
}

/// Releases one hold on the shared [`ScrollLock`] when dropped.
#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::Relaxed);
    }
}
