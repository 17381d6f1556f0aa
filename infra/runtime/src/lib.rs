//! Tokio bootstrap shared by the workspace binaries.
//!
//! Binaries never hand-tune the runtime; they pick one of the vetted
//! [`Profile`]s, usually through the entry-point macro:
//!
//! ```rust,ignore
//! #[atelier_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```
//!
//! Components that live outside any async context can borrow the
//! process-wide runtime from [`global`].

pub use anyhow::Result;
pub use atelier_derive::main;

use anyhow::Context as _;
use std::sync::OnceLock;
use std::thread::available_parallelism;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Pool size when parallelism detection fails.
const FALLBACK_WORKERS: usize = 4;
/// Ceiling for `TOKIO_WORKER_THREADS`, so a stray value cannot exhaust the host.
const MAX_WORKERS: usize = 512;

static DETECTED_WORKERS: OnceLock<usize> = OnceLock::new();

/// Worker count from `TOKIO_WORKER_THREADS` when set sanely, else the
/// detected core count. Cached for the life of the process.
fn detected_workers() -> usize {
    *DETECTED_WORKERS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|&n| (1..=MAX_WORKERS).contains(&n))
            .unwrap_or_else(|| {
                available_parallelism()
                    .map_or(FALLBACK_WORKERS, std::num::NonZero::get)
                    .min(MAX_WORKERS)
            })
    })
}

/// Vetted runtime shapes. The numbers live here so every binary agrees
/// on them instead of tuning tokio locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Balanced defaults for tools and one-off binaries.
    Standard,
    /// Throughput first: full worker pool, 4 `MiB` stacks, idle workers
    /// parked for five minutes before the pool shrinks.
    HighPerformance,
    /// Half-size pool recycled quickly; fits interactive side processes
    /// that should not hold cores hostage.
    LowLatency,
}

impl Profile {
    fn workers(self) -> usize {
        match self {
            Self::Standard | Self::HighPerformance => detected_workers(),
            Self::LowLatency => (detected_workers() / 2).max(1),
        }
    }

    const fn stack_bytes(self) -> usize {
        match self {
            Self::Standard => 3 * 1024 * 1024,
            Self::HighPerformance => 4 * 1024 * 1024,
            Self::LowLatency => 2 * 1024 * 1024,
        }
    }

    const fn keep_alive(self) -> Duration {
        match self {
            Self::Standard => Duration::from_secs(60),
            Self::HighPerformance => Duration::from_secs(300),
            Self::LowLatency => Duration::from_secs(30),
        }
    }

    const fn thread_prefix(self) -> &'static str {
        match self {
            Self::Standard => "atelier-worker",
            Self::HighPerformance => "atelier-hp",
            Self::LowLatency => "atelier-ll",
        }
    }

    /// Builds a multithreaded Tokio runtime shaped by this profile.
    ///
    /// # Errors
    ///
    /// Fails when the OS refuses to allocate the worker pool, usually a
    /// thread or memory limit.
    pub fn build(self) -> Result<Runtime> {
        let workers = self.workers();
        debug!(profile = ?self, workers, stack = self.stack_bytes(), "Building tokio runtime");

        Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name(self.thread_prefix())
            .thread_stack_size(self.stack_bytes())
            .thread_keep_alive(self.keep_alive())
            .enable_all()
            .build()
            .with_context(|| format!("initializing the {self:?} runtime"))
    }
}

static GLOBAL: OnceLock<Runtime> = OnceLock::new();

/// Process-wide runtime for components that are not called from within an
/// async context.
///
/// # Panics
///
/// Panics when the runtime cannot be created at all; nothing in the process
/// can make progress without it.
pub fn global() -> &'static Runtime {
    GLOBAL.get_or_init(|| {
        Profile::Standard.build().expect("the process-wide tokio runtime must initialize")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_latency_shrinks_the_pool_but_keeps_one_worker() {
        assert!(Profile::LowLatency.workers() >= 1);
        assert!(Profile::LowLatency.workers() <= Profile::HighPerformance.workers());
    }

    #[test]
    fn profiles_disagree_on_stacks_and_parking() {
        assert!(Profile::HighPerformance.stack_bytes() > Profile::LowLatency.stack_bytes());
        assert!(Profile::HighPerformance.keep_alive() > Profile::LowLatency.keep_alive());
    }

    #[test]
    fn every_profile_builds_a_runtime() -> Result<()> {
        for profile in [Profile::Standard, Profile::HighPerformance, Profile::LowLatency] {
            let runtime = profile.build()?;
            runtime.block_on(async {});
        }
        Ok(())
    }

    #[test]
    fn the_global_runtime_is_a_singleton() {
        let first: *const Runtime = global();
        let second: *const Runtime = global();
        assert_eq!(first, second);
    }
}
