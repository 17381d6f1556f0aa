//! Intro sequencer.
//!
//! A phase timeline for the full-screen entrance overlay. The timeline is
//! clock-driven: callers feed monotonic timestamps into [`IntroSequencer::advance`]
//! and read back a render-ready [`IntroVisual`]. Completion effects (the
//! per-session replay flag, the scroll-lock release, the completion hook)
//! run exactly once no matter which path ends the timeline: natural phase
//! exhaustion, the hard time ceiling, or cancellation on unmount.

use std::sync::Arc;

use atelier_kernel::session::{SessionStore, SessionStoreExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ease::{ease_in_out_cubic, ease_out_cubic},
    lock::{ScrollLock, ScrollLockGuard},
};

/// Hard ceiling from playback start to forced completion, ms.
pub const INTRO_CEILING_MS: f64 = 4000.0;

/// Distance the subtext rises from while fading in, px.
const SUBTEXT_RISE_PX: f32 = 15.0;

/// Timeline phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntroPhase {
    /// Headline fades in and scales up.
    TextIn,
    /// Light sweep crosses the headline.
    Sweep,
    /// Supporting line fades in and rises.
    SubtextIn,
    /// Everything holds fully visible.
    Hold,
    /// The overlay panel slides away, revealing the page.
    PanelExit,
}

impl IntroPhase {
    #[must_use]
    pub const fn duration_ms(self) -> f64 {
        match self {
            Self::TextIn => 500.0,
            Self::Sweep => 1000.0,
            Self::SubtextIn => 400.0,
            Self::Hold => 150.0,
            Self::PanelExit => 600.0,
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::TextIn => Some(Self::Sweep),
            Self::Sweep => Some(Self::SubtextIn),
            Self::SubtextIn => Some(Self::Hold),
            Self::Hold => Some(Self::PanelExit),
            Self::PanelExit => None,
        }
    }
}

/// Where the timeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroPlayback {
    /// The intro will not play this session (already seen, reduced motion).
    Skipped,
    /// Waiting for the first frame.
    Pending,
    Playing { phase: IntroPhase, phase_started_ms: f64, started_ms: f64 },
    Complete,
}

impl IntroPlayback {
    /// True once the overlay is out of the way, through any path.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Skipped | Self::Complete)
    }
}

/// Render-ready values for the overlay, all derived from the phase clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntroVisual {
    pub headline_opacity: f32,
    pub headline_scale: f32,
    /// Light sweep progress across the headline, `0..=1`.
    pub sweep: f32,
    pub subtext_opacity: f32,
    /// Remaining upward offset of the subtext, px.
    pub subtext_offset: f32,
    /// Fraction of the viewport the panel has slid away, `0..=1`.
    pub panel_exit: f32,
    /// True once the overlay should be removed from the tree entirely.
    pub hidden: bool,
}

/// Drives the entrance overlay for one page load.
pub struct IntroSequencer {
    playback: IntroPlayback,
    store: Arc<dyn SessionStore>,
    lock: ScrollLock,
    scroll_guard: Option<ScrollLockGuard>,
    on_complete: Option<Box<dyn FnOnce() + Send>>,
    effects_ran: bool,
}

impl std::fmt::Debug for IntroSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntroSequencer")
            .field("playback", &self.playback)
            .field("effects_ran", &self.effects_ran)
            .finish_non_exhaustive()
    }
}

impl IntroSequencer {
    /// Builds the sequencer against the injected session store.
    ///
    /// The intro starts [`IntroPlayback::Skipped`] when it already played
    /// this session or the visitor prefers reduced motion; the replay flag
    /// is *not* written on the reduced-motion path, so a later session
    /// without the preference still gets the entrance.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, lock: ScrollLock, reduced_motion: bool) -> Self {
        let playback = if store.intro_played() || reduced_motion {
            IntroPlayback::Skipped
        } else {
            IntroPlayback::Pending
        };
        Self { playback, store, lock, scroll_guard: None, on_complete: None, effects_ran: false }
    }

    /// Registers the completion hook (event publication, analytics).
    /// Runs at most once, on whichever path finishes the timeline first.
    pub fn set_on_complete(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    #[must_use]
    pub const fn playback(&self) -> IntroPlayback {
        self.playback
    }

    /// Begins playback if the timeline is still pending. Scrolling locks for
    /// the whole performance and unlocks exactly once on any exit path.
    pub fn start_if_pending(&mut self, now_ms: f64) {
        if self.playback == IntroPlayback::Pending {
            self.scroll_guard = Some(self.lock.acquire());
            self.playback = IntroPlayback::Playing {
                phase: IntroPhase::TextIn,
                phase_started_ms: now_ms,
                started_ms: now_ms,
            };
        }
    }

    /// Advances the phase clock. Leftover time carries into the next phase
    /// so a dropped frame cannot stretch the timeline.
    pub fn advance(&mut self, now_ms: f64) -> IntroPlayback {
        let IntroPlayback::Playing { mut phase, mut phase_started_ms, started_ms } = self.playback
        else {
            return self.playback;
        };

        if now_ms - started_ms >= INTRO_CEILING_MS {
            debug!("Intro hit the hard ceiling; forcing completion");
            self.finish();
            return self.playback;
        }

        while now_ms - phase_started_ms >= phase.duration_ms() {
            phase_started_ms += phase.duration_ms();
            match phase.next() {
                Some(next) => phase = next,
                None => {
                    self.finish();
                    return self.playback;
                }
            }
        }
        self.playback = IntroPlayback::Playing { phase, phase_started_ms, started_ms };
        self.playback
    }

    /// Forces the terminal state (unmount, route change mid-intro).
    /// Idempotent; completion effects still run at most once.
    pub fn cancel(&mut self) {
        match self.playback {
            IntroPlayback::Pending | IntroPlayback::Playing { .. } => self.finish(),
            IntroPlayback::Skipped | IntroPlayback::Complete => {}
        }
    }

    fn finish(&mut self) {
        self.playback = IntroPlayback::Complete;
        if self.effects_ran {
            return;
        }
        self.effects_ran = true;
        self.store.mark_intro_played();
        // Guard drop is the single release point for the scroll lock.
        self.scroll_guard = None;
        if let Some(hook) = self.on_complete.take() {
            hook();
        }
    }

    /// Current render values. Safe to call in any state.
    #[must_use]
    pub fn visual(&self, now_ms: f64) -> IntroVisual {
        match self.playback {
            IntroPlayback::Skipped | IntroPlayback::Complete => IntroVisual {
                headline_opacity: 1.0,
                headline_scale: 1.0,
                sweep: 1.0,
                subtext_opacity: 1.0,
                subtext_offset: 0.0,
                panel_exit: 1.0,
                hidden: true,
            },
            IntroPlayback::Pending => IntroVisual {
                headline_opacity: 0.0,
                headline_scale: 0.9,
                ..IntroVisual::default()
            },
            IntroPlayback::Playing { phase, phase_started_ms, .. } => {
                let progress = phase_progress(now_ms, phase_started_ms, phase);
                visual_for(phase, progress)
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn phase_progress(now_ms: f64, phase_started_ms: f64, phase: IntroPhase) -> f32 {
    (((now_ms - phase_started_ms) / phase.duration_ms()).clamp(0.0, 1.0)) as f32
}

fn visual_for(phase: IntroPhase, progress: f32) -> IntroVisual {
    let mut visual = IntroVisual {
        headline_opacity: 0.0,
        headline_scale: 0.9,
        sweep: 0.0,
        subtext_opacity: 0.0,
        subtext_offset: SUBTEXT_RISE_PX,
        panel_exit: 0.0,
        hidden: false,
    };
    let done = |v: &mut IntroVisual, through: IntroPhase| {
        if through >= IntroPhase::TextIn {
            v.headline_opacity = 1.0;
            v.headline_scale = 1.0;
        }
        if through >= IntroPhase::Sweep {
            v.sweep = 1.0;
        }
        if through >= IntroPhase::SubtextIn {
            v.subtext_opacity = 1.0;
            v.subtext_offset = 0.0;
        }
    };
    match phase {
        IntroPhase::TextIn => {
            let eased = ease_out_cubic(progress);
            visual.headline_opacity = eased;
            visual.headline_scale = 0.1_f32.mul_add(eased, 0.9);
        }
        IntroPhase::Sweep => {
            done(&mut visual, IntroPhase::TextIn);
            visual.sweep = progress;
        }
        IntroPhase::SubtextIn => {
            done(&mut visual, IntroPhase::Sweep);
            let eased = ease_out_cubic(progress);
            visual.subtext_opacity = eased;
            visual.subtext_offset = SUBTEXT_RISE_PX * (1.0 - eased);
        }
        IntroPhase::Hold => done(&mut visual, IntroPhase::SubtextIn),
        IntroPhase::PanelExit => {
            done(&mut visual, IntroPhase::SubtextIn);
            visual.panel_exit = ease_in_out_cubic(progress);
        }
    }
    visual
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_kernel::session::MemorySessionStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sequencer(reduced_motion: bool) -> (IntroSequencer, Arc<MemorySessionStore>, ScrollLock) {
        let store = Arc::new(MemorySessionStore::new());
        let lock = ScrollLock::new();
        let seq = IntroSequencer::new(store.clone(), lock.clone(), reduced_motion);
        (seq, store, lock)
    }

    #[test]
    fn plays_phases_in_order_and_completes() {
        let (mut seq, store, lock) = sequencer(false);
        seq.start_if_pending(0.0);
        assert!(lock.is_locked());

        let expect_phase = |playback: IntroPlayback, expected: IntroPhase| match playback {
            IntroPlayback::Playing { phase, .. } => assert_eq!(phase, expected),
            other => panic!("expected Playing({expected:?}), got {other:?}"),
        };
        expect_phase(seq.advance(100.0), IntroPhase::TextIn);
        expect_phase(seq.advance(600.0), IntroPhase::Sweep);
        expect_phase(seq.advance(1600.0), IntroPhase::SubtextIn);
        expect_phase(seq.advance(1950.0), IntroPhase::Hold);
        expect_phase(seq.advance(2100.0), IntroPhase::PanelExit);
        assert_eq!(seq.advance(2700.0), IntroPlayback::Complete);

        assert!(store.intro_played());
        assert!(!lock.is_locked());
        assert!(seq.visual(2700.0).hidden);
    }

    #[test]
    fn leftover_time_carries_between_phases() {
        let (mut seq, _store, _lock) = sequencer(false);
        seq.start_if_pending(0.0);
        // One huge frame lands deep inside SubtextIn, not at its start.
        match seq.advance(1700.0) {
            IntroPlayback::Playing { phase, phase_started_ms, .. } => {
                assert_eq!(phase, IntroPhase::SubtextIn);
                assert_eq!(phase_started_ms, 1500.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn skips_when_already_played_this_session() {
        let store = Arc::new(MemorySessionStore::new());
        store.mark_intro_played();
        let seq = IntroSequencer::new(store, ScrollLock::new(), false);
        assert_eq!(seq.playback(), IntroPlayback::Skipped);
        assert!(seq.visual(0.0).hidden);
    }

    #[test]
    fn skips_on_reduced_motion_without_writing_the_flag() {
        let (mut seq, store, lock) = sequencer(true);
        assert_eq!(seq.playback(), IntroPlayback::Skipped);
        seq.start_if_pending(0.0);
        assert_eq!(seq.playback(), IntroPlayback::Skipped, "skip is terminal");
        assert!(!lock.is_locked());
        assert!(!store.intro_played(), "a later session without the preference should play");
    }

    #[test]
    fn hard_ceiling_forces_completion() {
        let (mut seq, store, lock) = sequencer(false);
        seq.start_if_pending(1000.0);
        // Stall inside Sweep, then jump past the ceiling.
        seq.advance(1600.0);
        assert_eq!(seq.advance(1000.0 + INTRO_CEILING_MS), IntroPlayback::Complete);
        assert!(store.intro_played());
        assert!(!lock.is_locked());
    }

    #[test]
    fn completion_effects_run_exactly_once_across_paths() {
        let (mut seq, store, lock) = sequencer(false);
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = calls.clone();
        seq.set_on_complete(move || {
            probe.fetch_add(1, Ordering::SeqCst);
        });

        seq.start_if_pending(0.0);
        seq.advance(10_000.0); // ceiling path
        seq.cancel(); // cancel after completion
        seq.advance(20_000.0); // further advances are inert

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.intro_played());
        assert!(!lock.is_locked());
        assert_eq!(seq.playback(), IntroPlayback::Complete);
    }

    #[test]
    fn cancel_mid_phase_releases_the_lock_once() {
        let (mut seq, _store, lock) = sequencer(false);
        seq.start_if_pending(0.0);
        seq.advance(700.0);
        assert!(lock.is_locked());
        seq.cancel();
        assert!(!lock.is_locked());
        seq.cancel();
        assert!(!lock.is_locked());
    }

    #[test]
    fn drop_mid_playback_releases_the_lock() {
        let lock = ScrollLock::new();
        {
            let store = Arc::new(MemorySessionStore::new());
            let mut seq = IntroSequencer::new(store, lock.clone(), false);
            seq.start_if_pending(0.0);
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());
    }

    #[test]
    fn visuals_track_the_phase_clock() {
        let (mut seq, _store, _lock) = sequencer(false);
        seq.start_if_pending(0.0);

        seq.advance(250.0);
        let mid_text = seq.visual(250.0);
        assert!(mid_text.headline_opacity > 0.0 && mid_text.headline_opacity < 1.0);
        assert!(mid_text.headline_scale > 0.9 && mid_text.headline_scale < 1.0);
        assert_eq!(mid_text.sweep, 0.0);
        assert!(!mid_text.hidden);

        seq.advance(1000.0);
        let mid_sweep = seq.visual(1000.0);
        assert_eq!(mid_sweep.headline_opacity, 1.0);
        assert!((mid_sweep.sweep - 0.5).abs() < 1e-4);

        seq.advance(2300.0);
        let exiting = seq.visual(2300.0);
        assert!(exiting.panel_exit > 0.0 && exiting.panel_exit < 1.0);
        assert_eq!(exiting.subtext_opacity, 1.0);
    }

    #[test]
    fn no_revert_after_complete() {
        let (mut seq, _store, _lock) = sequencer(false);
        seq.start_if_pending(0.0);
        seq.advance(10_000.0);
        assert_eq!(seq.advance(100.0), IntroPlayback::Complete);
        seq.start_if_pending(100.0);
        assert_eq!(seq.playback(), IntroPlayback::Complete);
    }
}
