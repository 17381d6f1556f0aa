//! Backdrop stage management.
//!
//! Decides when the particle canvas mounts, when it becomes visible, and
//! which background mode the page body renders under. Visibility normally
//! follows intro completion, but the stage carries its own clock fallbacks
//! so a missed or never-mounted intro can not leave the backdrop dark.

use serde::{Deserialize, Serialize};

use crate::intro::IntroPlayback;

/// Mount delay on a first visit, ms. Keeps canvas initialization off the
/// critical path of the intro's opening frames.
pub const MOUNT_DELAY_MS: f64 = 400.0;
/// Mount delay when the intro already played this session, ms.
pub const MOUNT_DELAY_REPLAY_MS: f64 = 50.0;
/// If no intro state has been observed by this point, show the backdrop.
pub const EARLY_FALLBACK_MS: f64 = 800.0;
/// Absolute ceiling: the backdrop is visible by this point no matter what.
pub const VISIBILITY_CEILING_MS: f64 = 1500.0;
/// Crossfade length between intro and site background treatments, ms.
pub const MODE_TRANSITION_MS: f64 = 1000.0;

/// Page background treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Dark stage for the entrance overlay.
    Intro,
    /// Crossfading between the two treatments.
    Transitioning,
    /// Regular site background.
    Site,
}

impl BackgroundMode {
    /// Value for a `data-background` style hook.
    #[must_use]
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Transitioning => "transitioning",
            Self::Site => "site",
        }
    }
}

/// Render state for the backdrop host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageView {
    /// Whether the canvas element should exist at all.
    pub mounted: bool,
    /// Whether the canvas should be faded in.
    pub visible: bool,
    pub mode: BackgroundMode,
}

#[derive(Debug)]
pub struct BackdropStage {
    intro_played: bool,
    reduced_motion: bool,
    started_ms: Option<f64>,
    visible: bool,
    mode: BackgroundMode,
    transition_started_ms: Option<f64>,
}

impl BackdropStage {
    /// `intro_played` is the session flag sampled at mount, before the intro
    /// gets a chance to write it.
    #[must_use]
    pub const fn new(intro_played: bool, reduced_motion: bool) -> Self {
        let mode = if intro_played || reduced_motion {
            BackgroundMode::Site
        } else {
            BackgroundMode::Intro
        };
        Self {
            intro_played,
            reduced_motion,
            started_ms: None,
            visible: false,
            mode,
            transition_started_ms: None,
        }
    }

    /// Advances the stage clocks.
    ///
    /// `intro` is the playback state observed this frame, or `None` when no
    /// intro component exists (failed mount, stripped page).
    pub fn advance(&mut self, now_ms: f64, intro: Option<&IntroPlayback>) -> StageView {
        let started = *self.started_ms.get_or_insert(now_ms);
        let elapsed = now_ms - started;

        let delay = if self.intro_played { MOUNT_DELAY_REPLAY_MS } else { MOUNT_DELAY_MS };
        let mounted = elapsed >= delay;

        let intro_finished = intro.is_some_and(IntroPlayback::is_finished);
        let intro_missing = intro.is_none() && elapsed >= EARLY_FALLBACK_MS;
        if !self.visible && (intro_finished || intro_missing || elapsed >= VISIBILITY_CEILING_MS) {
            self.visible = true;
            if self.mode == BackgroundMode::Intro {
                if self.reduced_motion {
                    self.mode = BackgroundMode::Site;
                } else {
                    self.mode = BackgroundMode::Transitioning;
                    self.transition_started_ms = Some(now_ms);
                }
            }
        }

        if self.mode == BackgroundMode::Transitioning
            && let Some(since) = self.transition_started_ms
            && now_ms - since >= MODE_TRANSITION_MS
        {
            self.mode = BackgroundMode::Site;
            self.transition_started_ms = None;
        }

        StageView { mounted, visible: self.visible, mode: self.mode }
    }

    #[must_use]
    pub const fn mode(&self) -> BackgroundMode {
        self.mode
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_visit_mounts_after_the_long_delay() {
        let mut stage = BackdropStage::new(false, false);
        assert!(!stage.advance(0.0, Some(&IntroPlayback::Pending)).mounted);
        assert!(!stage.advance(399.0, Some(&IntroPlayback::Pending)).mounted);
        assert!(stage.advance(400.0, Some(&IntroPlayback::Pending)).mounted);
    }

    #[test]
    fn replay_visit_mounts_almost_immediately() {
        let mut stage = BackdropStage::new(true, false);
        assert!(!stage.advance(0.0, Some(&IntroPlayback::Skipped)).mounted);
        let view = stage.advance(50.0, Some(&IntroPlayback::Skipped));
        assert!(view.mounted);
        // Skipped intro counts as finished, so the backdrop is already
        // visible and the page renders the site background.
        assert!(view.visible);
        assert_eq!(view.mode, BackgroundMode::Site);
    }

    #[test]
    fn visibility_follows_intro_completion() {
        let mut stage = BackdropStage::new(false, false);
        let playing = IntroPlayback::Playing {
            phase: crate::intro::IntroPhase::TextIn,
            phase_started_ms: 0.0,
            started_ms: 0.0,
        };
        assert!(!stage.advance(0.0, Some(&playing)).visible);
        assert!(!stage.advance(600.0, Some(&playing)).visible);
        let view = stage.advance(700.0, Some(&IntroPlayback::Complete));
        assert!(view.visible);
        assert_eq!(view.mode, BackgroundMode::Transitioning);
    }

    #[test]
    fn transition_settles_into_site_mode() {
        let mut stage = BackdropStage::new(false, false);
        stage.advance(0.0, Some(&IntroPlayback::Complete));
        assert_eq!(stage.mode(), BackgroundMode::Transitioning);
        stage.advance(999.0, Some(&IntroPlayback::Complete));
        assert_eq!(stage.mode(), BackgroundMode::Transitioning);
        stage.advance(1000.0, Some(&IntroPlayback::Complete));
        assert_eq!(stage.mode(), BackgroundMode::Site);
    }

    #[test]
    fn reduced_motion_skips_the_crossfade() {
        let mut stage = BackdropStage::new(false, true);
        let view = stage.advance(0.0, Some(&IntroPlayback::Skipped));
        assert_eq!(view.mode, BackgroundMode::Site);
    }

    #[test]
    fn missing_intro_uses_the_early_fallback() {
        let mut stage = BackdropStage::new(false, false);
        assert!(!stage.advance(0.0, None).visible);
        assert!(!stage.advance(799.0, None).visible);
        assert!(stage.advance(800.0, None).visible);
    }

    #[test]
    fn stalled_intro_hits_the_visibility_ceiling() {
        let mut stage = BackdropStage::new(false, false);
        let stuck = IntroPlayback::Playing {
            phase: crate::intro::IntroPhase::Sweep,
            phase_started_ms: 0.0,
            started_ms: 0.0,
        };
        assert!(!stage.advance(0.0, Some(&stuck)).visible);
        assert!(!stage.advance(1499.0, Some(&stuck)).visible);
        assert!(stage.advance(1500.0, Some(&stuck)).visible);
    }

    #[test]
    fn visibility_is_latched() {
        let mut stage = BackdropStage::new(false, false);
        stage.advance(0.0, Some(&IntroPlayback::Complete));
        // Later frames with a non-finished state cannot hide it again.
        let replay = IntroPlayback::Pending;
        assert!(stage.advance(100.0, Some(&replay)).visible);
    }
}
