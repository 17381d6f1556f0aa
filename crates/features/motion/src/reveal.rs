//! Viewport reveal engine.
//!
//! Content sections fade and slide in when they cross an intersection
//! threshold. The engine is per-element: the client wraps each section in a
//! [`Reveal`], feeds it the observed visibility ratio plus the frame clock,
//! and styles the element from [`RevealVisual`]. Groups stagger their
//! children arithmetically rather than observing each child separately.

use serde::{Deserialize, Serialize};

use crate::ease::CubicBezier;

/// Entrance curve shared by every reveal (a strong ease-out).
pub const REVEAL_EASE: CubicBezier = CubicBezier::new(0.22, 1.0, 0.36, 1.0);

/// Global timing profile for reveals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSpec {
    pub duration_ms: f64,
    /// Slide-in distance, px.
    pub distance: f32,
    /// Per-child delay increment inside a staggered group, ms.
    pub stagger_ms: f64,
    /// Visibility ratio that triggers the reveal.
    pub threshold: f32,
    pub ease: CubicBezier,
}

impl RevealSpec {
    /// The default profile.
    #[must_use]
    pub const fn normal() -> Self {
        Self {
            duration_ms: 550.0,
            distance: 18.0,
            stagger_ms: 80.0,
            threshold: 0.25,
            ease: REVEAL_EASE,
        }
    }

    /// Slower, larger movement for showcase sessions (`motionBoost`).
    #[must_use]
    pub const fn boosted() -> Self {
        Self {
            duration_ms: 700.0,
            distance: 24.0,
            stagger_ms: 120.0,
            threshold: 0.25,
            ease: REVEAL_EASE,
        }
    }

    #[must_use]
    pub const fn for_boost(boost: bool) -> Self {
        if boost { Self::boosted() } else { Self::normal() }
    }

    /// Effective delay of the `index`-th child in a staggered group.
    #[must_use]
    pub fn stagger_delay(&self, base_delay_ms: f64, index: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let position = index as f64;
        self.stagger_ms.mul_add(position, base_delay_ms)
    }
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self::normal()
    }
}

/// Which edge the element slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealDirection {
    /// Rises from below.
    #[default]
    Up,
    /// Drops from above.
    Down,
    /// Slides in from the right.
    Left,
    /// Slides in from the left.
    Right,
    /// Pure fade.
    None,
}

impl RevealDirection {
    /// Initial offset `(x, y)` in px for a slide of `distance`.
    #[must_use]
    pub const fn initial_offset(self, distance: f32) -> (f32, f32) {
        match self {
            Self::Up => (0.0, distance),
            Self::Down => (0.0, -distance),
            Self::Left => (distance, 0.0),
            Self::Right => (-distance, 0.0),
            Self::None => (0.0, 0.0),
        }
    }
}

/// Per-element reveal options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    pub direction: RevealDirection,
    pub delay_ms: f64,
    /// Stay shown forever after the first reveal.
    pub once: bool,
    /// Start shown; for above-the-fold content that must never flash hidden.
    pub immediate: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { direction: RevealDirection::Up, delay_ms: 0.0, once: false, immediate: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealState {
    Hidden,
    Revealing { started_ms: f64 },
    Shown,
}

/// Style values for one element at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealVisual {
    pub opacity: f32,
    /// Remaining translate `(x, y)` in px.
    pub offset: (f32, f32),
}

/// Reveal lifecycle for a single element.
#[derive(Debug)]
pub struct Reveal {
    spec: RevealSpec,
    config: RevealConfig,
    reduced_motion: bool,
    state: RevealState,
    has_shown: bool,
}

impl Reveal {
    #[must_use]
    pub fn new(spec: RevealSpec, config: RevealConfig, reduced_motion: bool) -> Self {
        let shown = reduced_motion || config.immediate;
        Self {
            spec,
            config,
            reduced_motion,
            state: if shown { RevealState::Shown } else { RevealState::Hidden },
            has_shown: shown,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RevealState {
        self.state
    }

    /// Feeds the observed visibility ratio for the current frame.
    ///
    /// Reduced-motion sessions are terminally shown and never transition.
    pub fn update(&mut self, visible_ratio: f32, now_ms: f64) -> RevealState {
        if self.reduced_motion {
            return self.state;
        }
        let in_view = visible_ratio >= self.spec.threshold;
        match self.state {
            RevealState::Hidden => {
                if in_view {
                    self.has_shown = true;
                    self.state = RevealState::Revealing { started_ms: now_ms };
                }
            }
            RevealState::Revealing { started_ms } => {
                if self.progress_at(now_ms, started_ms) >= 1.0 {
                    self.state = RevealState::Shown;
                } else if !in_view && !self.config.once {
                    // Scrolled back out mid-entrance; rearm for the next pass.
                    self.state = RevealState::Hidden;
                }
            }
            RevealState::Shown => {
                if !in_view && !self.config.once && !self.config.immediate {
                    self.state = RevealState::Hidden;
                }
            }
        }
        self.state
    }

    /// Linear progress through the entrance, `0..=1`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f32 {
        match self.state {
            RevealState::Hidden => 0.0,
            RevealState::Shown => 1.0,
            RevealState::Revealing { started_ms } => self.progress_at(now_ms, started_ms),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn progress_at(&self, now_ms: f64, started_ms: f64) -> f32 {
        let elapsed = now_ms - started_ms - self.config.delay_ms;
        ((elapsed / self.spec.duration_ms).clamp(0.0, 1.0)) as f32
    }

    /// Eased style values for the current frame.
    #[must_use]
    pub fn visual(&self, now_ms: f64) -> RevealVisual {
        if self.reduced_motion {
            return RevealVisual { opacity: 1.0, offset: (0.0, 0.0) };
        }
        let eased = self.spec.ease.solve(self.progress(now_ms));
        let (start_x, start_y) = self.config.direction.initial_offset(self.spec.distance);
        RevealVisual {
            opacity: eased,
            offset: (start_x * (1.0 - eased), start_y * (1.0 - eased)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reveal(config: RevealConfig) -> Reveal {
        Reveal::new(RevealSpec::normal(), config, false)
    }

    #[test]
    fn reveals_on_crossing_the_threshold_and_finishes() {
        let mut r = reveal(RevealConfig::default());
        assert_eq!(r.update(0.1, 0.0), RevealState::Hidden);
        assert!(matches!(r.update(0.3, 100.0), RevealState::Revealing { .. }));
        assert_eq!(r.update(0.3, 100.0 + 550.0), RevealState::Shown);
        let visual = r.visual(1000.0);
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.offset, (0.0, 0.0));
    }

    #[test]
    fn progress_is_monotone_within_one_reveal() {
        let mut r = reveal(RevealConfig { delay_ms: 100.0, ..RevealConfig::default() });
        r.update(1.0, 0.0);
        let mut previous = -1.0_f32;
        for frame in 0..50 {
            let now = f64::from(frame) * 16.667;
            r.update(1.0, now);
            let progress = r.progress(now);
            assert!(progress >= previous, "regressed at frame {frame}");
            previous = progress;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn delay_holds_progress_at_zero() {
        let mut r = reveal(RevealConfig { delay_ms: 200.0, ..RevealConfig::default() });
        r.update(1.0, 0.0);
        assert_eq!(r.progress(150.0), 0.0);
        assert!(r.progress(300.0) > 0.0);
    }

    #[test]
    fn default_reverts_after_leaving_view() {
        let mut r = reveal(RevealConfig::default());
        r.update(0.5, 0.0);
        r.update(0.5, 600.0);
        assert_eq!(r.state(), RevealState::Shown);
        assert_eq!(r.update(0.0, 700.0), RevealState::Hidden);
        // And it can replay.
        assert!(matches!(r.update(0.5, 800.0), RevealState::Revealing { .. }));
    }

    #[test]
    fn once_never_reverts() {
        let mut r = reveal(RevealConfig { once: true, ..RevealConfig::default() });
        r.update(0.5, 0.0);
        r.update(0.5, 600.0);
        assert_eq!(r.update(0.0, 700.0), RevealState::Shown);
        assert_eq!(r.update(0.0, 99_999.0), RevealState::Shown);
    }

    #[test]
    fn leaving_view_mid_entrance_rearms() {
        let mut r = reveal(RevealConfig::default());
        r.update(0.5, 0.0);
        assert_eq!(r.update(0.0, 200.0), RevealState::Hidden);
    }

    #[test]
    fn immediate_starts_shown_and_stays() {
        let mut r = reveal(RevealConfig { immediate: true, ..RevealConfig::default() });
        assert_eq!(r.state(), RevealState::Shown);
        assert_eq!(r.update(0.0, 100.0), RevealState::Shown);
        assert_eq!(r.visual(0.0).opacity, 1.0);
    }

    #[test]
    fn reduced_motion_is_terminally_shown_with_no_offset() {
        let mut r = Reveal::new(RevealSpec::boosted(), RevealConfig::default(), true);
        assert_eq!(r.state(), RevealState::Shown);
        assert_eq!(r.update(0.0, 50.0), RevealState::Shown);
        assert_eq!(r.visual(50.0), RevealVisual { opacity: 1.0, offset: (0.0, 0.0) });
    }

    #[test]
    fn directions_map_to_their_slide_offsets() {
        assert_eq!(RevealDirection::Up.initial_offset(18.0), (0.0, 18.0));
        assert_eq!(RevealDirection::Down.initial_offset(18.0), (0.0, -18.0));
        assert_eq!(RevealDirection::Left.initial_offset(18.0), (18.0, 0.0));
        assert_eq!(RevealDirection::Right.initial_offset(18.0), (-18.0, 0.0));
        assert_eq!(RevealDirection::None.initial_offset(18.0), (0.0, 0.0));
    }

    #[test]
    fn hidden_element_sits_at_its_initial_offset() {
        let r = reveal(RevealConfig { direction: RevealDirection::Up, ..RevealConfig::default() });
        let visual = r.visual(0.0);
        assert_eq!(visual.opacity, 0.0);
        assert_eq!(visual.offset, (0.0, 18.0));
    }

    #[test]
    fn stagger_delays_are_arithmetic() {
        let spec = RevealSpec::normal();
        assert_eq!(spec.stagger_delay(0.0, 0), 0.0);
        assert_eq!(spec.stagger_delay(0.0, 3), 240.0);
        assert_eq!(spec.stagger_delay(100.0, 2), 260.0);

        let boosted = RevealSpec::boosted();
        assert_eq!(boosted.stagger_delay(0.0, 5), 600.0);
    }

    #[test]
    fn boosted_profile_moves_further_and_slower() {
        let normal = RevealSpec::normal();
        let boosted = RevealSpec::boosted();
        assert!(boosted.duration_ms > normal.duration_ms);
        assert!(boosted.distance > normal.distance);
        assert_eq!(RevealSpec::for_boost(true), boosted);
        assert_eq!(RevealSpec::for_boost(false), normal);
    }
}
