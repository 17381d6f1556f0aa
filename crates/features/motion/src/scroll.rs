//! Interpolated page scrolling.
//!
//! The engine maintains a virtual scroll target that pointer wheels and
//! programmatic jumps write to, and eases the rendered position toward it
//! every frame. On touch hardware, narrow viewports or reduced-motion
//! sessions the engine constructs in an inert mode: native scrolling passes
//! through untouched and the engine merely mirrors the reported offset so
//! consumers (chrome, backdrop) still see one coherent scroll position.

use crate::capability::CapabilityProfile;

/// Viewport width (px) required for interpolated scrolling.
pub const SMOOTH_MIN_WIDTH_PX: f32 = 1024.0;
/// Fraction of the remaining distance covered per 60 fps frame.
pub const LERP_PER_FRAME: f64 = 0.1;

const BASE_FRAME_MS: f64 = 1000.0 / 60.0;
/// Distance below which the position snaps onto the target so velocity
/// settles at exactly zero instead of decaying forever.
const SNAP_EPSILON: f64 = 0.05;

/// Per-frame scroll readout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Rendered scroll offset in px.
    pub position: f64,
    /// Where the offset is heading.
    pub target: f64,
    /// Position delta of the last frame, in px.
    pub velocity: f64,
    /// `position / max_scroll`, clamped to `[0, 1]`; `0` when the page
    /// does not scroll at all.
    pub progress: f64,
}

#[derive(Debug)]
pub struct ScrollEngine {
    smooth: bool,
    state: ScrollState,
    max_scroll: f64,
    last_step_ms: Option<f64>,
}

impl ScrollEngine {
    /// Builds an engine for the detected capabilities.
    ///
    /// Interpolation activates only for fine-pointer, motion-friendly
    /// viewports at least [`SMOOTH_MIN_WIDTH_PX`] wide; everything else gets
    /// the inert pass-through.
    #[must_use]
    pub fn new(profile: &CapabilityProfile) -> Self {
        let smooth = !profile.reduced_motion
            && !profile.signals.coarse_pointer
            && profile.signals.viewport_width >= SMOOTH_MIN_WIDTH_PX;
        Self { smooth, state: ScrollState::default(), max_scroll: 0.0, last_step_ms: None }
    }

    /// An engine that never interpolates; used when no profile exists yet.
    #[must_use]
    pub fn inert() -> Self {
        Self { smooth: false, state: ScrollState::default(), max_scroll: 0.0, last_step_ms: None }
    }

    /// Whether this engine interpolates or passes native scrolling through.
    #[must_use]
    pub const fn is_smooth(&self) -> bool {
        self.smooth
    }

    #[must_use]
    pub const fn state(&self) -> ScrollState {
        self.state
    }

    /// Updates the scrollable extent (document height minus viewport).
    pub fn set_max_scroll(&mut self, max_scroll: f64) {
        self.max_scroll = max_scroll.max(0.0);
        self.state.target = self.state.target.clamp(0.0, self.max_scroll);
        // Content can shrink under the current offset; never render past it.
        self.state.position = self.state.position.clamp(0.0, self.max_scroll);
    }

    /// Applies a wheel delta to the target.
    pub fn wheel(&mut self, delta: f64) {
        if self.smooth {
            self.state.target = (self.state.target + delta).clamp(0.0, self.max_scroll);
        }
    }

    /// Starts an eased scroll toward `offset`.
    pub fn scroll_to(&mut self, offset: f64) {
        self.state.target = offset.clamp(0.0, self.max_scroll);
        if !self.smooth {
            self.state.position = self.state.target;
        }
    }

    /// Syncs the browser-reported offset (scrollbar drags, anchor jumps).
    ///
    /// In smooth mode the report becomes the new target and easing still
    /// applies; in inert mode the engine simply mirrors it.
    pub fn observe_native(&mut self, offset: f64) {
        let offset = offset.clamp(0.0, self.max_scroll.max(offset));
        if self.smooth {
            self.state.target = offset;
        } else {
            self.state.position = offset;
            self.state.target = offset;
        }
    }

    /// Route-change reset: jumps to the top with no easing and no velocity.
    pub fn scroll_to_top_immediate(&mut self) {
        self.state.position = 0.0;
        self.state.target = 0.0;
        self.state.velocity = 0.0;
        self.state.progress = 0.0;
    }

    /// Halts easing where it stands; the target collapses onto the position.
    pub fn stop(&mut self) {
        self.state.target = self.state.position;
    }

    /// Advances one frame. `now_ms` is a monotonic timestamp in milliseconds.
    ///
    /// The easing factor is exponent-compensated for the elapsed time, so a
    /// dropped frame covers the same distance as the two frames it replaced.
    pub fn step(&mut self, now_ms: f64) -> ScrollState {
        let elapsed = self.last_step_ms.map_or(BASE_FRAME_MS, |last| (now_ms - last).max(0.0));
        self.last_step_ms = Some(now_ms);

        if self.smooth {
            let frames = elapsed / BASE_FRAME_MS;
            let factor = 1.0 - (1.0 - LERP_PER_FRAME).powf(frames);
            let previous = self.state.position;
            let mut next = previous + (self.state.target - previous) * factor;
            if (self.state.target - next).abs() < SNAP_EPSILON {
                next = self.state.target;
            }
            self.state.position = next;
            self.state.velocity = next - previous;
        } else {
            self.state.position = self.state.target;
            self.state.velocity = 0.0;
        }

        self.state.progress = if self.max_scroll > 0.0 {
            (self.state.position / self.max_scroll).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{EnvSignals, detect};
    use atelier_domain::config::MotionConfig;

    fn smooth_engine() -> ScrollEngine {
        let signals = EnvSignals {
            reduced_motion: false,
            coarse_pointer: false,
            viewport_width: 1440.0,
            viewport_height: 900.0,
            cores: Some(8),
            device_pixel_ratio: Some(1.0),
            save_data: false,
        };
        let mut engine = ScrollEngine::new(&detect(Some(signals), &MotionConfig::default()));
        engine.set_max_scroll(5000.0);
        engine
    }

    #[test]
    fn coarse_pointer_disables_interpolation() {
        let signals = EnvSignals {
            reduced_motion: false,
            coarse_pointer: true,
            viewport_width: 1440.0,
            viewport_height: 900.0,
            cores: Some(8),
            device_pixel_ratio: Some(1.0),
            save_data: false,
        };
        let engine = ScrollEngine::new(&detect(Some(signals), &MotionConfig::default()));
        assert!(!engine.is_smooth());
    }

    #[test]
    fn narrow_viewport_disables_interpolation() {
        let signals = EnvSignals {
            reduced_motion: false,
            coarse_pointer: false,
            viewport_width: 1000.0,
            viewport_height: 900.0,
            cores: Some(8),
            device_pixel_ratio: Some(1.0),
            save_data: false,
        };
        let engine = ScrollEngine::new(&detect(Some(signals), &MotionConfig::default()));
        assert!(!engine.is_smooth());
    }

    #[test]
    fn reduced_motion_disables_interpolation() {
        let signals = EnvSignals {
            reduced_motion: true,
            coarse_pointer: false,
            viewport_width: 1440.0,
            viewport_height: 900.0,
            cores: Some(8),
            device_pixel_ratio: Some(1.0),
            save_data: false,
        };
        let engine = ScrollEngine::new(&detect(Some(signals), &MotionConfig::default()));
        assert!(!engine.is_smooth());
    }

    #[test]
    fn position_converges_and_velocity_settles_to_zero() {
        let mut engine = smooth_engine();
        engine.scroll_to(1000.0);
        let mut now = 0.0;
        let mut state = ScrollState::default();
        for _ in 0..400 {
            now += 16.667;
            state = engine.step(now);
        }
        assert!((state.position - 1000.0).abs() < f64::EPSILON);
        assert_eq!(state.velocity, 0.0);
        assert!((state.progress - 0.2).abs() < 1e-9);
    }

    #[test]
    fn big_frame_gap_covers_the_same_distance_as_small_steps() {
        let mut fine = smooth_engine();
        let mut coarse = smooth_engine();
        fine.scroll_to(2000.0);
        coarse.scroll_to(2000.0);

        fine.step(0.0);
        coarse.step(0.0);
        for frame in 1..=4 {
            fine.step(f64::from(frame) * 16.667);
        }
        let jumped = coarse.step(4.0 * 16.667);
        assert!((fine.state().position - jumped.position).abs() < 1.0);
    }

    #[test]
    fn wheel_deltas_clamp_to_the_scrollable_extent() {
        let mut engine = smooth_engine();
        engine.wheel(-500.0);
        assert_eq!(engine.state().target, 0.0);
        engine.wheel(99_999.0);
        assert_eq!(engine.state().target, 5000.0);
    }

    #[test]
    fn shrinking_content_clamps_the_current_position() {
        let mut engine = smooth_engine();
        engine.scroll_to(4000.0);
        for frame in 0..600 {
            engine.step(f64::from(frame) * 16.667);
        }
        engine.set_max_scroll(1000.0);
        assert!(engine.state().position <= 1000.0);
        assert!(engine.state().target <= 1000.0);
    }

    #[test]
    fn inert_engine_mirrors_native_offsets_without_velocity() {
        let mut engine = ScrollEngine::inert();
        engine.set_max_scroll(3000.0);
        engine.observe_native(240.0);
        let state = engine.step(16.667);
        assert_eq!(state.position, 240.0);
        assert_eq!(state.velocity, 0.0);
        assert!((state.progress - 0.08).abs() < 1e-9);
    }

    #[test]
    fn wheel_is_ignored_in_inert_mode() {
        let mut engine = ScrollEngine::inert();
        engine.set_max_scroll(3000.0);
        engine.wheel(500.0);
        assert_eq!(engine.step(16.667).position, 0.0);
    }

    #[test]
    fn immediate_top_reset_clears_all_motion() {
        let mut engine = smooth_engine();
        engine.scroll_to(3000.0);
        engine.step(0.0);
        engine.step(16.667);
        engine.scroll_to_top_immediate();
        let state = engine.state();
        assert_eq!(state.position, 0.0);
        assert_eq!(state.target, 0.0);
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn stop_freezes_the_scroll_mid_flight() {
        let mut engine = smooth_engine();
        engine.scroll_to(3000.0);
        engine.step(0.0);
        engine.step(16.667);
        let frozen = engine.state().position;
        engine.stop();
        let state = engine.step(33.333);
        assert!((state.position - frozen).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_extent_reports_zero_progress() {
        let mut engine = smooth_engine();
        engine.set_max_scroll(0.0);
        assert_eq!(engine.step(16.667).progress, 0.0);
    }
}
