//! Frame choreography.
//!
//! [`MotionDirector`] owns every motion component for one page load and
//! advances them in a fixed order each animation frame: scroll easing first,
//! then the interaction hub publish, the particle field, the intro timeline,
//! the backdrop stage and finally the chrome. The ordering is the contract.
//! The field always reads the velocity of the *current* frame, the stage
//! always sees the intro state of the current frame, and consumers never
//! observe half-updated choreography.

use std::sync::Arc;

use atelier_kernel::session::{SessionStore, SessionStoreExt};

use crate::{
    capability::{CapabilityProfile, Tier, TierBudget},
    chrome::{ChromeController, ChromeState},
    debug::DebugReadout,
    field::{FieldViewport, ParticleField},
    hub::{InteractionHub, InteractionSnapshot},
    intro::{IntroPlayback, IntroSequencer, IntroVisual},
    lock::ScrollLock,
    scroll::{ScrollEngine, ScrollState},
    stage::{BackdropStage, StageView},
};

/// Everything the render layer needs from one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionFrame {
    pub scroll: ScrollState,
    pub chrome: ChromeState,
    pub intro: IntroPlayback,
    pub intro_visual: IntroVisual,
    pub stage: StageView,
    pub scroll_locked: bool,
}

/// Per-page-load conductor for the whole motion system.
pub struct MotionDirector {
    profile: CapabilityProfile,
    scroll: ScrollEngine,
    hub: InteractionHub,
    field: Option<ParticleField>,
    intro: IntroSequencer,
    stage: BackdropStage,
    chrome: ChromeController,
    lock: ScrollLock,
    tab_hidden: bool,
}

impl std::fmt::Debug for MotionDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionDirector")
            .field("tier", &self.profile.tier)
            .field("points", &self.field.as_ref().map_or(0, ParticleField::len))
            .field("intro", &self.intro.playback())
            .finish_non_exhaustive()
    }
}

impl MotionDirector {
    /// Wires up the components for the detected profile.
    ///
    /// `seed` fixes the particle allocation; pass something varying (page
    /// load time) in production and a constant in tests. `screen` is the
    /// viewport size in px.
    #[must_use]
    pub fn new(
        profile: CapabilityProfile,
        store: Arc<dyn SessionStore>,
        seed: u64,
        screen: (f32, f32),
    ) -> Self {
        // Sampled before the intro can write it this session.
        let intro_played = store.intro_played();
        let lock = ScrollLock::new();
        let scroll = ScrollEngine::new(&profile);
        let field = (profile.budget().points > 0).then(|| {
            ParticleField::new(profile.tier, seed, FieldViewport::from_screen(screen.0, screen.1))
        });
        let intro = IntroSequencer::new(store, lock.clone(), profile.reduced_motion);
        let stage = BackdropStage::new(intro_played, profile.reduced_motion);
        let chrome = ChromeController::new(lock.clone());
        Self {
            profile,
            scroll,
            hub: InteractionHub::new(),
            field,
            intro,
            stage,
            chrome,
            lock,
            tab_hidden: false,
        }
    }

    /// Advances one animation frame.
    pub fn tick(&mut self, now_ms: f64) -> MotionFrame {
        self.hub.begin_frame();
        let scroll = self.scroll.step(now_ms);
        self.hub.set_velocity(scroll.velocity);

        if let Some(field) = self.field.as_mut() {
            field.advance(now_ms, &self.hub.snapshot());
        }

        self.intro.start_if_pending(now_ms);
        let intro = self.intro.advance(now_ms);
        let stage = self.stage.advance(now_ms, Some(&intro));
        let chrome = self.chrome.observe_scroll(scroll.position);

        MotionFrame {
            scroll,
            chrome,
            intro,
            intro_visual: self.intro.visual(now_ms),
            stage,
            scroll_locked: self.lock.is_locked(),
        }
    }

    // --- Input passthroughs ---

    /// Wheel input; suppressed while the scroll lock is held.
    pub fn wheel(&mut self, delta: f64) {
        if !self.lock.is_locked() {
            self.scroll.wheel(delta);
        }
    }

    /// Eased programmatic scroll; suppressed while the scroll lock is held.
    pub fn scroll_to(&mut self, offset: f64) {
        if !self.lock.is_locked() {
            self.scroll.scroll_to(offset);
        }
    }

    /// Browser-reported offset; suppressed while the scroll lock is held.
    pub fn observe_native_scroll(&mut self, offset: f64) {
        if !self.lock.is_locked() {
            self.scroll.observe_native(offset);
        }
    }

    pub fn set_max_scroll(&mut self, max_scroll: f64) {
        self.scroll.set_max_scroll(max_scroll);
    }

    /// Pointer hover over the backdrop, viewport px.
    pub fn hover_attractor(&self, x: f32, y: f32) {
        self.hub.set_attractor(x, y);
    }

    /// Pointer left the backdrop.
    pub fn clear_attractor(&self) {
        self.hub.clear_attractor();
    }

    pub fn toggle_menu(&mut self) {
        self.chrome.toggle_menu();
    }

    pub fn close_menu(&mut self) {
        self.chrome.close_menu();
    }

    /// Route change: jump to the top, dismiss the menu.
    pub fn route_changed(&mut self) {
        self.chrome.route_changed();
        self.scroll.scroll_to_top_immediate();
    }

    /// The intro component unmounted before finishing.
    pub fn cancel_intro(&mut self) {
        self.intro.cancel();
    }

    /// Registers the intro completion hook.
    pub fn on_intro_complete(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.intro.set_on_complete(hook);
    }

    /// Tab visibility; a hidden tab freezes the field.
    pub fn set_tab_hidden(&mut self, hidden: bool) {
        self.tab_hidden = hidden;
        if let Some(field) = self.field.as_mut() {
            field.set_paused(hidden);
        }
    }

    pub fn set_viewport(&mut self, screen: (f32, f32)) {
        if let Some(field) = self.field.as_mut() {
            field.set_viewport(FieldViewport::from_screen(screen.0, screen.1));
        }
    }

    // --- Readouts ---

    #[must_use]
    pub const fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.profile.tier
    }

    #[must_use]
    pub const fn budget(&self) -> TierBudget {
        self.profile.tier.budget()
    }

    /// Current particle positions; empty at [`Tier::Off`].
    #[must_use]
    pub fn positions(&self) -> &[glam::Vec3] {
        self.field.as_ref().map_or(&[], ParticleField::positions)
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionSnapshot {
        self.hub.snapshot()
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// True when the interpolated engine owns scrolling instead of the
    /// document.
    #[must_use]
    pub const fn is_smooth(&self) -> bool {
        self.scroll.is_smooth()
    }

    #[must_use]
    pub fn debug_readout(&self) -> DebugReadout {
        DebugReadout {
            tier: self.profile.tier.index(),
            reason: self.profile.reason.clone(),
            points: self.field.as_ref().map_or(0, ParticleField::len),
            animating: self
                .field
                .as_ref()
                .is_some_and(|field| field.budget().animate && !field.is_paused()),
            paused: self.field.as_ref().is_some_and(ParticleField::is_paused),
            backdrop_visible: self.stage.is_visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_domain::config::MotionConfig;
    use atelier_kernel::session::MemorySessionStore;

    use crate::capability::{EnvSignals, detect};

    fn desktop_signals() -> EnvSignals {
        EnvSignals {
            reduced_motion: false,
            coarse_pointer: false,
            viewport_width: 1440.0,
            viewport_height: 900.0,
            cores: Some(8),
            device_pixel_ratio: Some(1.5),
            save_data: false,
        }
    }

    fn director(signals: EnvSignals) -> MotionDirector {
        let profile = detect(Some(signals), &MotionConfig::default());
        MotionDirector::new(profile, Arc::new(MemorySessionStore::new()), 7, (1440.0, 900.0))
    }

    #[test]
    fn full_tier_gets_a_field_and_a_locked_intro() {
        let mut d = director(desktop_signals());
        assert_eq!(d.positions().len(), 2800);
        let frame = d.tick(0.0);
        assert!(frame.scroll_locked, "intro holds the lock from its first frame");
        assert!(matches!(frame.intro, IntroPlayback::Playing { .. }));
    }

    #[test]
    fn off_tier_has_no_field_and_no_smooth_scroll() {
        let signals = EnvSignals {
            coarse_pointer: true,
            viewport_width: 375.0,
            viewport_height: 812.0,
            ..desktop_signals()
        };
        let mut d = director(signals);
        assert!(d.positions().is_empty());
        d.set_max_scroll(4000.0);
        d.wheel(300.0);
        let frame = d.tick(16.0);
        assert_eq!(frame.scroll.position, 0.0, "wheel deltas are native, not virtual");
        let readout = d.debug_readout();
        assert_eq!(readout.tier, 0);
        assert_eq!(readout.points, 0);
        assert!(!readout.animating);
    }

    #[test]
    fn wheel_is_suppressed_while_the_intro_locks_scroll() {
        let mut d = director(desktop_signals());
        d.set_max_scroll(4000.0);
        d.tick(0.0);
        d.wheel(500.0);
        let frame = d.tick(16.0);
        assert_eq!(frame.scroll.target, 0.0);

        // Finish the intro, then the wheel works.
        d.tick(10_000.0);
        d.wheel(500.0);
        let frame = d.tick(10_016.0);
        assert_eq!(frame.scroll.target, 500.0);
        assert!(frame.scroll.position > 0.0);
    }

    #[test]
    fn field_reads_the_velocity_of_the_current_tick() {
        // Twin directors with the same seed differ only in the wheel input,
        // so any position divergence on the same timestamp proves the field
        // consumed this tick's velocity, not last tick's.
        let mut scrolled = director(desktop_signals());
        let mut idle = director(desktop_signals());
        for d in [&mut scrolled, &mut idle] {
            d.set_max_scroll(10_000.0);
            d.tick(0.0);
            d.tick(10_000.0); // finish the intro, release the lock
        }
        assert_eq!(scrolled.positions(), idle.positions());

        scrolled.wheel(4000.0);
        scrolled.tick(10_016.0);
        idle.tick(10_016.0);
        assert!(scrolled.interaction().scroll_velocity > 0.0);
        assert_ne!(scrolled.positions(), idle.positions(), "push visible on the same tick");
    }

    #[test]
    fn route_change_resets_scroll_and_menu() {
        let mut d = director(desktop_signals());
        d.set_max_scroll(4000.0);
        d.tick(0.0);
        d.tick(10_000.0);
        d.wheel(800.0);
        d.tick(10_016.0);
        d.toggle_menu();
        assert!(d.is_scroll_locked());

        d.route_changed();
        let frame = d.tick(10_032.0);
        assert_eq!(frame.scroll.position, 0.0);
        assert!(!frame.chrome.menu_open);
        assert!(!frame.scroll_locked);
    }

    #[test]
    fn hidden_tab_pauses_the_field() {
        let mut d = director(desktop_signals());
        d.tick(0.0);
        d.set_tab_hidden(true);
        let frozen = d.positions().to_vec();
        d.tick(5_000.0);
        assert_eq!(d.positions(), &frozen[..]);
        assert!(d.debug_readout().paused);

        d.set_tab_hidden(false);
        d.tick(5_016.0);
        assert_ne!(d.positions(), &frozen[..]);
    }

    #[test]
    fn attractor_passthrough_is_frame_throttled() {
        let d = director(desktop_signals());
        d.hover_attractor(100.0, 100.0);
        d.hover_attractor(300.0, 300.0);
        assert_eq!(d.interaction().attractor, Some((100.0, 100.0)));
        d.clear_attractor();
        assert_eq!(d.interaction().attractor, None);
    }
}
