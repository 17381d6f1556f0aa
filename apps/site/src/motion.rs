//! Motion controller for one page load.
//!
//! The shell provides a [`MotionHandle`] through context and spawns a single
//! boot future behind it: probe the environment, resolve the capability
//! profile, build the [`MotionDirector`] and then drive it from the bridge
//! event stream until the page unloads. Components never touch the director
//! directly; they read signals and call the input passthroughs, so the drive
//! loop stays the only writer of choreography state.

use std::sync::Arc;

use atelier::domain::config::MotionConfig;
use atelier::features::motion::capability::{CapabilityProfile, Tier, detect};
use atelier::features::motion::chrome::ChromeState;
use atelier::features::motion::debug::{DebugReadout, MotionFlags};
use atelier::features::motion::director::{MotionDirector, MotionFrame};
use atelier::features::motion::reveal::{Reveal, RevealConfig, RevealSpec, RevealVisual};
use atelier::features::motion::stage::StageView;
use atelier::kernel::session::SessionStore;
use dioxus::document;
use dioxus::prelude::*;
use fxhash::FxHashMap;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::bridge::{
    BOOT_PROBE_JS, BRIDGE_JS, BootProbe, BridgeCommand, BridgeEvent, BrowserSessionStore,
    project_points,
};

/// Backdrop point color; matches the accent ramp in `main.css`.
const POINT_COLOR: &str = "#96a7cc";
/// Frames between debug badge refreshes.
const READOUT_INTERVAL: u64 = 30;

/// Copyable view over the motion state of this page load.
#[derive(Debug, Clone, Copy)]
pub struct MotionHandle {
    frame: Signal<Option<MotionFrame>>,
    profile: Signal<Option<CapabilityProfile>>,
    flags: Signal<MotionFlags>,
    smooth: Signal<bool>,
    readout: Signal<Option<DebugReadout>>,
    visuals: Signal<FxHashMap<u64, RevealVisual>>,
    director: Signal<Option<MotionDirector>>,
    pending_reveals: Signal<Vec<(u64, RevealConfig)>>,
    dropped_reveals: Signal<Vec<u64>>,
    next_reveal_id: Signal<u64>,
}

/// Creates the handle, provides it as context and spawns the drive loop.
/// Call once, from the shell.
pub fn use_motion_root() -> MotionHandle {
    let api = use_context_provider(|| Signal::new(None::<ApiClient>));
    let handle = MotionHandle {
        frame: use_signal(|| None),
        profile: use_signal(|| None),
        flags: use_signal(MotionFlags::default),
        smooth: use_signal(|| false),
        readout: use_signal(|| None),
        visuals: use_signal(FxHashMap::default),
        director: use_signal(|| None),
        pending_reveals: use_signal(Vec::new),
        dropped_reveals: use_signal(Vec::new),
        next_reveal_id: use_signal(|| 0),
    };
    use_context_provider(|| handle);
    use_future(move || run(handle, api));
    handle
}

/// The shell-provided [`MotionHandle`].
pub fn use_motion() -> MotionHandle {
    use_context()
}

impl MotionHandle {
    // --- Reads (subscribe the calling scope) ---

    #[must_use]
    pub fn frame(&self) -> Option<MotionFrame> {
        (self.frame)()
    }

    #[must_use]
    pub fn tier(&self) -> Option<Tier> {
        self.profile.read().as_ref().map(|profile| profile.tier)
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.profile.read().as_ref().is_some_and(|profile| profile.reduced_motion)
    }

    #[must_use]
    pub fn flags(&self) -> MotionFlags {
        (self.flags)()
    }

    /// True when the interpolated engine owns scrolling.
    #[must_use]
    pub fn is_smooth(&self) -> bool {
        (self.smooth)()
    }

    #[must_use]
    pub fn chrome(&self) -> ChromeState {
        self.frame.read().map(|frame| frame.chrome).unwrap_or_default()
    }

    #[must_use]
    pub fn stage(&self) -> Option<StageView> {
        self.frame.read().map(|frame| frame.stage)
    }

    #[must_use]
    pub fn readout(&self) -> Option<DebugReadout> {
        self.readout.read().clone()
    }

    /// Style values for one registered reveal, absent until its first frame.
    #[must_use]
    pub fn reveal_visual(&self, id: u64) -> Option<RevealVisual> {
        self.visuals.read().get(&id).copied()
    }

    // --- Reveal registry ---

    /// Claims an id for a reveal element; ids are unique per page load.
    pub fn allocate_reveal_id(&self) -> u64 {
        let mut next = self.next_reveal_id;
        let id = *next.peek();
        next += 1;
        id
    }

    /// Queues a reveal for the drive loop to adopt on the next frame.
    pub fn register_reveal(&self, id: u64, config: RevealConfig) {
        let mut pending = self.pending_reveals;
        pending.write().push((id, config));
    }

    /// Queues removal of a dropped reveal element.
    pub fn release_reveal(&self, id: u64) {
        let mut dropped = self.dropped_reveals;
        dropped.write().push(id);
    }

    // --- Input passthroughs ---

    pub fn toggle_menu(&self) {
        self.with_director(MotionDirector::toggle_menu);
    }

    pub fn close_menu(&self) {
        self.with_director(MotionDirector::close_menu);
    }

    pub fn route_changed(&self) {
        self.with_director(MotionDirector::route_changed);
    }

    pub fn cancel_intro(&self) {
        self.with_director(MotionDirector::cancel_intro);
    }

    fn with_director(&self, apply: impl FnOnce(&mut MotionDirector)) {
        let mut director = self.director;
        if let Some(director) = director.write().as_mut() {
            apply(director);
        }
    }

    // --- Drive-loop internals ---

    fn adopt_boot(&self, profile: CapabilityProfile, flags: MotionFlags, director: MotionDirector) {
        let mut this = *self;
        this.smooth.set(director.is_smooth());
        this.profile.set(Some(profile));
        this.flags.set(flags);
        this.director.set(Some(director));
    }

    fn advance<R>(&self, tick: impl FnOnce(&mut MotionDirector) -> R) -> Option<R> {
        let mut director = self.director;
        director.write().as_mut().map(tick)
    }

    fn publish_frame(&self, frame: MotionFrame) {
        let mut signal = self.frame;
        signal.set(Some(frame));
    }

    fn publish_visuals(&self, visuals: FxHashMap<u64, RevealVisual>) {
        let mut signal = self.visuals;
        signal.set(visuals);
    }

    fn drain_reveals(
        &self,
        reveals: &mut FxHashMap<u64, Reveal>,
        ratios: &mut FxHashMap<u64, f32>,
    ) {
        let mut pending = self.pending_reveals;
        let queued = std::mem::take(&mut *pending.write());
        if !queued.is_empty() {
            let reduced =
                self.profile.peek().as_ref().is_some_and(|profile| profile.reduced_motion);
            let spec = RevealSpec::for_boost(self.flags.peek().boost);
            for (id, config) in queued {
                reveals.insert(id, Reveal::new(spec, config, reduced));
            }
        }

        let mut dropped = self.dropped_reveals;
        for id in std::mem::take(&mut *dropped.write()) {
            reveals.remove(&id);
            ratios.remove(&id);
        }
    }

    fn refresh_readout(&self) {
        let readout = {
            let director = self.director;
            let guard = director.peek();
            guard.as_ref().map(MotionDirector::debug_readout)
        };
        if *self.readout.peek() != readout {
            let mut signal = self.readout;
            signal.set(readout);
        }
    }
}

/// Boot: probe, resolve, construct, then hand over to [`drive`].
async fn run(handle: MotionHandle, mut api: Signal<Option<ApiClient>>) {
    let probe = match document::eval(BOOT_PROBE_JS).await {
        Ok(value) => match serde_json::from_value::<BootProbe>(value) {
            Ok(probe) => probe,
            Err(err) => {
                warn!(%err, "Malformed boot probe; assuming defaults");
                BootProbe::default()
            }
        },
        Err(err) => {
            warn!(?err, "Boot probe failed; assuming defaults");
            BootProbe::default()
        }
    };

    let base = MotionConfig::default();
    let flags = MotionFlags::from_query(&probe.query).overlay(&base);
    let config = flags.into_config(&base);
    let profile = detect(Some(probe.signals()), &config);
    info!(tier = profile.tier.index(), reason = %profile.reason, "Capability profile resolved");

    let store = Arc::new(BrowserSessionStore::seeded(probe.session.clone()));
    let screen = (probe.viewport_width, probe.viewport_height);
    let seed = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let session = Arc::clone(&store) as Arc<dyn SessionStore>;
    let director = MotionDirector::new(profile.clone(), session, seed, screen);

    api.set(Some(ApiClient::new(&probe.origin, Arc::clone(&store))));
    handle.adopt_boot(profile, flags, director);

    drive(handle, store, screen).await;
}

/// Event pump: one [`BridgeEvent`] in, director state and render commands out.
async fn drive(handle: MotionHandle, store: Arc<BrowserSessionStore>, mut screen: (f32, f32)) {
    let mut bridge = document::eval(BRIDGE_JS);
    let mut reveals: FxHashMap<u64, Reveal> = FxHashMap::default();
    let mut ratios: FxHashMap<u64, f32> = FxHashMap::default();
    let mut last_visuals: FxHashMap<u64, RevealVisual> = FxHashMap::default();
    let mut last_body: Option<BridgeCommand> = None;
    let mut backdrop_painted = false;
    let mut frame_index: u64 = 0;

    loop {
        let event: BridgeEvent = match bridge.recv().await {
            Ok(event) => event,
            // The page is unloading; nothing left to drive.
            Err(_) => return,
        };

        match event {
            BridgeEvent::Frame { now, max_scroll } => {
                frame_index = frame_index.wrapping_add(1);
                handle.drain_reveals(&mut reveals, &mut ratios);

                let Some((frame, paint)) = handle.advance(|director| {
                    director.set_max_scroll(max_scroll);
                    let frame = director.tick(now);
                    let paint = paint_command(
                        director,
                        &frame,
                        screen,
                        frame_index,
                        &mut backdrop_painted,
                    );
                    (frame, paint)
                }) else {
                    continue;
                };

                for (id, reveal) in &mut reveals {
                    let ratio = ratios.get(id).copied().unwrap_or(0.0);
                    reveal.update(ratio, now);
                }
                let visuals: FxHashMap<u64, RevealVisual> =
                    reveals.iter().map(|(id, reveal)| (*id, reveal.visual(now))).collect();
                if visuals != last_visuals {
                    last_visuals.clone_from(&visuals);
                    handle.publish_visuals(visuals);
                }

                let body = BridgeCommand::Body {
                    background: frame.stage.mode.as_attr(),
                    scroll: if *handle.smooth.peek() { "virtual" } else { "native" },
                    locked: frame.scroll_locked,
                };
                if last_body.as_ref() != Some(&body) {
                    if bridge.send(&body).is_err() {
                        return;
                    }
                    last_body = Some(body);
                }

                if let Some(command) = paint
                    && bridge.send(&command).is_err()
                {
                    return;
                }

                if store.has_dirty()
                    && bridge.send(&BridgeCommand::Persist { entries: store.take_dirty() }).is_err()
                {
                    return;
                }

                let flags = *handle.flags.peek();
                if (flags.tier_debug || flags.field_debug)
                    && frame_index % READOUT_INTERVAL == 0
                {
                    handle.refresh_readout();
                }

                handle.publish_frame(frame);
            }
            BridgeEvent::Wheel { delta } => handle.with_director(|d| d.wheel(delta)),
            BridgeEvent::NativeScroll { offset } => {
                handle.with_director(|d| d.observe_native_scroll(offset));
            }
            BridgeEvent::Resize { width, height } => {
                screen = (width, height);
                backdrop_painted = false;
                handle.with_director(|d| d.set_viewport(screen));
            }
            BridgeEvent::Pointer { x, y } => handle.with_director(|d| d.hover_attractor(x, y)),
            BridgeEvent::PointerLeave => handle.with_director(|d| d.clear_attractor()),
            BridgeEvent::Visibility { hidden } => {
                handle.with_director(|d| d.set_tab_hidden(hidden));
            }
            BridgeEvent::Reveal { id, ratio } => {
                ratios.insert(id, ratio);
            }
        }
    }
}

/// Decides whether this frame redraws the backdrop canvas.
///
/// Animated tiers repaint on alternate frames to halve the serialized
/// traffic; the static tier paints once per mount/resize; a hidden stage
/// clears the canvas once and then stays quiet.
fn paint_command(
    director: &MotionDirector,
    frame: &MotionFrame,
    screen: (f32, f32),
    frame_index: u64,
    painted: &mut bool,
) -> Option<BridgeCommand> {
    let budget = director.budget();
    if budget.points == 0 {
        return None;
    }

    if !frame.stage.mounted || !frame.stage.visible {
        if *painted {
            *painted = false;
            return Some(BridgeCommand::Paint {
                points: Vec::new(),
                point_size: budget.point_size,
                opacity: 0.0,
                pixel_ratio: director.profile().pixel_ratio,
                color: POINT_COLOR,
            });
        }
        return None;
    }

    if budget.animate && frame_index % 2 != 0 {
        return None;
    }
    if !budget.animate && *painted {
        return None;
    }

    *painted = true;
    Some(BridgeCommand::Paint {
        points: project_points(director.positions(), screen),
        point_size: budget.point_size,
        opacity: budget.opacity,
        pixel_ratio: director.profile().pixel_ratio,
        color: POINT_COLOR,
    })
}
