//! Browser glue for the motion system.
//!
//! Everything the choreography needs from the page flows through two
//! [`document::eval`] scripts: a one-shot probe that samples environment
//! signals before the first frame, and a long-lived bridge that streams
//! input events ([`BridgeEvent`]) in and render commands ([`BridgeCommand`])
//! out. The Rust side stays the single writer of motion state; JS only
//! reports what the page did and paints what it is told.
//!
//! [`document::eval`]: dioxus::document::eval

use std::sync::Arc;

use atelier::features::motion::capability::EnvSignals;
use atelier::features::motion::field::{CAMERA_DISTANCE, CAMERA_FOV_DEGREES};
use atelier::kernel::session::SessionStore;
use fxhash::FxHashMap;
use glam::Vec3;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// Points closer to the camera than this are skipped by the projection.
pub const NEAR_PLANE: f32 = 0.5;

/// Sampled once before the director is built; mirrors what the probe
/// script returns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BootProbe {
    pub reduced_motion: bool,
    pub coarse_pointer: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub cores: Option<u32>,
    pub device_pixel_ratio: Option<f32>,
    pub save_data: bool,
    /// Raw `location.search`, including the leading `?` when present.
    pub query: String,
    /// `location.origin`; API calls are built against it.
    pub origin: String,
    /// Full `sessionStorage` snapshot, seeding [`BrowserSessionStore`].
    pub session: FxHashMap<String, String>,
}

impl BootProbe {
    /// Environment inputs for tier detection.
    #[must_use]
    pub fn signals(&self) -> EnvSignals {
        EnvSignals {
            reduced_motion: self.reduced_motion,
            coarse_pointer: self.coarse_pointer,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            cores: self.cores,
            device_pixel_ratio: self.device_pixel_ratio,
            save_data: self.save_data,
        }
    }
}

/// Page input, JS to Rust.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BridgeEvent {
    /// One animation frame; `now` is the rAF timestamp in ms.
    Frame { now: f64, max_scroll: f64 },
    Wheel { delta: f64 },
    /// Document scroll offset, only meaningful in inert mode.
    NativeScroll { offset: f64 },
    Resize { width: f32, height: f32 },
    /// Pointer over an element marked `data-attract`, viewport px.
    Pointer { x: f32, y: f32 },
    PointerLeave,
    Visibility { hidden: bool },
    /// Intersection ratio for the element marked `data-reveal="{id}"`.
    Reveal { id: u64, ratio: f32 },
}

/// Render command, Rust to JS.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BridgeCommand {
    /// Redraw the backdrop canvas; `points` is projected x,y pairs in CSS px.
    Paint {
        points: Vec<f32>,
        point_size: f32,
        opacity: f32,
        pixel_ratio: f32,
        color: &'static str,
    },
    /// Mirror choreography state onto `<body>` data attributes.
    Body { background: &'static str, scroll: &'static str, locked: bool },
    /// Write queued session entries back to `sessionStorage`.
    Persist { entries: Vec<(String, Option<String>)> },
}

/// [`SessionStore`] over a `sessionStorage` snapshot.
///
/// `sessionStorage` is not reachable from the store's synchronous trait
/// methods, so writes land in an in-memory map immediately and queue a
/// mirror entry; the frame loop drains the queue into a
/// [`BridgeCommand::Persist`]. Reads are served from the snapshot, which
/// the store itself keeps current.
#[derive(Debug, Default)]
pub struct BrowserSessionStore {
    entries: RwLock<FxHashMap<String, String>>,
    dirty: Mutex<Vec<(String, Option<String>)>>,
}

impl BrowserSessionStore {
    #[must_use]
    pub fn seeded(entries: FxHashMap<String, String>) -> Self {
        Self { entries: RwLock::new(entries), dirty: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Drains writes queued since the last flush, oldest first.
    #[must_use]
    pub fn take_dirty(&self) -> Vec<(String, Option<String>)> {
        std::mem::take(&mut *self.dirty.lock())
    }

    /// True when at least one write is waiting to be mirrored.
    #[must_use]
    pub fn has_dirty(&self) -> bool {
        !self.dirty.lock().is_empty()
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        self.dirty.lock().push((key.to_owned(), Some(value.to_owned())));
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
        self.dirty.lock().push((key.to_owned(), None));
    }
}

/// Projects field positions through the backdrop camera into CSS-pixel
/// x,y pairs, dropping points behind the near plane.
///
/// Same camera as [`FieldViewport::from_screen`], so attractor forces and
/// drawn points agree on where the screen is.
///
/// [`FieldViewport::from_screen`]: atelier::features::motion::field::FieldViewport::from_screen
#[must_use]
pub fn project_points(positions: &[Vec3], screen: (f32, f32)) -> Vec<f32> {
    let width = screen.0.max(1.0);
    let height = screen.1.max(1.0);
    let focal = (height * 0.5) / (CAMERA_FOV_DEGREES.to_radians() * 0.5).tan();

    let mut out = Vec::with_capacity(positions.len() * 2);
    for point in positions {
        let view_z = CAMERA_DISTANCE - point.z;
        if view_z < NEAR_PLANE {
            continue;
        }
        let scale = focal / view_z;
        // Tenth-of-a-pixel precision keeps the serialized frame small.
        let x = (point.x * scale).mul_add(10.0, width * 5.0).round() / 10.0;
        let y = (-point.y * scale).mul_add(10.0, height * 5.0).round() / 10.0;
        out.push(x);
        out.push(y);
    }
    out
}

/// One-shot probe; resolves to a [`BootProbe`] JSON object.
pub const BOOT_PROBE_JS: &str = r"
    const media = (q) => window.matchMedia ? window.matchMedia(q).matches : false;
    const conn = navigator.connection || {};
    const session = {};
    try {
        for (let i = 0; i < sessionStorage.length; i++) {
            const key = sessionStorage.key(i);
            session[key] = sessionStorage.getItem(key);
        }
    } catch (_) {}
    return {
        reducedMotion: media('(prefers-reduced-motion: reduce)'),
        coarsePointer: media('(pointer: coarse)'),
        viewportWidth: window.innerWidth,
        viewportHeight: window.innerHeight,
        cores: navigator.hardwareConcurrency || null,
        devicePixelRatio: window.devicePixelRatio || null,
        saveData: conn.saveData === true,
        query: window.location.search || '',
        origin: window.location.origin,
        session,
    };
";

/// Long-lived bridge; streams [`BridgeEvent`]s in and executes
/// [`BridgeCommand`]s out until the page unloads.
pub const BRIDGE_JS: &str = r"
    let hotPointer = null;
    let overAttractor = false;

    window.addEventListener('wheel', (e) => {
        dioxus.send({ kind: 'wheel', delta: e.deltaY });
    }, { passive: true });

    window.addEventListener('resize', () => {
        dioxus.send({ kind: 'resize', width: window.innerWidth, height: window.innerHeight });
    });

    window.addEventListener('scroll', () => {
        dioxus.send({ kind: 'nativeScroll', offset: window.scrollY || 0 });
    }, { passive: true });

    document.addEventListener('visibilitychange', () => {
        dioxus.send({ kind: 'visibility', hidden: document.hidden });
    });

    document.addEventListener('mousemove', (e) => {
        const hot = e.target && e.target.closest ? e.target.closest('[data-attract]') : null;
        if (hot) {
            hotPointer = { x: e.clientX, y: e.clientY };
            overAttractor = true;
        } else if (overAttractor) {
            overAttractor = false;
            hotPointer = null;
            dioxus.send({ kind: 'pointerLeave' });
        }
    });

    const observed = new WeakSet();
    const io = new IntersectionObserver((entries) => {
        for (const entry of entries) {
            const id = Number(entry.target.dataset.reveal);
            if (Number.isFinite(id)) {
                dioxus.send({ kind: 'reveal', id, ratio: entry.intersectionRatio });
            }
        }
    }, { threshold: [0, 0.05, 0.1, 0.25, 0.4, 0.6, 0.8, 1] });
    const rescan = () => {
        for (const el of document.querySelectorAll('[data-reveal]')) {
            if (!observed.has(el)) {
                observed.add(el);
                io.observe(el);
            }
        }
    };
    new MutationObserver(rescan).observe(document.body, { childList: true, subtree: true });
    rescan();

    (async () => {
        for (;;) {
            const msg = await dioxus.recv();
            if (msg.kind === 'paint') {
                const canvas = document.getElementById('atelier-backdrop');
                if (!canvas) continue;
                const dpr = msg.pixelRatio || 1;
                const w = Math.round(canvas.clientWidth * dpr);
                const h = Math.round(canvas.clientHeight * dpr);
                if (canvas.width !== w || canvas.height !== h) {
                    canvas.width = w;
                    canvas.height = h;
                }
                const ctx = canvas.getContext('2d');
                ctx.clearRect(0, 0, w, h);
                ctx.globalAlpha = msg.opacity;
                ctx.fillStyle = msg.color;
                const r = (msg.pointSize * dpr) / 2;
                const pts = msg.points;
                for (let i = 0; i < pts.length; i += 2) {
                    ctx.beginPath();
                    ctx.arc(pts[i] * dpr, pts[i + 1] * dpr, r, 0, 6.2832);
                    ctx.fill();
                }
            } else if (msg.kind === 'body') {
                document.body.dataset.background = msg.background;
                document.body.dataset.scroll = msg.scroll;
                document.body.classList.toggle('scroll-locked', msg.locked);
            } else if (msg.kind === 'persist') {
                for (const [key, value] of msg.entries) {
                    try {
                        if (value === null) sessionStorage.removeItem(key);
                        else sessionStorage.setItem(key, value);
                    } catch (_) {}
                }
            }
        }
    })();

    const frame = (ts) => {
        if (hotPointer) {
            dioxus.send({ kind: 'pointer', x: hotPointer.x, y: hotPointer.y });
            hotPointer = null;
        }
        const content = document.getElementById('site-scroll');
        const extent = content ? content.scrollHeight : document.documentElement.scrollHeight;
        dioxus.send({ kind: 'frame', now: ts, maxScroll: Math.max(0, extent - window.innerHeight) });
        requestAnimationFrame(frame);
    };
    requestAnimationFrame(frame);
";

#[cfg(test)]
mod tests {
    use atelier::kernel::session::SessionStoreExt;
    use serde_json::json;

    use super::*;

    #[test]
    fn probe_decodes_camel_case_payload() {
        let probe: BootProbe = serde_json::from_value(json!({
            "reducedMotion": true,
            "coarsePointer": false,
            "viewportWidth": 1440.0,
            "viewportHeight": 900.0,
            "cores": 8,
            "devicePixelRatio": 2.0,
            "saveData": false,
            "query": "?motion=debug",
            "origin": "https://atelier.dev",
            "session": { "intro_played": "1" },
        }))
        .expect("probe payload");

        assert!(probe.signals().reduced_motion);
        assert_eq!(probe.cores, Some(8));
        assert_eq!(probe.session.get("intro_played").map(String::as_str), Some("1"));
    }

    #[test]
    fn probe_tolerates_missing_fields() {
        let probe: BootProbe = serde_json::from_value(json!({
            "viewportWidth": 390.0,
            "viewportHeight": 844.0,
        }))
        .expect("partial payload");

        assert_eq!(probe.cores, None);
        assert!(!probe.save_data);
        assert!(probe.session.is_empty());
    }

    #[test]
    fn events_decode_with_tagged_kinds() {
        let frame: BridgeEvent =
            serde_json::from_value(json!({ "kind": "frame", "now": 16.6, "maxScroll": 1200.0 }))
                .expect("frame");
        assert_eq!(frame, BridgeEvent::Frame { now: 16.6, max_scroll: 1200.0 });

        let scroll: BridgeEvent =
            serde_json::from_value(json!({ "kind": "nativeScroll", "offset": 240.0 }))
                .expect("native scroll");
        assert_eq!(scroll, BridgeEvent::NativeScroll { offset: 240.0 });

        let leave: BridgeEvent =
            serde_json::from_value(json!({ "kind": "pointerLeave" })).expect("pointer leave");
        assert_eq!(leave, BridgeEvent::PointerLeave);
    }

    #[test]
    fn commands_serialize_with_camel_case_fields() {
        let paint = BridgeCommand::Paint {
            points: vec![10.0, 20.0],
            point_size: 2.0,
            opacity: 0.5,
            pixel_ratio: 2.0,
            color: "#9db4ff",
        };
        let value = serde_json::to_value(&paint).expect("paint");
        assert_eq!(value["kind"], "paint");
        assert_eq!(value["pointSize"], 2.0);
        assert_eq!(value["pixelRatio"], 2.0);

        let body = BridgeCommand::Body { background: "site", scroll: "virtual", locked: false };
        let value = serde_json::to_value(&body).expect("body");
        assert_eq!(value["background"], "site");
    }

    #[test]
    fn store_serves_seeded_entries_and_queues_writes() {
        let mut seed = FxHashMap::default();
        seed.insert("intro_played".to_owned(), "1".to_owned());
        let store = BrowserSessionStore::seeded(seed);

        assert!(store.intro_played());
        assert!(!store.has_dirty());

        store.set("admin_session", "tok");
        store.remove("intro_played");
        assert_eq!(store.get("admin_session").as_deref(), Some("tok"));
        assert_eq!(store.get("intro_played"), None);

        let dirty = store.take_dirty();
        assert_eq!(
            dirty,
            vec![
                ("admin_session".to_owned(), Some("tok".to_owned())),
                ("intro_played".to_owned(), None),
            ]
        );
        assert!(!store.has_dirty());
    }

    #[test]
    fn intro_mark_is_mirrored_to_storage() {
        let store = BrowserSessionStore::default();
        store.mark_intro_played();

        assert_eq!(store.take_dirty(), vec![("intro_played".to_owned(), Some("1".to_owned()))]);
    }

    #[test]
    fn projection_centers_the_origin() {
        let projected = project_points(&[Vec3::ZERO], (1440.0, 900.0));
        assert_eq!(projected, vec![720.0, 450.0]);
    }

    #[test]
    fn projection_flips_y_and_drops_near_points() {
        let points =
            [Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, CAMERA_DISTANCE - NEAR_PLANE / 2.0)];
        let projected = project_points(&points, (1000.0, 800.0));

        // The too-near point is culled, leaving one x,y pair.
        assert_eq!(projected.len(), 2);
        // +y in world space is up, which is a smaller CSS y.
        assert!(projected[1] < 400.0);
    }

    #[test]
    fn projection_shrinks_with_depth() {
        let near = project_points(&[Vec3::new(2.0, 0.0, 0.0)], (1200.0, 800.0));
        let far = project_points(&[Vec3::new(2.0, 0.0, -10.0)], (1200.0, 800.0));
        assert!(near[0] - 600.0 > far[0] - 600.0);
    }
}
