//! Interaction broadcast hub.
//!
//! A single shared cell bridging input producers (scroll engine, pointer
//! handlers) and the particle field. Each field has exactly one writer: the
//! director writes `scroll_velocity` once per tick, pointer handlers own the
//! attractor. Attractor *placements* are throttled to one committed update
//! per frame stamp; *clears* always apply so a pointer leaving the canvas is
//! never lost to throttling.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Consistent copy of the interaction state, taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionSnapshot {
    /// Scroll velocity of the current frame, px per frame.
    pub scroll_velocity: f64,
    /// Pointer attractor in viewport px, when a pointer hovers the canvas.
    pub attractor: Option<(f32, f32)>,
}

#[derive(Debug, Default)]
struct HubState {
    snapshot: InteractionSnapshot,
    frame: u64,
    attractor_frame: Option<u64>,
}

/// Cheaply clonable handle to the shared interaction state.
#[derive(Debug, Clone, Default)]
pub struct InteractionHub {
    state: Arc<Mutex<HubState>>,
}

impl InteractionHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the frame stamp; called once per tick before any reads.
    pub fn begin_frame(&self) -> u64 {
        let mut state = self.state.lock();
        state.frame += 1;
        state.frame
    }

    /// Publishes the scroll velocity of the current frame.
    pub fn set_velocity(&self, velocity: f64) {
        self.state.lock().snapshot.scroll_velocity = velocity;
    }

    /// Places the pointer attractor.
    ///
    /// Returns `false` when the write was dropped because an attractor was
    /// already committed during the current frame stamp.
    pub fn set_attractor(&self, x: f32, y: f32) -> bool {
        let mut state = self.state.lock();
        if state.attractor_frame == Some(state.frame) {
            return false;
        }
        state.attractor_frame = Some(state.frame);
        state.snapshot.attractor = Some((x, y));
        true
    }

    /// Removes the attractor. Never throttled.
    pub fn clear_attractor(&self) {
        self.state.lock().snapshot.attractor = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> InteractionSnapshot {
        self.state.lock().snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_updates_are_visible_in_the_next_snapshot() {
        let hub = InteractionHub::new();
        hub.begin_frame();
        hub.set_velocity(12.5);
        assert_eq!(hub.snapshot().scroll_velocity, 12.5);
    }

    #[test]
    fn attractor_commits_once_per_frame_stamp() {
        let hub = InteractionHub::new();
        hub.begin_frame();
        assert!(hub.set_attractor(100.0, 100.0));
        assert!(!hub.set_attractor(200.0, 200.0), "second write in the same frame is dropped");
        assert_eq!(hub.snapshot().attractor, Some((100.0, 100.0)));

        hub.begin_frame();
        assert!(hub.set_attractor(200.0, 200.0));
        assert_eq!(hub.snapshot().attractor, Some((200.0, 200.0)));
    }

    #[test]
    fn clear_applies_even_after_a_committed_placement() {
        let hub = InteractionHub::new();
        hub.begin_frame();
        assert!(hub.set_attractor(50.0, 60.0));
        hub.clear_attractor();
        assert_eq!(hub.snapshot().attractor, None);
    }

    #[test]
    fn snapshot_is_a_consistent_pair() {
        let hub = InteractionHub::new();
        hub.begin_frame();
        hub.set_velocity(3.0);
        hub.set_attractor(10.0, 20.0);
        let snapshot = hub.snapshot();
        assert_eq!(snapshot.scroll_velocity, 3.0);
        assert_eq!(snapshot.attractor, Some((10.0, 20.0)));
    }

    #[test]
    fn clones_share_the_same_state() {
        let hub = InteractionHub::new();
        let other = hub.clone();
        hub.begin_frame();
        other.set_velocity(-4.0);
        assert_eq!(hub.snapshot().scroll_velocity, -4.0);
    }
}
