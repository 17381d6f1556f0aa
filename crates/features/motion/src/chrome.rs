//! Navigation chrome state.
//!
//! Tracks the two bits the navbar renders from: whether it has shrunk into
//! its compact treatment, and whether the mobile menu is open. The open menu
//! holds a [`ScrollLock`] guard, so closing it (explicitly or through a
//! route change) releases scrolling through the same single mechanism the
//! intro uses.

use serde::{Deserialize, Serialize};

use crate::lock::{ScrollLock, ScrollLockGuard};

/// Scroll offset (px) past which the navbar renders compact.
pub const COMPACT_SCROLL_PX: f64 = 20.0;

/// Render state for the navigation chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChromeState {
    pub compact: bool,
    pub menu_open: bool,
}

#[derive(Debug)]
pub struct ChromeController {
    state: ChromeState,
    lock: ScrollLock,
    menu_guard: Option<ScrollLockGuard>,
}

impl ChromeController {
    #[must_use]
    pub fn new(lock: ScrollLock) -> Self {
        Self { state: ChromeState::default(), lock, menu_guard: None }
    }

    #[must_use]
    pub const fn state(&self) -> ChromeState {
        self.state
    }

    /// Feeds the scroll offset of the current frame.
    pub fn observe_scroll(&mut self, offset: f64) -> ChromeState {
        self.state.compact = offset > COMPACT_SCROLL_PX;
        self.state
    }

    pub fn open_menu(&mut self) {
        if !self.state.menu_open {
            self.state.menu_open = true;
            self.menu_guard = Some(self.lock.acquire());
        }
    }

    pub fn close_menu(&mut self) {
        self.state.menu_open = false;
        self.menu_guard = None;
    }

    pub fn toggle_menu(&mut self) {
        if self.state.menu_open { self.close_menu() } else { self.open_menu() }
    }

    /// Route changes always dismiss the menu.
    pub fn route_changed(&mut self) {
        self.close_menu();
    }
}
