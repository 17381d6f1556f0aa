//! Backdrop canvas and the on-page diagnostics badge.

use dioxus::prelude::*;

use crate::motion::use_motion;

/// Fixed full-viewport canvas the bridge paints the particle field onto.
/// Mounted only once the stage says so; visibility fades through CSS on
/// the `data-visible` attribute.
#[component]
pub fn Backdrop() -> Element {
    let motion = use_motion();
    let stage = use_memo(move || motion.stage());

    let Some(view) = stage() else { return rsx! {} };
    if !view.mounted {
        return rsx! {};
    }

    rsx! {
        canvas {
            id: "atelier-backdrop",
            class: "backdrop",
            "data-visible": view.visible,
            "data-mode": view.mode.as_attr(),
            "aria-hidden": "true",
        }
    }
}

/// Corner badge shown only when a debug flag is set on the query string.
#[component]
pub fn DebugBadge() -> Element {
    let motion = use_motion();
    let flags = use_memo(move || motion.flags());
    let readout = use_memo(move || motion.readout());

    let current = flags();
    if !(current.tier_debug || current.field_debug) {
        return rsx! {};
    }
    let Some(report) = readout() else { return rsx! {} };

    let field_line = if report.paused {
        "paused"
    } else if report.animating {
        "animating"
    } else {
        "static"
    };

    rsx! {
        aside { class: "debug-badge",
            span { class: "debug-tier", "tier {report.tier}" }
            span { class: "debug-reason", "{report.reason}" }
            if current.field_debug {
                span { "{report.points} points, {field_line}" }
                span { if report.backdrop_visible { "backdrop shown" } else { "backdrop hidden" } }
            }
        }
    }
}
