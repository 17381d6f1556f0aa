//! Entrance overlay.
//!
//! Renders the intro timeline's per-frame visual: wordmark scale-in, a
//! gradient sweep across it, the subtext rise and finally the panel exit
//! wipe. The timeline itself lives in the motion crate; a click anywhere
//! skips straight to the site.

use atelier::domain::content::STUDIO;
use dioxus::prelude::*;

use crate::motion::use_motion;

const SUBTEXT: &str = "Software Studio";

#[component]
pub fn IntroOverlay() -> Element {
    let motion = use_motion();

    // Pre-boot: hold a plain cover so the first paint never flashes the
    // page before the sequencer decides whether to play.
    let Some(frame) = motion.frame() else {
        return rsx! {
            div { class: "intro-overlay", "aria-hidden": "true" }
        };
    };

    if frame.intro.is_finished() {
        return rsx! {};
    }
    let visual = frame.intro_visual;
    if visual.hidden {
        return rsx! {};
    }

    let overlay_style = format!("transform:translate3d(0,{:.2}%,0)", -visual.panel_exit * 100.0);
    let headline_style = format!(
        "opacity:{:.3};transform:scale({:.4});background-position:{:.1}% 0",
        visual.headline_opacity,
        visual.headline_scale,
        visual.sweep * 100.0
    );
    let subtext_style = format!(
        "opacity:{:.3};transform:translate3d(0,{:.1}px,0)",
        visual.subtext_opacity, visual.subtext_offset
    );

    rsx! {
        div {
            class: "intro-overlay",
            style: "{overlay_style}",
            "aria-hidden": "true",
            onclick: move |_| motion.cancel_intro(),
            div { class: "intro-content",
                div { class: "intro-text", style: "{headline_style}", "{STUDIO.name}" }
                div { class: "intro-subtext", style: "{subtext_style}", "{SUBTEXT}" }
            }
        }
    }
}
