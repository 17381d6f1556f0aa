//! Scroll-reveal wrapper.
//!
//! Wraps content in a `div` carrying a `data-reveal` id so the bridge's
//! `IntersectionObserver` reports visibility ratios for it. The element's
//! opacity and offset come back through the motion handle as one
//! [`RevealVisual`] per frame; this component only turns that into an
//! inline style.
//!
//! [`RevealVisual`]: atelier::features::motion::reveal::RevealVisual

use atelier::features::motion::reveal::{RevealConfig, RevealDirection, RevealSpec};
use dioxus::prelude::*;

use crate::motion::use_motion;

/// Reveal-on-scroll container. `index` staggers siblings within a group;
/// `immediate` keeps above-the-fold content visible from the first paint.
#[component]
pub fn RevealSection(
    #[props(default)] index: usize,
    #[props(into, default)] class: String,
    #[props(default)] direction: RevealDirection,
    #[props(default = true)] once: bool,
    #[props(default)] immediate: bool,
    children: Element,
) -> Element {
    let motion = use_motion();
    let id = use_hook(|| motion.allocate_reveal_id());

    // Re-registers after boot resolves the flags, picking up the boosted
    // timing profile when `motion=boost` is set.
    use_effect(move || {
        let spec = RevealSpec::for_boost(motion.flags().boost);
        let config = RevealConfig {
            direction,
            delay_ms: spec.stagger_delay(0.0, index),
            once,
            immediate,
        };
        motion.register_reveal(id, config);
    });
    use_drop(move || motion.release_reveal(id));

    let style = use_memo(move || {
        motion.reveal_visual(id).map_or_else(
            || if immediate { "opacity:1".to_owned() } else { "opacity:0".to_owned() },
            |visual| {
                format!(
                    "opacity:{:.3};transform:translate3d({:.1}px,{:.1}px,0)",
                    visual.opacity, visual.offset.0, visual.offset.1
                )
            },
        )
    });

    rsx! {
        div {
            class: "reveal {class}",
            style: "{style}",
            "data-reveal": "{id}",
            {children}
        }
    }
}
