//! Navigation chrome: the fixed top bar and the footer.

use atelier::domain::content::{FOOTER, NAV_CTA, NAV_ITEMS, NavItem, STUDIO};
use chrono::Datelike;
use dioxus::prelude::*;

use crate::app::Route;
use crate::motion::use_motion;

fn route_for(href: &str) -> Route {
    href.parse().unwrap_or(Route::Home {})
}

/// Fixed top bar. Compacts after the first stretch of scroll and swaps to
/// a full-screen menu on coarse layouts; both states come from the
/// choreography, not from media queries alone.
#[component]
pub fn Navbar() -> Element {
    let motion = use_motion();
    let chrome = use_memo(move || motion.chrome());

    let state = chrome();
    let mut class = String::from("navbar");
    if state.compact {
        class.push_str(" compact");
    }
    if state.menu_open {
        class.push_str(" menu-open");
    }

    rsx! {
        header { class: "{class}",
            nav { class: "navbar-inner",
                Link { class: "brand", to: Route::Home {}, "{STUDIO.name}" }
                div { class: "nav-links",
                    for item in NAV_ITEMS {
                        Link { class: "nav-link", to: route_for(item.href), "{item.label}" }
                    }
                }
                span { class: "nav-cta-slot", "data-attract": "",
                    Link { class: "nav-cta", to: Route::Quote {}, "{NAV_CTA.label}" }
                }
                button {
                    class: "menu-toggle",
                    "aria-label": "Toggle menu",
                    "aria-expanded": state.menu_open,
                    onclick: move |_| motion.toggle_menu(),
                    span { class: "menu-line" }
                    span { class: "menu-line" }
                }
            }
            if state.menu_open {
                div { class: "mobile-menu",
                    for item in NAV_ITEMS {
                        Link { class: "mobile-link", to: route_for(item.href), "{item.label}" }
                    }
                    Link { class: "mobile-link cta", to: Route::Quote {}, "{NAV_CTA.label}" }
                }
            }
        }
    }
}

#[component]
pub fn Footer() -> Element {
    let year = chrono::Utc::now().year();

    rsx! {
        footer { class: "footer",
            div { class: "footer-inner",
                div { class: "footer-brand",
                    span { class: "brand", "{STUDIO.name}" }
                    a { class: "footer-mail", href: "mailto:{STUDIO.email}", "{STUDIO.email}" }
                }
                FooterColumn { title: "Company", items: FOOTER.company }
                FooterColumn { title: "Services", items: FOOTER.services }
                FooterColumn { title: "Legal", items: FOOTER.legal }
            }
            div { class: "footer-legal",
                span { "© {year} {STUDIO.name}. All rights reserved." }
            }
        }
    }
}

#[component]
fn FooterColumn(title: &'static str, items: &'static [NavItem]) -> Element {
    rsx! {
        div { class: "footer-column",
            span { class: "footer-title", "{title}" }
            for item in items {
                a { class: "footer-link", href: "{item.href}", "{item.label}" }
            }
        }
    }
}
