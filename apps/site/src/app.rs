//! Application root: the route table and the shell layout every page
//! renders inside.

use dioxus::document;
use dioxus::prelude::*;

use crate::motion::use_motion_root;
use crate::pages::admin::{Admin, SignIn};
use crate::pages::home::Home;
use crate::pages::quote::Quote;
use crate::pages::studio::{NotFound, Process, Services, Work};
use crate::ui::backdrop::{Backdrop, DebugBadge};
use crate::ui::chrome::{Footer, Navbar};
use crate::ui::intro::IntroOverlay;

static MAIN_CSS: Asset = asset!("/assets/main.css");

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},
    #[route("/services")]
    Services {},
    #[route("/work")]
    Work {},
    #[route("/process")]
    Process {},
    #[route("/quote")]
    Quote {},
    #[route("/admin/sign-in")]
    SignIn {},
    #[route("/admin")]
    Admin {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
pub fn App() -> Element {
    rsx! {
        document::Title { "Atelier · Software Studio" }
        document::Stylesheet { href: MAIN_CSS }
        Router::<Route> {}
    }
}

/// Shared frame around every route: choreography surfaces, chrome and the
/// scroll host the pages render into.
///
/// When the smooth engine owns scrolling the host translates by the eased
/// offset and the document itself stays clipped; otherwise the transform
/// is absent and the browser scrolls natively.
#[component]
fn Shell() -> Element {
    let motion = use_motion_root();

    let route = use_route::<Route>();
    use_effect(use_reactive!(|route| {
        let _ = route;
        motion.route_changed();
    }));

    let offset = motion.frame().map_or(0.0, |frame| frame.scroll.position);
    let content_style = if motion.is_smooth() {
        format!("transform:translate3d(0,{:.2}px,0)", -offset)
    } else {
        String::new()
    };

    rsx! {
        Backdrop {}
        IntroOverlay {}
        Navbar {}
        main { id: "site-scroll", class: "site-scroll", style: "{content_style}",
            Outlet::<Route> {}
            Footer {}
        }
        DebugBadge {}
    }
}
