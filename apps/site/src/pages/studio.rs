//! Secondary content pages, thin compositions over the shared sections.

use dioxus::prelude::*;

use crate::app::Route;
use crate::ui::sections::{FinalCta, PageIntro, ProcessSection, SelectedWork, ServicesGrid};

#[component]
pub fn Services() -> Element {
    rsx! {
        PageIntro {
            title: "Services",
            lede: "Websites, web apps, automation and full product builds, scoped to \
                   what your business actually needs.",
        }
        ServicesGrid {}
        FinalCta {}
    }
}

#[component]
pub fn Work() -> Element {
    rsx! {
        PageIntro {
            title: "Work",
            lede: "A sample of the systems we have shipped for clients across web, \
                   automation and healthcare.",
        }
        SelectedWork {}
        FinalCta {}
    }
}

#[component]
pub fn Process() -> Element {
    rsx! {
        PageIntro {
            title: "Process",
            lede: "Five steps from first call to launch and beyond, with weekly demos \
                   the whole way.",
        }
        ProcessSection {}
        FinalCta {}
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        section { class: "section not-found",
            h1 { "404" }
            p { "There's no page at /{path}." }
            Link { class: "button primary", to: Route::Home {}, "Back to the studio" }
        }
    }
}
