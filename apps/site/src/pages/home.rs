//! Landing page: the full section stack, top to bottom.

use dioxus::prelude::*;

use crate::ui::sections::{
    FaqSection, FinalCta, HeroSection, ProcessSection, SelectedWork, ServicesGrid,
};

#[component]
pub fn Home() -> Element {
    rsx! {
        HeroSection {}
        ServicesGrid {}
        SelectedWork {}
        ProcessSection {}
        FaqSection {}
        FinalCta {}
    }
}
