//! Content sections, composed by the pages from the shared catalog.

use atelier::domain::content::{FAQ_ITEMS, HERO, PROCESS_STEPS, PROJECTS, SERVICES};
use dioxus::prelude::*;

use crate::app::Route;
use crate::ui::reveal::RevealSection;

/// Eyebrow plus headline, optionally with a lede paragraph.
#[component]
pub fn SectionHeading(
    eyebrow: &'static str,
    title: &'static str,
    #[props(default)] lede: Option<&'static str>,
) -> Element {
    rsx! {
        RevealSection { class: "section-heading",
            p { class: "eyebrow", "{eyebrow}" }
            h2 { "{title}" }
            if let Some(lede) = lede {
                p { class: "lede", "{lede}" }
            }
        }
    }
}

/// Landing hero. Everything here is above the fold, so the reveals run
/// in `immediate` mode and never start hidden.
#[component]
pub fn HeroSection() -> Element {
    rsx! {
        section { class: "hero",
            RevealSection { immediate: true,
                h1 { class: "hero-headline",
                    "{HERO.headline} "
                    span { class: "hero-accent", "{HERO.headline_accent}" }
                }
            }
            RevealSection { index: 1, immediate: true,
                p { class: "hero-subhead", "{HERO.subhead}" }
            }
            RevealSection { index: 2, immediate: true,
                div { class: "hero-actions",
                    span { "data-attract": "",
                        Link { class: "button primary", to: Route::Quote {}, "{HERO.primary_cta.label}" }
                    }
                    a {
                        class: "button ghost",
                        href: "{HERO.secondary_cta.href}",
                        target: "_blank",
                        rel: "noopener noreferrer",
                        "{HERO.secondary_cta.label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn ServicesGrid() -> Element {
    rsx! {
        section { class: "section services", id: "services",
            SectionHeading { eyebrow: "What We Build", title: "Four ways to work together." }
            div { class: "services-grid",
                for (index, service) in SERVICES.iter().enumerate() {
                    RevealSection { key: "{service.key}", index, class: "service-card",
                        div { class: "card-body", id: "{service.key}", "data-attract": "",
                            header { class: "service-head",
                                span { class: "service-glyph", "{service.glyph}" }
                                span { class: "service-grade", "{service.grade}" }
                            }
                            h3 { "{service.title}" }
                            p { "{service.description}" }
                            ul { class: "service-features",
                                for feature in service.features {
                                    li { "{feature}" }
                                }
                            }
                            span { class: "service-pricing", "{service.pricing}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SelectedWork() -> Element {
    rsx! {
        section { class: "section work",
            SectionHeading {
                eyebrow: "Selected Work",
                title: "Sample builds from our studio.",
                lede: "Representative examples of the systems we build. Each project is \
                       custom; these showcase our approach and capabilities.",
            }
            div { class: "work-grid",
                for (index, project) in PROJECTS.iter().enumerate() {
                    RevealSection { key: "{project.title}", index, class: "work-card",
                        article { "data-attract": "",
                            span { class: "work-category", "{project.category}" }
                            h3 { "{project.title}" }
                            p { "{project.description}" }
                            div { class: "work-tags",
                                for tag in project.tags {
                                    span { class: "tag", "{tag}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ProcessSection() -> Element {
    rsx! {
        section { class: "section process",
            SectionHeading {
                eyebrow: "Our Process",
                title: "How we work together.",
                lede: "A clear, predictable process that keeps you informed and in control.",
            }
            ol { class: "process-steps",
                for (index, step) in PROCESS_STEPS.iter().enumerate() {
                    RevealSection { key: "{step.number}", index, class: "process-step",
                        li {
                            span { class: "step-number", "{step.number}" }
                            div { class: "step-body",
                                h3 { "{step.title}" }
                                p { "{step.description}" }
                                ul { class: "step-bullets",
                                    for bullet in step.bullets {
                                        li { "{bullet}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FaqSection() -> Element {
    let mut open = use_signal(|| None::<usize>);

    rsx! {
        section { class: "section faq",
            SectionHeading { eyebrow: "FAQ", title: "Common questions." }
            div { class: "faq-list",
                for (index, item) in FAQ_ITEMS.iter().enumerate() {
                    RevealSection { key: "{item.key}", index, class: "faq-item",
                        button {
                            class: "faq-question",
                            "aria-expanded": open() == Some(index),
                            onclick: move |_| {
                                let next = if open() == Some(index) { None } else { Some(index) };
                                open.set(next);
                            },
                            span { "{item.question}" }
                            span { class: "faq-marker",
                                if open() == Some(index) { "−" } else { "+" }
                            }
                        }
                        if open() == Some(index) {
                            p { class: "faq-answer", "{item.answer}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FinalCta() -> Element {
    rsx! {
        section { class: "section final-cta",
            RevealSection {
                h2 { "Ready to build something?" }
            }
            RevealSection { index: 1,
                p { class: "lede",
                    "Tell us about your project. We'll get back to you within 24 hours \
                     with next steps."
                }
            }
            RevealSection { index: 2,
                div { class: "hero-actions",
                    span { "data-attract": "",
                        Link { class: "button primary", to: Route::Quote {}, "{HERO.primary_cta.label}" }
                    }
                    a {
                        class: "button ghost",
                        href: "{HERO.secondary_cta.href}",
                        target: "_blank",
                        rel: "noopener noreferrer",
                        "{HERO.secondary_cta.label}"
                    }
                }
            }
        }
    }
}

/// Heading block for the secondary pages, one step down from the hero.
#[component]
pub fn PageIntro(title: &'static str, lede: &'static str) -> Element {
    rsx! {
        header { class: "page-intro",
            RevealSection { immediate: true,
                h1 { "{title}" }
            }
            RevealSection { index: 1, immediate: true,
                p { class: "lede", "{lede}" }
            }
        }
    }
}
