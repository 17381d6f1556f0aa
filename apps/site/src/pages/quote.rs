//! Quote request page: the public lead-capture form.
//!
//! Validation runs twice on purpose: once here, so most mistakes never
//! leave the page, and again server-side, whose 422 field messages merge
//! into the same error map when something slips through.

use atelier::features::leads::model::{BudgetRange, Lead, ProjectType, QuoteSubmission, Timeline};
use atelier::features::leads::validation::{self, FieldErrors};
use dioxus::prelude::*;

use crate::api::use_api;
use crate::ui::reveal::RevealSection;

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Editing,
    Sending,
    Done(Lead),
}

#[component]
pub fn Quote() -> Element {
    let api = use_api();
    let mut form = use_signal(QuoteSubmission::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut phase = use_signal(|| Phase::Editing);
    let mut failure = use_signal(|| None::<String>);

    let submit = move |_: FormEvent| async move {
        let submission = form.peek().clone();
        match validation::validate(&submission) {
            Ok(_) => errors.write().clear(),
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        }

        let Some(client) = api.peek().clone() else {
            return;
        };
        phase.set(Phase::Sending);
        failure.set(None);
        match client.submit_quote(&submission).await {
            Ok(lead) => phase.set(Phase::Done(lead)),
            Err(err) => {
                if let Some(fields) = err.field_errors() {
                    errors.set(fields.clone());
                } else {
                    failure.set(Some(err.to_string()));
                }
                phase.set(Phase::Editing);
            }
        }
    };

    if let Phase::Done(lead) = phase() {
        return rsx! {
            section { class: "section quote",
                div { class: "quote-done",
                    span { class: "done-mark", "✓" }
                    h2 { "Thanks for reaching out!" }
                    p {
                        "We've received your project details and will get back to \
                         {lead.email} within 24 hours."
                    }
                }
            }
        };
    }

    let sending = phase() == Phase::Sending;
    let error_of = move |key: &str| errors.read().get(key).cloned();
    let current = form.read();

    rsx! {
        section { class: "section quote",
            header { class: "page-intro",
                RevealSection { immediate: true,
                    p { class: "eyebrow", "Get a Quote" }
                    h1 { "Tell us about your project." }
                }
                RevealSection { index: 1, immediate: true,
                    p { class: "lede",
                        "Fill out the form below and we'll get back to you within 24 \
                         hours with next steps and a preliminary estimate."
                    }
                }
            }

            RevealSection { index: 2, class: "quote-form-host",
                form { class: "quote-form", onsubmit: submit,
                    h2 { class: "form-group-title", "Contact Information" }
                    div { class: "form-grid",
                        Field { label: "Name", error: error_of("name"),
                            input {
                                r#type: "text",
                                name: "name",
                                autocomplete: "name",
                                placeholder: "Jane Smith",
                                value: "{current.name}",
                                oninput: move |event| form.write().name = event.value(),
                            }
                        }
                        Field { label: "Company", hint: "(optional)",
                            input {
                                r#type: "text",
                                name: "company",
                                autocomplete: "organization",
                                placeholder: "Acme Inc.",
                                value: "{current.company}",
                                oninput: move |event| form.write().company = event.value(),
                            }
                        }
                        Field { label: "Email", error: error_of("email"),
                            input {
                                r#type: "email",
                                name: "email",
                                autocomplete: "email",
                                placeholder: "jane@acme.com",
                                value: "{current.email}",
                                oninput: move |event| form.write().email = event.value(),
                            }
                        }
                        Field { label: "Phone", hint: "(optional)", error: error_of("phone"),
                            input {
                                r#type: "tel",
                                name: "phone",
                                autocomplete: "tel",
                                placeholder: "+1 555 0100",
                                value: "{current.phone}",
                                oninput: move |event| form.write().phone = event.value(),
                            }
                        }
                    }

                    h2 { class: "form-group-title", "Project Details" }
                    div { class: "form-grid",
                        Field { label: "Project type", error: error_of("projectType"),
                            select {
                                name: "project_type",
                                value: "{current.project_type}",
                                onchange: move |event| form.write().project_type = event.value(),
                                option { value: "", disabled: true,
                                    selected: current.project_type.is_empty(),
                                    "Select a project type"
                                }
                                for kind in ProjectType::ALL {
                                    option { value: kind.as_str(), "{kind.label()}" }
                                }
                            }
                        }
                        Field { label: "Budget range", error: error_of("budgetRange"),
                            select {
                                name: "budget_range",
                                value: "{current.budget_range}",
                                onchange: move |event| form.write().budget_range = event.value(),
                                option { value: "", disabled: true,
                                    selected: current.budget_range.is_empty(),
                                    "Select a budget range"
                                }
                                for range in BudgetRange::ALL {
                                    option { value: range.as_str(), "{range.label()}" }
                                }
                            }
                        }
                        Field { label: "Timeline", error: error_of("timeline"),
                            select {
                                name: "timeline",
                                value: "{current.timeline}",
                                onchange: move |event| form.write().timeline = event.value(),
                                option { value: "", disabled: true,
                                    selected: current.timeline.is_empty(),
                                    "Select a timeline"
                                }
                                for timeline in Timeline::ALL {
                                    option { value: timeline.as_str(), "{timeline.label()}" }
                                }
                            }
                        }
                    }

                    Field { label: "Tell us more about your project", hint: "(optional)",
                        textarea {
                            name: "message",
                            rows: 5,
                            placeholder: "Goals, current tools, rough scope. Anything helps.",
                            value: "{current.message}",
                            oninput: move |event| form.write().message = event.value(),
                        }
                    }

                    if let Some(message) = failure() {
                        p { class: "form-failure", "{message}" }
                    }

                    span { class: "submit-slot", "data-attract": "",
                        button {
                            class: "button primary",
                            r#type: "submit",
                            disabled: sending,
                            if sending { "Sending..." } else { "Submit Request" }
                        }
                    }
                }
            }
        }
    }
}

/// Label, control and the field's validation message, if any.
#[component]
fn Field(
    label: &'static str,
    #[props(default)] hint: Option<&'static str>,
    #[props(default)] error: Option<String>,
    children: Element,
) -> Element {
    let class = if error.is_some() { "field invalid" } else { "field" };

    rsx! {
        label { class: "{class}",
            span { class: "field-label",
                "{label}"
                if let Some(hint) = hint {
                    span { class: "field-hint", " {hint}" }
                }
            }
            {children}
            if let Some(message) = error {
                span { class: "field-error", "{message}" }
            }
        }
    }
}
