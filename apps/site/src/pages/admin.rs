//! Admin surfaces: staff sign-in and the lead pipeline dashboard.
//!
//! Both pages are route-reachable without a session; the pipeline simply
//! bounces back to sign-in when the API answers 401, so an expired token
//! never strands a stale dashboard on screen.

use atelier::features::leads::display::relative_time;
use atelier::features::leads::model::{Lead, LeadStats, LeadStatus};
use chrono::Utc;
use dioxus::prelude::*;
use tracing::warn;

use crate::api::{ApiClient, use_api};
use crate::app::Route;
use crate::error::SiteError;

/// Staff sign-in form at `/admin/sign-in`.
#[component]
pub fn SignIn() -> Element {
    let api = use_api();
    let nav = navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut failure = use_signal(|| None::<String>);

    // A live session skips the form entirely.
    use_effect(move || {
        if api.read().as_ref().is_some_and(ApiClient::has_session) {
            nav.replace(Route::Admin {});
        }
    });

    let submit = move |_: FormEvent| async move {
        let Some(client) = api.peek().clone() else {
            return;
        };
        let email_value = email.peek().trim().to_owned();
        let password_value = password.peek().clone();
        if email_value.is_empty() || password_value.is_empty() {
            failure.set(Some("Email and password are required.".to_owned()));
            return;
        }

        busy.set(true);
        failure.set(None);
        match client.sign_in(&email_value, &password_value).await {
            Ok(_) => {
                nav.replace(Route::Admin {});
            }
            Err(err) => {
                failure.set(Some(err.to_string()));
                busy.set(false);
            }
        }
    };

    rsx! {
        section { class: "section admin-auth",
            div { class: "auth-card",
                h1 { "Staff Sign In" }
                p { class: "lede", "Pipeline access for the studio team." }
                if let Some(message) = failure() {
                    p { class: "form-failure", "{message}" }
                }
                form { onsubmit: submit,
                    label { class: "field",
                        span { class: "field-label", "Email" }
                        input {
                            r#type: "email",
                            name: "email",
                            autocomplete: "email",
                            value: "{email}",
                            oninput: move |event| email.set(event.value()),
                        }
                    }
                    label { class: "field",
                        span { class: "field-label", "Password" }
                        input {
                            r#type: "password",
                            name: "password",
                            autocomplete: "current-password",
                            value: "{password}",
                            oninput: move |event| password.set(event.value()),
                        }
                    }
                    button {
                        class: "button primary",
                        r#type: "submit",
                        disabled: busy(),
                        if busy() { "Signing in..." } else { "Sign In" }
                    }
                }
            }
        }
    }
}

/// Lead pipeline dashboard at `/admin`.
#[component]
pub fn Admin() -> Element {
    let api = use_api();
    let nav = navigator();
    let mut filter = use_signal(|| None::<LeadStatus>);
    let mut refresh = use_signal(|| 0u32);

    let pipeline = use_resource(move || {
        let client = api();
        let status = filter();
        let _generation = refresh();
        async move {
            let client = client?;
            Some(load_pipeline(&client, status).await)
        }
    });

    // Any 401 means the token is gone server-side: drop the local copy
    // and return to the form.
    use_effect(move || {
        let unauthorized =
            matches!(&*pipeline.read(), Some(Some(Err(err))) if err.is_unauthorized());
        if unauthorized {
            if let Some(client) = &*api.peek() {
                client.drop_session();
            }
            nav.replace(Route::SignIn {});
        }
    });

    let sign_out = move |_| async move {
        let client = api.peek().clone();
        if let Some(client) = client {
            if let Err(err) = client.sign_out().await {
                warn!(%err, "Sign-out request failed; dropping session anyway");
            }
        }
        nav.replace(Route::SignIn {});
    };

    let body = match &*pipeline.read() {
        Some(Some(Ok((leads, stats)))) => rsx! {
            div { class: "stat-grid",
                StatCard { label: "Total", value: stats.total, accent: "violet" }
                for status in LeadStatus::ALL.iter().copied() {
                    StatCard {
                        label: status.label(),
                        value: stats.of(status),
                        accent: status.accent(),
                    }
                }
            }
            div { class: "pipeline-filters",
                button {
                    class: if filter().is_none() { "filter active" } else { "filter" },
                    onclick: move |_| filter.set(None),
                    "All"
                }
                for status in LeadStatus::ALL.iter().copied() {
                    button {
                        key: "{status}",
                        class: if filter() == Some(status) { "filter active" } else { "filter" },
                        onclick: move |_| filter.set(Some(status)),
                        {status.label()}
                    }
                }
            }
            if leads.is_empty() {
                p { class: "pipeline-empty",
                    if filter().is_none() {
                        "No quote requests yet."
                    } else {
                        "No leads in this stage."
                    }
                }
            } else {
                div { class: "lead-list",
                    for lead in leads.iter().cloned() {
                        LeadRow { key: "{lead.id}", lead, refresh }
                    }
                }
            }
        },
        Some(Some(Err(err))) => rsx! {
            div { class: "pipeline-failure",
                p { "{err}" }
                button { class: "button ghost", onclick: move |_| refresh += 1, "Retry" }
            }
        },
        _ => rsx! {
            p { class: "pipeline-loading", "Loading pipeline..." }
        },
    };

    rsx! {
        section { class: "section admin",
            header { class: "admin-head",
                div {
                    h1 { "Lead Pipeline" }
                    p { class: "lede", "Quote requests, newest first." }
                }
                button { class: "button ghost", onclick: sign_out, "Sign Out" }
            }
            {body}
        }
    }
}

/// Both dashboard queries, sequenced; the first failure wins.
async fn load_pipeline(
    client: &ApiClient,
    status: Option<LeadStatus>,
) -> Result<(Vec<Lead>, LeadStats), SiteError> {
    let leads = client.list_leads(status).await?;
    let stats = client.lead_stats().await?;
    Ok((leads, stats))
}

#[component]
fn StatCard(label: &'static str, value: u64, accent: &'static str) -> Element {
    rsx! {
        div { class: "stat-card accent-{accent}",
            span { class: "stat-value", "{value}" }
            span { class: "stat-label", "{label}" }
        }
    }
}

/// One stored lead, with an inline stage selector.
#[component]
fn LeadRow(lead: Lead, mut refresh: Signal<u32>) -> Element {
    let api = use_api();
    let mut busy = use_signal(|| false);

    let row_id = lead.id.clone();
    let change_status = move |event: FormEvent| {
        let Ok(status) = event.value().parse::<LeadStatus>() else {
            return;
        };
        let id = row_id.clone();
        spawn(async move {
            let Some(client) = api.peek().clone() else {
                return;
            };
            busy.set(true);
            match client.update_lead_status(&id, status).await {
                Ok(_) => refresh += 1,
                Err(err) => warn!(%err, lead = %id, "Status update failed"),
            }
            busy.set(false);
        });
    };

    let submitted = relative_time(&lead.created_at, Utc::now());
    let accent = lead.status.accent();

    rsx! {
        article { class: "lead-row accent-{accent}",
            header { class: "lead-head",
                div {
                    h3 { class: "lead-name", "{lead.name}" }
                    if let Some(company) = &lead.company {
                        span { class: "lead-company", "{company}" }
                    }
                }
                span { class: "lead-when", "{submitted}" }
            }
            dl { class: "lead-facts",
                div {
                    dt { "Email" }
                    dd {
                        a { href: "mailto:{lead.email}", "{lead.email}" }
                    }
                }
                if let Some(phone) = &lead.phone {
                    div {
                        dt { "Phone" }
                        dd { "{phone}" }
                    }
                }
                div {
                    dt { "Project" }
                    dd { {lead.project_type.label()} }
                }
                div {
                    dt { "Budget" }
                    dd { {lead.budget_range.label()} }
                }
                div {
                    dt { "Timeline" }
                    dd { {lead.timeline.label()} }
                }
            }
            if let Some(message) = &lead.message {
                p { class: "lead-message", "{message}" }
            }
            footer { class: "lead-foot",
                label { class: "lead-status",
                    span { "Stage" }
                    select {
                        disabled: busy(),
                        onchange: change_status,
                        for status in LeadStatus::ALL.iter().copied() {
                            option {
                                key: "{status}",
                                value: status.as_str(),
                                selected: lead.status == status,
                                {status.label()}
                            }
                        }
                    }
                }
            }
        }
    }
}
