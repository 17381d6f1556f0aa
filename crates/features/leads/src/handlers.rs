//! HTTP surface of the lead pipeline.
//!
//! Quote submission is public; everything else sits behind
//! [`RequireSession`] and answers 401 until the admin signs in.

use atelier_database::Database;
use atelier_derive::api_handler;
use atelier_domain::constants::LEADS_TAG;
use atelier_event_bus::EventBus;
use atelier_kernel::server::{Problem, RequireSession};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use serde::Deserialize;
use tracing::{error, info};

use crate::model::{Lead, LeadStats, LeadStatus, LeadStatusUpdate, QuoteSubmission};
use crate::repository::LeadRepository;
use crate::{events, validation};

impl From<crate::error::LeadsError> for Problem {
    fn from(error: crate::error::LeadsError) -> Self {
        match error {
            crate::error::LeadsError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "No such lead")
            }
            error => {
                error!(%error, "Lead pipeline failure");
                Self::internal()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    status: Option<LeadStatus>,
}

#[api_handler(
    post,
    path = "/api/leads",
    request_body = QuoteSubmission,
    responses(
        (status = CREATED, description = "Stored lead", body = Lead),
        (status = UNPROCESSABLE_ENTITY, description = "Per-field validation messages", body = Problem),
    ),
    tag = LEADS_TAG,
)]
pub(crate) async fn submit_quote_handler(
    State(db): State<Database>,
    State(bus): State<EventBus>,
    Json(submission): Json<QuoteSubmission>,
) -> Result<impl IntoResponse, Problem> {
    let quote = validation::validate(&submission).map_err(Problem::unprocessable)?;

    let lead = LeadRepository::new(db).create(quote).await?;
    info!(id = %lead.id, project_type = lead.project_type.as_str(), "Quote submitted");

    events::announce(&bus, lead.clone());
    Ok((StatusCode::CREATED, Json(lead)))
}

#[api_handler(
    get,
    path = "/api/leads",
    params(("status" = Option<String>, Query, description = "Narrow to one pipeline stage")),
    responses(
        (status = OK, description = "Leads, newest first", body = [Lead]),
        (status = UNAUTHORIZED, description = "Missing or invalid session", body = Problem),
    ),
    tag = LEADS_TAG,
)]
pub(crate) async fn list_leads_handler(
    _session: RequireSession,
    State(db): State<Database>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Lead>>, Problem> {
    let leads = LeadRepository::new(db).list(params.status).await?;
    Ok(Json(leads))
}

#[api_handler(
    get,
    path = "/api/leads/stats",
    responses(
        (status = OK, description = "Pipeline counters", body = LeadStats),
        (status = UNAUTHORIZED, description = "Missing or invalid session", body = Problem),
    ),
    tag = LEADS_TAG,
)]
pub(crate) async fn lead_stats_handler(
    _session: RequireSession,
    State(db): State<Database>,
) -> Result<Json<LeadStats>, Problem> {
    let stats = LeadRepository::new(db).stats().await?;
    Ok(Json(stats))
}

#[api_handler(
    patch,
    path = "/api/leads/{id}",
    request_body = LeadStatusUpdate,
    responses(
        (status = OK, description = "Updated lead", body = Lead),
        (status = NOT_FOUND, description = "Unknown lead id", body = Problem),
        (status = UNAUTHORIZED, description = "Missing or invalid session", body = Problem),
    ),
    tag = LEADS_TAG,
)]
pub(crate) async fn update_lead_status_handler(
    _session: RequireSession,
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(update): Json<LeadStatusUpdate>,
) -> Result<Json<Lead>, Problem> {
    let lead = LeadRepository::new(db).update_status(&id, update.status).await?;
    info!(%id, status = lead.status.as_str(), "Lead moved");
    Ok(Json(lead))
}
