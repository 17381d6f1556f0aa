//! # Lead Capture
//!
//! Vertical slice for the studio's quote pipeline: the public submission
//! endpoint, the admin pipeline API, validation shared with the browser
//! form, and the display helpers the dashboard renders with.
//!
//! The wire DTO ([`model::QuoteSubmission`]) carries select fields as raw
//! strings so that missing and out-of-catalog values both come back as
//! 422 field errors rather than body-level rejects; [`validation::validate`]
//! is the single gate that turns a submission into a typed record.

pub mod display;
mod error;
#[cfg(feature = "server")]
pub mod events;
#[cfg(feature = "server")]
mod handlers;
pub mod model;
#[cfg(feature = "server")]
pub mod repository;
pub mod validation;

pub use crate::error::{LeadsError, LeadsErrorExt};

/// Lead feature state shared with the API process.
#[cfg(feature = "server")]
#[atelier_derive::atelier_slice]
pub struct Leads {
    pub repository: repository::LeadRepository,
}

/// Initialize the leads feature.
///
/// Fixes the [`events::LeadSubmitted`] broadcast channel kind before any
/// client races it and captures a repository handle for non-HTTP callers.
///
/// # Errors
/// Returns [`LeadsError::Bus`] if the broadcast channel already exists
/// with a different kind.
#[cfg(feature = "server")]
pub fn init(
    db: &atelier_database::Database,
    bus: &atelier_event_bus::EventBus,
) -> Result<atelier_kernel::domain::registry::InitializedSlice, LeadsError> {
    events::register(bus)?;

    tracing::info!("Leads server slice initialized");

    let inner = LeadsInner { repository: repository::LeadRepository::new(db.clone()) };

    let slice = Leads::new(inner);

    Ok(atelier_kernel::domain::registry::InitializedSlice::new(slice))
}

/// Routes of this slice, ready to merge into the API router.
#[cfg(feature = "server")]
pub fn router() -> utoipa_axum::router::OpenApiRouter<atelier_kernel::server::ApiState> {
    use utoipa_axum::routes;

    utoipa_axum::router::OpenApiRouter::new()
        .routes(routes!(handlers::submit_quote_handler, handlers::list_leads_handler))
        .routes(routes!(handlers::lead_stats_handler))
        .routes(routes!(handlers::update_lead_status_handler))
}
