use super::state::ApiState;
use atelier_derive::{api_handler, api_model};
use atelier_domain::constants::SYSTEM_TAG;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use std::borrow::Cow;
use std::sync::LazyLock;
use std::time::Instant;

/// Uptime baseline. [`mark_boot`] pins it when the router is assembled so
/// the first probe does not report zero.
static BOOTED_AT: LazyLock<Instant> = LazyLock::new(Instant::now);

pub(super) fn mark_boot() {
    LazyLock::force(&BOOTED_AT);
}

#[api_model]
/// Liveness report for load balancers and uptime monitors.
struct HealthResponse {
    /// Always `up` while the process answers.
    status: Cow<'static, str>,
    /// Version of the kernel crate serving the request.
    version: Cow<'static, str>,
    /// Seconds since the router was assembled.
    uptime: u64,
    /// Number of registered feature slices.
    slices: usize,
}

#[api_handler(
    get,
    path = "/api/system/health",
    responses((status = OK, description = "Liveness and slice registry report", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime: BOOTED_AT.elapsed().as_secs(),
        slices: state.slice_ids().count(),
    };

    // Monitors must always see a fresh reading.
    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
