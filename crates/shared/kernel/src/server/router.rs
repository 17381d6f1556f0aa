//! System routes every deployment gets, independent of enabled slices.

use super::state::ApiState;
use super::{content, health};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Mounts the system surface: liveness at `/api/system/health` and the
/// compiled content catalog at `/api/content`.
pub fn system_router() -> OpenApiRouter<ApiState> {
    health::mark_boot();

    OpenApiRouter::new()
        .routes(routes!(health::health_handler))
        .routes(routes!(content::content_handler))
}
