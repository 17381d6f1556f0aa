use atelier::kernel::prelude::ApiState;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
struct ApiDoc;

/// Assembles the process-wide router: feature slice APIs under `/api`,
/// Scalar reference docs at `/api/docs`, and the site bundle for
/// everything else.
#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let static_dir = state.config.storage.static_dir.clone();

    // split_for_parts hands back the plain routes plus the OpenAPI document
    // the handlers contributed to.
    let (api_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(atelier::server::router::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let reference = Scalar::with_url("/api/docs", api_doc);

    // Unknown paths fall through to index.html so client-side routes
    // (e.g. /admin) survive a hard refresh.
    let site = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new().merge(api_routes).merge(reference).fallback_service(site)
}
