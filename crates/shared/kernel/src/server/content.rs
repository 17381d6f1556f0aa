use atelier_derive::api_handler;
use atelier_domain::constants::CONTENT_TAG;
use atelier_domain::content;
use axum::http::header;
use axum::{Json, response::IntoResponse};

// The catalog is compiled in, so clients may cache it aggressively.
#[api_handler(
    get,
    path = "/api/content",
    responses((status = OK, description = "Typed site content catalog")),
    tag = CONTENT_TAG,
)]
pub(super) async fn content_handler() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "public, max-age=3600")], Json(content::catalog()))
}
