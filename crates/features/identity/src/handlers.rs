//! HTTP surface of the identity slice.
//!
//! A credential mismatch and an unknown email answer with the same 401
//! body, so the endpoint cannot be used to probe which staff emails exist.

use atelier_database::Database;
use atelier_derive::api_handler;
use atelier_domain::config::ApiConfig;
use atelier_domain::constants::AUTH_TAG;
use atelier_kernel::server::auth::{SessionRevocations, encode_session};
use atelier_kernel::server::{Problem, RequireSession, SessionClaims};
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use tracing::{error, info, warn};

use crate::credentials;
use crate::error::IdentityError;
use crate::model::{SessionResponse, SignInRequest, StaffUser};
use crate::repository::UserRepository;

impl From<IdentityError> for Problem {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Credentials { .. } => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            error => {
                error!(%error, "Identity failure");
                Self::internal()
            }
        }
    }
}

#[api_handler(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = OK, description = "Session token and account", body = SessionResponse),
        (status = UNAUTHORIZED, description = "Unknown email or wrong password", body = Problem),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn sign_in_handler(
    State(db): State<Database>,
    State(config): State<ApiConfig>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, Problem> {
    let email = request.email.trim().to_lowercase();

    let row = UserRepository::new(db).find_by_email(&email).await?;
    let Some(row) = row else {
        warn!(%email, "Sign-in attempt for unknown email");
        return Err(IdentityError::Credentials { message: email.into(), context: None }.into());
    };

    if !credentials::verify_password(&request.password, &row.salt, &row.password_hash)? {
        warn!(%email, "Sign-in attempt with wrong password");
        return Err(IdentityError::Credentials { message: email.into(), context: None }.into());
    }

    let user = row.into_user();
    let jwt = &config.security.identity.jwt;
    let claims = SessionClaims::issue(jwt, &user.id, &user.email);
    let token = encode_session(jwt, &claims).map_err(|source| IdentityError::Token {
        source,
        context: Some("Signing session token".into()),
    })?;

    info!(id = %user.id, "Staff signed in");
    Ok(Json(SessionResponse { token, user }))
}

#[api_handler(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = NO_CONTENT, description = "Session revoked"),
        (status = UNAUTHORIZED, description = "Missing or invalid session", body = Problem),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn sign_out_handler(
    session: RequireSession,
    State(revocations): State<SessionRevocations>,
) -> impl IntoResponse {
    revocations.revoke(session.token);
    info!(id = %session.user_id, "Staff signed out");
    StatusCode::NO_CONTENT
}

#[api_handler(
    get,
    path = "/api/auth/me",
    responses(
        (status = OK, description = "Signed-in account", body = StaffUser),
        (status = UNAUTHORIZED, description = "Missing or invalid session", body = Problem),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn me_handler(
    session: RequireSession,
    State(db): State<Database>,
) -> Result<Json<StaffUser>, Problem> {
    let row = UserRepository::new(db).find_by_id(&session.user_id).await?;
    // A token outliving its account is treated like no token at all.
    row.map(|row| Json(row.into_user()))
        .ok_or_else(|| Problem::new(StatusCode::UNAUTHORIZED, "Invalid or expired session"))
}
