//! Staff session tokens.
//!
//! Sessions are stateless HS256 JWTs. The identity slice issues them on
//! sign-in; [`RequireSession`] guards admin endpoints anywhere in the API.

use super::problem::Problem;
use atelier_domain::config::{ApiConfig, IdentityConfig, JwtConfig};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims carried by a staff session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Builds claims for a freshly signed-in user, stamped with the
    /// configured issuer, audience, and TTL.
    #[must_use]
    pub fn issue(jwt: &JwtConfig, user_id: &str, email: &str) -> Self {
        let now = jsonwebtoken::get_current_timestamp().cast_signed();
        Self {
            sub: user_id.to_owned(),
            email: email.to_owned(),
            iss: jwt.issuer.clone(),
            aud: jwt.audience.clone(),
            iat: now,
            exp: now + jwt.ttl_seconds.cast_signed(),
        }
    }
}

/// Signs the claims with the configured HS256 secret.
///
/// # Errors
/// Returns an error if claim serialization fails.
pub fn encode_session(
    jwt: &JwtConfig,
    claims: &SessionClaims,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(jwt.secret.as_bytes()))
}

fn session_validation(jwt: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&jwt.issuer]);
    validation.leeway = jwt.clock_skew_seconds;
    if let Some(audience) = &jwt.audience {
        validation.set_audience(&[audience]);
    } else {
        validation.validate_aud = false;
    }
    validation
}

/// Verifies a raw token string against the configured JWT parameters.
///
/// # Errors
/// Returns an error if the token is malformed, expired, or signed with a
/// different secret.
pub fn decode_session(
    jwt: &JwtConfig,
    token: &str,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &session_validation(jwt),
    )?;
    Ok(data.claims)
}

/// Tokens revoked by sign-out, held until they would have expired anyway.
///
/// Sessions are stateless, so sign-out works by remembering the token for
/// the rest of its validity window; the TTL keeps the cache from outliving
/// the tokens it blocks.
#[derive(Debug, Clone)]
pub struct SessionRevocations {
    cache: Cache<String, ()>,
}

impl SessionRevocations {
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self { cache: Cache::builder().max_capacity(capacity).time_to_live(ttl).build() }
    }

    /// Sizes the cache from the identity config: capacity from
    /// `session_cache_capacity`, TTL covering token lifetime plus skew.
    #[must_use]
    pub fn from_config(identity: &IdentityConfig) -> Self {
        let ttl = Duration::from_secs(identity.jwt.ttl_seconds + identity.jwt.clock_skew_seconds);
        Self::new(identity.session_cache_capacity, ttl)
    }

    pub fn revoke(&self, token: impl Into<String>) {
        self.cache.insert(token.into(), ());
    }

    #[must_use]
    pub fn is_revoked(&self, token: &str) -> bool {
        self.cache.contains_key(token)
    }
}

impl Default for SessionRevocations {
    fn default() -> Self {
        Self::from_config(&IdentityConfig::default())
    }
}

/// Extractor rejecting requests that lack a valid staff session token.
#[derive(Debug, Clone)]
pub struct RequireSession {
    pub user_id: String,
    pub email: String,
    /// Raw bearer token, kept so sign-out can revoke exactly this session.
    pub token: String,
}

impl<S> FromRequestParts<S> for RequireSession
where
    ApiConfig: FromRef<S>,
    SessionRevocations: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = ApiConfig::from_ref(state);
        let jwt = &config.security.identity.jwt;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| Problem::new(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

        let claims = decode_session(jwt, token)
            .map_err(|_| Problem::new(StatusCode::UNAUTHORIZED, "Invalid or expired session"))?;

        if SessionRevocations::from_ref(state).is_revoked(token) {
            return Err(Problem::new(StatusCode::UNAUTHORIZED, "Invalid or expired session"));
        }

        Ok(Self { user_id: claims.sub, email: claims.email, token: token.to_owned() })
    }
}
