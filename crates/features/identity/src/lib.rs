//! # Identity
//!
//! Vertical slice for staff access: sign-in against the seeded `user`
//! table, stateless session tokens, sign-out by revocation, and the
//! `me` endpoint the admin shell hydrates from.
//!
//! Token issue/verify lives in `atelier_kernel::server::auth` so any
//! slice can guard a route with `RequireSession`; this crate owns the
//! accounts themselves and the credential derivation.

#[cfg(feature = "server")]
pub mod credentials;
mod error;
#[cfg(feature = "server")]
mod handlers;
pub mod model;
#[cfg(feature = "server")]
pub mod repository;

pub use crate::error::{IdentityError, IdentityErrorExt};

/// Identity feature state shared with the API process.
#[cfg(feature = "server")]
#[atelier_derive::atelier_slice]
pub struct Identity {
    pub repository: repository::UserRepository,
}

/// Boots the slice: seeds the first staff account from [`AdminSeedConfig`]
/// when the `user` table is empty and captures a repository handle for
/// non-HTTP callers.
///
/// [`AdminSeedConfig`]: atelier_domain::config::AdminSeedConfig
///
/// # Errors
/// Returns [`IdentityError::Storage`] if the seed probe or insert fails.
#[cfg(feature = "server")]
pub async fn init(
    config: &atelier_domain::config::ApiConfig,
    db: &atelier_database::Database,
) -> Result<atelier_kernel::domain::registry::InitializedSlice, IdentityError> {
    let repository = repository::UserRepository::new(db.clone());
    repository.seed_admin(&config.security.identity.admin).await?;

    tracing::info!("Identity server slice initialized");

    let inner = IdentityInner { repository };

    let slice = Identity::new(inner);

    Ok(atelier_kernel::domain::registry::InitializedSlice::new(slice))
}

/// Routes of this slice, ready to merge into the API router.
#[cfg(feature = "server")]
pub fn router() -> utoipa_axum::router::OpenApiRouter<atelier_kernel::server::ApiState> {
    use utoipa_axum::routes;

    utoipa_axum::router::OpenApiRouter::new()
        .routes(routes!(handlers::sign_in_handler))
        .routes(routes!(handlers::sign_out_handler))
        .routes(routes!(handlers::me_handler))
}
