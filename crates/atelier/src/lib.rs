//! The `atelier` facade: one dependency that pulls the studio together.
//!
//! The site bundle and the server both depend on this crate rather than on
//! individual slice crates, so wiring changes land in exactly one place.
//! Domain and kernel re-exports keep import paths short, [`init`] boots the
//! slices the config switches on, and [`server::router::api_router`] is the
//! entire HTTP surface.

pub use atelier_domain as domain;
pub use atelier_kernel as kernel;

#[cfg(feature = "server")]
use atelier_database::Database;
#[cfg(feature = "server")]
use atelier_domain::config::ApiConfig;
#[cfg(feature = "server")]
use atelier_event_bus::EventBus;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        use atelier_kernel::server::ApiState;
        use utoipa_axum::router::OpenApiRouter;

        /// Every API route of the platform: system + content endpoints
        /// plus each slice's sub-router.
        pub fn api_router() -> OpenApiRouter<ApiState> {
            atelier_kernel::server::router::system_router()
                .merge(atelier_leads::router())
                .merge(atelier_identity::router())
        }
    }
}

/// The slice crates under one roof; the site imports through here.
pub mod features {
    pub use atelier_identity as identity;
    pub use atelier_leads as leads;
    pub use atelier_motion as motion;
}

/// Boots every slice the `features` config switch names.
///
/// A switched-off slice is skipped entirely: its routes still mount but
/// answer without state.
///
/// # Errors
/// Fails when a slice cannot come up, e.g. the staff seed insert is
/// refused or an event channel is registered twice with different types.
#[cfg(feature = "server")]
pub async fn init(
    config: &ApiConfig,
    database: &Database,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    use atelier_domain::features::FeatureSet;

    let enabled = config.features;
    let mut slices = Vec::new();

    if enabled.contains(FeatureSet::MOTION) {
        slices.push(features::motion::init(config, events)?);
    }

    if enabled.contains(FeatureSet::LEADS) {
        slices.push(features::leads::init(database, events)?);
    }

    if enabled.contains(FeatureSet::IDENTITY) {
        slices.push(features::identity::init(config, database).await?);
    }

    Ok(slices)
}
