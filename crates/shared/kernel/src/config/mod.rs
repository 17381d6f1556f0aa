//! Layered configuration loading.

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file stem, resolved against the working directory.
const DEFAULT_PATH: &str = "config/default";
/// Prefix for environment overrides.
const ENV_PREFIX: &str = "ATELIER";

#[atelier_derive::atelier_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from an optional file overlaid with environment variables.
///
/// The file (any format the `config` crate recognizes by extension) is
/// optional, so env-only deployments work. Variables prefixed with
/// `ATELIER__` override file values; nested keys use double underscores,
/// e.g. `ATELIER__DATABASE__URL` maps to `database.url`. Without an
/// explicit `path` the loader looks for `config/default`.
///
/// # Errors
/// Fails when the environment overrides are malformed or the merged values
/// do not deserialize into `T`.
///
/// ```rust
/// use atelier_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct StudioConfig {
///     bind_port: u16,
/// }
///
/// let cfg: StudioConfig = load_config(Some("config/server")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = path.map_or_else(|| PathBuf::from(DEFAULT_PATH), |p| p.as_ref().to_path_buf());
    info!(file = %file.display(), "Loading configuration");

    let overrides =
        Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake);

    Config::builder()
        .add_source(File::from(file.as_path()).required(false))
        .add_source(overrides)
        .build()
        .context("Merging configuration sources")?
        .try_deserialize::<T>()
        .context("Deserializing configuration")
}
