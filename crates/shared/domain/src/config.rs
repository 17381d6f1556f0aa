//! Runtime configuration for the studio server.
//!
//! Everything here deserializes from layered sources (file, then `ATELIER_*`
//! environment overrides); every field has a default so a bare binary boots
//! an in-memory studio. [`ApiConfig`] is the handle the rest of the
//! workspace passes around.

use crate::features::FeatureSet;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// The full configuration tree, one field per concern.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub motion: MotionConfig,
    pub features: FeatureSet,
}

/// Shared handle over [`ApiConfigInner`].
///
/// Clones are pointer copies, so every subsystem can keep its own handle;
/// mutation (test setup, builder overrides) goes through `DerefMut`, which
/// unshares the tree first.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Listener address, port, and optional TLS.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

impl ServerConfig {
    /// Socket the HTTP listener binds.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: Ipv4Addr::UNSPECIFIED.into(), port: 4710, ssl: None }
    }
}

/// Certificate and key paths; both are required once an `ssl` block exists.
#[derive(Debug, Clone, Deserialize)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Where the engine lives and how to reach it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<DatabaseCredentials>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mem://".into(),
            namespace: "atelier".into(),
            database: "core".into(),
            credentials: Some(DatabaseCredentials::default()),
        }
    }
}

/// Root sign-in; leave out for engines that run unauthenticated.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

impl Default for DatabaseCredentials {
    fn default() -> Self {
        // The surreal CLI's out-of-the-box root account.
        Self { username: "root".into(), password: "root".into() }
    }
}

/// Filesystem roots: writable data and the built site bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("."), static_dir: PathBuf::from("public") }
    }
}

/// Everything auth-shaped lives under `security`.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub identity: IdentityConfig,
}

/// Staff session auth: token signing, cache sizing, and the first account.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub session_cache_capacity: u64,
    pub jwt: JwtConfig,
    pub admin: AdminSeedConfig,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            session_cache_capacity: 10_000,
            jwt: JwtConfig::default(),
            admin: AdminSeedConfig::default(),
        }
    }
}

/// Session token parameters. The default secret is for local runs only;
/// deployments set `ATELIER__SECURITY__IDENTITY__JWT__SECRET`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: Option<String>,
    pub ttl_seconds: u64,
    pub clock_skew_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "local-only-signing-secret".into(),
            issuer: "atelier".into(),
            audience: None,
            ttl_seconds: 3600,
            clock_skew_seconds: 60,
        }
    }
}

/// First staff account, created only while the `user` table is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl Default for AdminSeedConfig {
    fn default() -> Self {
        Self {
            email: "admin@atelier.dev".into(),
            password: "change-me".into(),
            display_name: "Studio Admin".into(),
        }
    }
}

/// Server-side switches for the motion pipeline. Mirrors the client
/// query-string flags so deployments can pin behavior without a URL.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub force_motion: bool,
    pub boost: bool,
    pub tier_debug: bool,
    pub field_debug: bool,
    pub tier_override: Option<u8>,
}
