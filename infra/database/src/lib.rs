//! SurrealDB bootstrap for the studio backend.
//!
//! One [`Database`] handle serves the whole server: the builder connects
//! through the `any` engine (`mem://` in tests, `rocksdb://` or a remote
//! endpoint in deployments), waits for the engine to report healthy, applies
//! the embedded schema migrations, and provisions record access for scoped
//! sessions.
//!
//! ```rust
//! use atelier_database::{Database, DatabaseError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("atelier", "studio")
//!         .init()
//!         .await?;
//!
//!     // Root-level queries go straight through `Deref`; scoped sessions
//!     // are minted on demand and cached.
//!     let session = db.authenticate("maren").await?;
//!     session.version().await?;
//!
//!     Ok(())
//! }
//! ```

mod access;
mod error;
mod manifest;
mod migrations;

use crate::access::AccessKeys;
pub use error::{DatabaseError, DatabaseErrorExt};
use migrations::MigrationRunner;
use moka::future::Cache;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{debug, info, instrument, warn};

/// Lifetime of a record-access token.
const SESSION_TTL_SECONDS: i64 = 3600;
/// Cached sessions are evicted this long before their token would expire,
/// so a cache hit never hands out a session about to go stale.
const SESSION_EVICTION_MARGIN: Duration = Duration::from_secs(60);
/// Hard bound on distinct cached sessions.
const SESSION_CACHE_CAPACITY: u64 = 10_000;

/// Health probes before `init` gives up on the engine.
const HEALTH_ATTEMPTS: u32 = 3;
/// Delay before the second probe; doubles after every failed one.
const HEALTH_BACKOFF: Duration = Duration::from_millis(500);

/// Shared state behind a [`Database`] handle.
#[derive(Debug)]
struct Connection {
    client: Surreal<Any>,
    access: AccessKeys,
    sessions: Cache<String, Surreal<Any>>,
    ns: String,
    db: String,
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!(ns = %self.ns, db = %self.db, "Database handle released");
    }
}

/// Cloneable handle over one engine connection.
///
/// Root-level queries run through `Deref`; [`Database::authenticate`] mints
/// scoped record-access sessions for individual accounts.
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Connection>,
}

impl Database {
    /// Starts configuring a connection.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    /// Opens (or reuses) a record-access session for `user_id`.
    ///
    /// Accepts either a bare key (`maren`) or a full record id
    /// (`user:maren`); both resolve to the same cached session. The token is
    /// minted locally with the keys provisioned at startup and presented to
    /// the engine, so a returned session is already authenticated. The record
    /// itself is not looked up; the engine only verifies the token.
    ///
    /// # Errors
    ///
    /// [`DatabaseError::Auth`] when signing fails or the engine refuses the
    /// token, [`DatabaseError::Internal`] when a cache loader error reached
    /// several concurrent waiters at once.
    #[instrument(skip_all, fields(user = user_id.as_ref()))]
    pub async fn authenticate(
        &self,
        user_id: impl AsRef<str>,
    ) -> Result<Surreal<Any>, DatabaseError> {
        let key = user_id.as_ref();
        let record = format!("user:{}", key.strip_prefix("user:").unwrap_or(key));

        let loader = self.open_session(record.clone());
        self.conn.sessions.try_get_with(record, loader).await.map_err(unshare)
    }

    /// Cache loader: mints a token and authenticates a fresh clone of the
    /// client with it.
    async fn open_session(&self, record: String) -> Result<Surreal<Any>, DatabaseError> {
        let token =
            self.conn.access.issue(&self.conn.ns, &self.conn.db, &record, SESSION_TTL_SECONDS)?;

        let session = self.conn.client.clone();
        session.authenticate(token).await.map_err(|source| DatabaseError::Auth {
            message: source.to_string().into(),
            context: Some(format!("Engine refused the session token for {record}").into()),
        })?;

        Ok(session)
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.conn.client
    }
}

/// `moka` hands loader errors to every concurrent waiter as an [`Arc`];
/// unwrap back to an owned error when this caller was the only waiter.
fn unshare(shared: Arc<DatabaseError>) -> DatabaseError {
    Arc::try_unwrap(shared).unwrap_or_else(|still_shared| DatabaseError::Internal {
        message: still_shared.to_string().into(),
        context: Some("Session loader failed for several waiters at once".into()),
    })
}

/// Connection configuration consumed by [`DatabaseBuilder::init`].
///
/// `url()` and `session()` are mandatory; `auth()` is only needed for
/// engines that enforce root credentials (`mem://` does not).
#[must_use = "the builder holds no connection until init() runs"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    credentials: Option<(String, String)>,
}

impl DatabaseBuilder {
    /// Engine endpoint, e.g. `mem://`, `rocksdb://data/studio` or `ws://...`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Namespace and database the connection switches into.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Root credentials for engines that require a sign-in.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Connects, waits for a healthy engine, signs in, selects the session,
    /// settles the embedded migrations, and provisions record access.
    ///
    /// # Errors
    ///
    /// * [`DatabaseError::Validation`] when `url()` or `session()` was never
    ///   called.
    /// * [`DatabaseError::Connection`] when the engine cannot be reached or
    ///   stays unhealthy through every probe.
    /// * [`DatabaseError::Auth`] when root credentials are refused.
    /// * [`DatabaseError::Migration`] when an applied script drifted or a
    ///   pending one fails.
    /// * [`DatabaseError::Surreal`] when session activation fails.
    #[instrument(skip(self))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let Self { url, ns, db, credentials } = self;
        let url = require(url, "no connection URL; call url() before init()")?;
        let ns = require(ns, "no namespace; call session() before init()")?;
        let db = require(db, "no database name; call session() before init()")?;

        let client = connect(&url).await.map_err(|source| DatabaseError::Connection {
            message: source.to_string().into(),
            context: Some(format!("Opening {url}").into()),
        })?;

        wait_until_healthy(&client, &url).await?;

        if let Some((username, password)) = credentials {
            client.signin(Root { username, password }).await.map_err(|source| {
                DatabaseError::Auth {
                    message: source.to_string().into(),
                    context: Some("Root sign-in".into()),
                }
            })?;
        }

        client.use_ns(&ns).use_db(&db).await.context("Selecting namespace and database")?;

        let version =
            client.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(%ns, %db, %version, "Engine connection established");

        let report = MigrationRunner::new(client.clone()).run().await?;
        for entry in &report.applied {
            info!(slice = entry.slice_key, version = entry.version, "Migration applied");
        }
        debug!(applied = report.applied.len(), skipped = report.skipped.len(), "Schema settled");

        let access = AccessKeys::generate()?;
        access.define_access(&client).await?;

        let sessions = Cache::builder()
            .max_capacity(SESSION_CACHE_CAPACITY)
            .time_to_live(session_cache_ttl())
            .build();

        Ok(Database { conn: Arc::new(Connection { client, access, sessions, ns, db }) })
    }
}

fn require(slot: Option<String>, message: &'static str) -> Result<String, DatabaseError> {
    slot.ok_or(DatabaseError::Validation { message: Cow::Borrowed(message), context: None })
}

/// Sessions leave the cache one eviction margin before their token expires.
fn session_cache_ttl() -> Duration {
    Duration::from_secs(SESSION_TTL_SECONDS.cast_unsigned())
        .saturating_sub(SESSION_EVICTION_MARGIN)
}

/// Probes engine health until it answers, backing off between attempts.
/// Embedded engines usually pass on the first probe; remote endpoints may
/// still be starting up when the server boots next to them.
async fn wait_until_healthy(client: &Surreal<Any>, url: &str) -> Result<(), DatabaseError> {
    let mut backoff = HEALTH_BACKOFF;

    for attempt in 1..=HEALTH_ATTEMPTS {
        let Err(source) = client.health().await else {
            return Ok(());
        };

        if attempt == HEALTH_ATTEMPTS {
            return Err(DatabaseError::Connection {
                message: source.to_string().into(),
                context: Some(format!("{url} failed {HEALTH_ATTEMPTS} health probes").into()),
            });
        }

        warn!(attempt, ?backoff, %source, "Engine not healthy yet, backing off");
        tokio::time::sleep(backoff).await;
        backoff *= 2;
    }

    Ok(())
}
