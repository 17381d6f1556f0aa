//! # Atelier Server
//!
//! The studio's single deployable process: an `Axum` API over `SurrealDB`
//! plus static hosting for the built site bundle. Feature slices are wired
//! through the `atelier` facade at boot.
//!
//! ## Example
//! ```no_run
//! use atelier_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4710)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result, anyhow};
use atelier::domain::config::ApiConfig;
use atelier::kernel::server::ApiState;
use atelier_database::Database;
use atelier_event_bus::EventBus;
use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Staged configuration for a [`Server`]; nothing connects until `build()`.
#[must_use = "a builder only configures; call .build().await to boot"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Replaces the whole configuration tree, usually from `load_config`.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    async fn init_database(&self) -> Result<Database> {
        let db = &self.cfg.database;
        let builder = Database::builder().url(&db.url).session(&db.namespace, &db.database);
        let builder = match &db.credentials {
            Some(creds) => builder.auth(&creds.username, &creds.password),
            None => builder,
        };

        builder.init().await.context("Bringing up the database connection")
    }

    fn validate_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            for (role, path) in [("certificate", &ssl.cert), ("key", &ssl.key)] {
                if !path.exists() {
                    anyhow::bail!("TLS {role} missing at {}", path.display());
                }
            }
            warn_on_loose_key_permissions(&ssl.key)?;
        }

        // A missing site bundle is an operational state, not a boot failure:
        // the API stays up while the client is still being built.
        let static_dir = &self.cfg.storage.static_dir;
        if !static_dir.is_dir() {
            warn!(
                path = %static_dir.display(),
                "Static directory missing; only API routes will be served"
            );
        }

        Ok(())
    }

    /// Consumes the builder and boots everything the router needs.
    ///
    /// Boot order: config validation, database connection (running pending
    /// migrations), event bus, feature slices via [`atelier::init`], then
    /// the state registry the router extracts from.
    ///
    /// # Errors
    /// Fails when the engine is unreachable, a slice refuses to initialize
    /// (for example the staff seed insert), or TLS material is unreadable.
    ///
    /// # Examples
    /// ```no_run
    /// # use atelier_server::Server;
    /// # async fn example() -> anyhow::Result<()> {
    /// let server = Server::builder()
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Server> {
        self.validate_config()?;

        info!(address = %self.cfg.server.bind_addr(), "Initializing server");

        let db = self.init_database().await?;

        let events = EventBus::new();
        let slices = atelier::init(&self.cfg, &db, &events)
            .await
            .map_err(|e| anyhow!("Studio bootstrap failed: {e}"))?;

        let state = ApiState::builder()
            .config(self.cfg)
            .db(db)
            .events(events)
            .register_slices(slices)
            .build()
            .context("Failed to finalize API state registry")?;

        Ok(Server { state })
    }
}

/// A booted server holding the process-wide state registry.
#[must_use = "the server does not listen until .run() is awaited"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Entry point: configure a server, then `build()` it.
    ///
    /// # Examples
    /// ```no_run
    /// # use atelier_server::Server;
    /// # async fn example() -> anyhow::Result<()> {
    /// let server = Server::builder()
    ///     .port(4710)
    ///     .build()
    ///     .await?;
    ///
    /// server.run().await
    /// # }
    /// ```
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Serves until a shutdown signal arrives, then drains connections.
    ///
    /// # Errors
    /// Fails when the listener cannot bind or the TLS material does not
    /// load.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = cfg.server.bind_addr();
        let app = router::init(self.state);

        let handle = Handle::<SocketAddr>::new();
        watch_for_shutdown(handle.clone());

        match &cfg.server.ssl {
            Some(tls) => {
                let rustls =
                    axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                        .await
                        .context("Loading the TLS certificate and key")?;

                info!("Serving https://{address}");
                axum_server::bind_rustls(address, rustls)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await
                    .context("HTTPS listener failed")?;
            }
            None => {
                info!("Serving http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await
                    .context("HTTP listener failed")?;
            }
        }

        info!("Server stopped cleanly");
        Ok(())
    }

    /// The process-wide state registry, mainly for tests.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Spawns the watcher that flips the handle into graceful shutdown.
fn watch_for_shutdown(handle: Handle<SocketAddr>) {
    tokio::spawn(async move {
        if let Err(err) = shutdown_signal().await {
            error!("Signal handler failed: {err}");
            return;
        }
        info!("Shutdown signal received; draining connections");
        handle.graceful_shutdown(Some(Duration::from_secs(30)));
    });
}

/// Resolves when the process is told to stop.
#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("Installing the SIGTERM handler")?;

    tokio::select! {
        result = signal::ctrl_c() => result.context("Waiting for Ctrl+C")?,
        _ = terminate.recv() => {}
    }

    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    signal::ctrl_c().await.context("Waiting for Ctrl+C")
}

#[cfg(unix)]
fn warn_on_loose_key_permissions(key: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = key.metadata()?.permissions().mode();
    if mode & 0o077 != 0 {
        warn!(key = %key.display(), "TLS key is readable by group/others; expected mode 600");
    }
    Ok(())
}

#[cfg(not(unix))]
fn warn_on_loose_key_permissions(_key: &std::path::Path) -> Result<()> {
    Ok(())
}
