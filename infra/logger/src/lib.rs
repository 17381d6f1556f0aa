//! Tracing bootstrap shared by the platform binaries.
//!
//! One builder installs the process-wide subscriber: a compact ANSI console
//! layer for development plus an optional daily-rotated file sink for
//! deployments, filtered through `RUST_LOG`-style directives. The returned
//! [`Logger`] handle owns the non-blocking file worker, so it has to stay
//! alive for as long as the process wants its records flushed.
//!
//! ```rust
//! use atelier_logger::{LevelFilter, Logger};
//!
//! let _log = Logger::builder("atelier-server")
//!     .level(LevelFilter::DEBUG)
//!     .directives("atelier=debug,hyper=warn")
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Two weeks of daily files before the oldest is deleted.
const DEFAULT_RETAINED_FILES: usize = 14;
const FILE_EXTENSION: &str = "log";

mod sink {
    use super::FileOptions;

    pub trait State {
        type Storage: std::fmt::Debug;

        fn options(storage: Self::Storage) -> Option<FileOptions>;
    }
}

/// Builder state before a file sink is attached.
#[derive(Debug)]
pub struct ConsoleOnly;

/// Builder state once [`LoggerBuilder::file`] has been called.
#[derive(Debug)]
pub struct RollingFile;

impl sink::State for ConsoleOnly {
    type Storage = ();

    fn options((): ()) -> Option<FileOptions> {
        None
    }
}

impl sink::State for RollingFile {
    type Storage = FileOptions;

    fn options(storage: FileOptions) -> Option<FileOptions> {
        Some(storage)
    }
}

#[derive(Debug)]
pub struct FileOptions {
    dir: PathBuf,
    rotation: Rotation,
    retain: usize,
    json: bool,
}

impl FileOptions {
    /// Creates the log directory and wires the rolling appender through a
    /// non-blocking writer. The returned guard drives the writer thread.
    fn install<S>(
        self,
        service: &str,
    ) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggerError>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        if self.retain == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "retain must keep at least one rotated file".into(),
                context: None,
            });
        }

        fs::create_dir_all(&self.dir).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("creating log directory {}", self.dir.display()).into()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation)
            .filename_prefix(service)
            .filename_suffix(FILE_EXTENSION)
            .max_log_files(self.retain)
            .build(&self.dir)?;

        let (writer, guard) = tracing_appender::non_blocking(appender);
        let sink = layer().with_writer(writer).with_ansi(false);

        let boxed = if self.json { sink.json().boxed() } else { sink.boxed() };
        Ok((boxed, guard))
    }
}

/// Builder for the process-wide tracing subscriber.
///
/// The type parameter tracks whether a rolling file sink was attached:
/// file-only options such as [`rotation`](LoggerBuilder::rotation) and
/// [`retain`](LoggerBuilder::retain) only exist after
/// [`file`](LoggerBuilder::file).
#[derive(Debug)]
pub struct LoggerBuilder<S: sink::State = ConsoleOnly> {
    service: String,
    console: bool,
    level: LevelFilter,
    directives: Option<String>,
    file: S::Storage,
}

impl<S: sink::State> LoggerBuilder<S> {
    /// Default level for targets no directive mentions.
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Toggles the compact ANSI console layer. On by default.
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Comma-separated `target=level` directives, e.g. `"atelier=debug,hyper=warn"`.
    ///
    /// When set, this exact filter is used and `RUST_LOG` is ignored;
    /// otherwise the filter comes from `RUST_LOG` with [`level`](Self::level)
    /// as the fallback. An unparsable spec surfaces from [`init`](Self::init).
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub fn directives(mut self, spec: impl Into<String>) -> Self {
        self.directives = Some(spec.into());
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] when this process already installed one,
    /// [`LoggerError::InvalidConfiguration`] for contradictory settings such
    /// as a blank service name or every sink disabled.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { service, console, level, directives, file } = self;

        if service.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "service name must not be blank".into(),
                context: None,
            });
        }

        let filter = build_filter(level, directives.as_deref())?;

        let console_layer = console.then(|| layer().compact().with_ansi(true).boxed());
        let (file_layer, guard) = match S::options(file) {
            Some(options) => {
                let (file_layer, guard) = options.install(&service)?;
                (Some(file_layer), Some(guard))
            }
            None => (None, None),
        };

        if console_layer.is_none() && file_layer.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "every sink is disabled; re-enable the console or attach a file sink"
                    .into(),
                context: None,
            });
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        Ok(Logger { guard })
    }
}

impl LoggerBuilder<ConsoleOnly> {
    /// Attaches a rolling file sink writing `<service>.<date>.log` files
    /// under `dir`. Starts with daily rotation keeping two weeks of files.
    pub fn file(self, dir: impl Into<PathBuf>) -> LoggerBuilder<RollingFile> {
        LoggerBuilder {
            service: self.service,
            console: self.console,
            level: self.level,
            directives: self.directives,
            file: FileOptions {
                dir: dir.into(),
                rotation: Rotation::DAILY,
                retain: DEFAULT_RETAINED_FILES,
                json: false,
            },
        }
    }
}

impl LoggerBuilder<RollingFile> {
    /// How often the sink rolls over to a fresh file.
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.file.rotation = rotation;
        self
    }

    /// How many rotated files stay on disk before the oldest is deleted.
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub const fn retain(mut self, files: usize) -> Self {
        self.file.retain = files;
        self
    }

    /// Writes the file sink as JSON records instead of plain text.
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub const fn json(mut self) -> Self {
        self.file.json = true;
        self
    }
}

/// Handle to the installed logging pipeline.
///
/// Dropping it stops the non-blocking file worker after flushing whatever it
/// still buffers, so it belongs at the top of `main`.
#[must_use = "dropping the handle stops the background log writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a builder for the named service. The name prefixes rolled log
    /// files, e.g. `atelier-server.2026-08-25.log`.
    #[must_use = "the builder is inert until init() installs the subscriber"]
    pub fn builder(service: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            service: service.into(),
            console: true,
            level: LevelFilter::INFO,
            directives: None,
            file: (),
        }
    }

    /// Whether a rolling file sink is writing behind this handle.
    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("log pipeline stopping; draining buffered records");
        }
    }
}

fn build_filter(level: LevelFilter, directives: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    directives.map_or_else(
        || Ok(builder.from_env_lossy()),
        |spec| {
            builder.parse(spec).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("unparsable log directives '{spec}': {e}").into(),
                context: None,
            })
        },
    )
}
