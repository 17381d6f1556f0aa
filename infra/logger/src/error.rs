use std::borrow::Cow;

/// Failures raised while installing the tracing pipeline.
#[atelier_derive::atelier_error]
pub enum LoggerError {
    /// The builder was given something contradictory, such as a blank service
    /// name, a zero-file retention window, or unparsable directives.
    #[error("Logger misconfigured{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The rolling appender could not be created under the requested directory.
    #[error("Rolling appender setup failed{}: {source}", format_context(.context))]
    Appender { source: tracing_appender::rolling::InitError, context: Option<Cow<'static, str>> },

    /// This process already installed a global subscriber.
    #[error("Subscriber already installed{}: {source}", format_context(.context))]
    Subscriber {
        source: tracing_subscriber::util::TryInitError,
        context: Option<Cow<'static, str>>,
    },

    /// Filesystem trouble and other unexpected failures.
    #[error("Logger internal fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
