use std::borrow::Cow;

/// Failure modes of the motion slice.
#[atelier_derive::atelier_error]
pub enum MotionError {
    /// Invalid or contradictory motion configuration.
    #[error("Motion config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Wiring a choreography channel on the event bus failed.
    #[cfg(feature = "server")]
    #[error("Motion event bus error{}: {source}", format_context(.context))]
    Bus {
        #[source]
        source: atelier_event_bus::EventBusError,
        context: Option<Cow<'static, str>>,
    },

    /// A bug in this slice rather than bad input.
    #[error("Internal motion error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
