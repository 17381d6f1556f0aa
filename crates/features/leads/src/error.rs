use std::borrow::Cow;

/// Failure modes of the lead pipeline.
#[atelier_derive::atelier_error]
pub enum LeadsError {
    /// The requested lead does not exist.
    #[error("Lead not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A stored row no longer matches the catalog values this crate accepts.
    #[error("Lead row decode error{}: {message}", format_context(.context))]
    Decode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The `lead` table query itself failed.
    #[cfg(feature = "server")]
    #[error("Lead storage error{}: {source}", format_context(.context))]
    Storage {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Fanning a lead signal out over the event bus failed.
    #[cfg(feature = "server")]
    #[error("Lead event bus error{}: {source}", format_context(.context))]
    Bus {
        #[source]
        source: atelier_event_bus::EventBusError,
        context: Option<Cow<'static, str>>,
    },

    /// A bug in this slice rather than bad input.
    #[error("Internal leads error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
