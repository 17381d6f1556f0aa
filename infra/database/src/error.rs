use std::borrow::Cow;

/// Failure modes of the database layer.
#[atelier_derive::atelier_error]
pub enum DatabaseError {
    /// The engine could not be reached or never became healthy.
    #[error("Engine unreachable{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Root sign-in or record-access authentication was refused.
    #[error("Database authentication refused{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Builder misuse caught before any connection was attempted.
    #[error("Invalid database configuration{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A schema migration failed to apply, or an applied script drifted.
    #[error("Schema migration failed{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Bubbled straight out of the `SurrealDB` client.
    #[error("Engine error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Anything that points at a bug in this crate rather than bad input.
    #[error("Internal database fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
