use std::borrow::Cow;

/// Failure modes of the staff auth slice.
#[atelier_derive::atelier_error]
pub enum IdentityError {
    /// The presented email/password pair does not match a staff account.
    #[error("Invalid credentials{}: {message}", format_context(.context))]
    Credentials { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Session token could not be issued.
    #[cfg(feature = "server")]
    #[error("Session token error{}: {source}", format_context(.context))]
    Token {
        #[source]
        source: jsonwebtoken::errors::Error,
        context: Option<Cow<'static, str>>,
    },

    /// The `user` table query itself failed.
    #[cfg(feature = "server")]
    #[error("Identity storage error{}: {source}", format_context(.context))]
    Storage {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// A bug in this slice rather than bad input.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
