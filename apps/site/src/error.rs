use std::borrow::Cow;

use atelier::features::leads::validation::FieldErrors;

/// What can go wrong between the browser bundle and the API.
#[atelier_derive::atelier_error]
pub enum SiteError {
    /// The API answered with a problem document.
    #[error("{title}")]
    Api { status: u16, title: String, errors: Option<FieldErrors> },

    /// The request never reached the API, or the body was not readable.
    #[error("Network error{}: {source}", format_context(.context))]
    Network {
        #[source]
        source: reqwest::Error,
        context: Option<Cow<'static, str>>,
    },

    /// A bug in the bundle rather than a failed request.
    #[error("Internal site error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl SiteError {
    /// True when the API rejected the session (expired or revoked token).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Per-field validation messages from a 422 answer, if any.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Api { errors: Some(errors), .. } => Some(errors),
            _ => None,
        }
    }
}
