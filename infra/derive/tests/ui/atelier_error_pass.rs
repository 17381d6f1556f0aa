use atelier_derive::atelier_error;
use std::borrow::Cow;

#[atelier_error]
pub enum IntakeError {
    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal intake error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err: IntakeError = "quote body missing".into();
    assert!(err.to_string().contains("quote body missing"));

    let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
    let wrapped = io.context("persisting a quote request").unwrap_err();
    assert!(matches!(wrapped, IntakeError::Storage { .. }));
    assert!(wrapped.to_string().contains("persisting a quote request"));
}
