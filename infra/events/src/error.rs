use std::borrow::Cow;

/// Failure modes of bus operations.
#[atelier_derive::atelier_error]
pub enum EventBusError {
    /// The event type is already bound to a different channel flavor.
    #[error("Channel kind mismatch{}: {message}", format_context(.context))]
    KindMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A queue's receiving half was already handed out.
    #[error("Queue receiver already taken{}: {message}", format_context(.context))]
    ReceiverTaken { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A bounded queue has no room left.
    #[error("Channel full{}: {message}", format_context(.context))]
    ChannelFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The receiving half is gone; the event cannot be delivered.
    #[error("Channel closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Bounded channels need a capacity of at least one.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A slot held a value of the wrong type; this is a bug in the bus,
    /// not a caller error.
    #[error("Internal event bus error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
