//! Typed pub/sub for the platform's slices.
//!
//! One [`EventBus`] travels through the API state; slices talk to each
//! other by event type instead of by direct calls. The first operation
//! against a type fixes its [`ChannelKind`] - broadcast fan-out for
//! domain events like a submitted quote, a bounded queue for work that
//! must not be dropped silently, a watch for latest-value signals like
//! the intro completion flag. Payloads ride as `Arc<T>`.
//!
//! ```rust
//! use atelier_event_bus::{EventBus, NextEvent};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct QuoteReceived { lead_id: u64 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), atelier_event_bus::EventBusError> {
//!     let bus = EventBus::new();
//!     let mut inbox = bus.subscribe::<QuoteReceived>()?;
//!     bus.publish(QuoteReceived { lead_id: 7 })?;
//!     assert_eq!(inbox.next_event().await.unwrap().lead_id, 7);
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, DEFAULT_CAPACITY, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::NextEvent;
