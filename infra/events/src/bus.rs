use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use fxhash::FxHashMap;
use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{trace, warn};

use crate::error::EventBusError;

/// Buffer size used when a publish has to open the channel itself.
pub const DEFAULT_CAPACITY: usize = 64;

/// Anything that can travel over the bus. Blanket-implemented.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

/// Delivery flavor an event type is bound to.
///
/// The first operation against a type fixes its kind; every later
/// operation must agree or fails with
/// [`EventBusError::KindMismatch`][crate::EventBusError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Fan-out: every subscriber sees every event.
    Broadcast { capacity: usize },
    /// Bounded queue with a single consumer.
    Mpsc { capacity: usize },
    /// Latest value only; late subscribers still observe it.
    Watch,
}

impl ChannelKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Broadcast { .. } => "broadcast",
            Self::Mpsc { .. } => "mpsc",
            Self::Watch => "watch",
        }
    }
}

/// The typed channel stored for one event type.
///
/// The map key is the event's [`TypeId`], so a slot looked up for `T`
/// always holds a `Slot<T>`; a failed downcast is a bus bug, not a
/// caller error.
enum Slot<T> {
    Broadcast { tx: broadcast::Sender<Arc<T>>, capacity: usize },
    Queue { tx: mpsc::Sender<Arc<T>>, parked: Option<mpsc::Receiver<Arc<T>>>, capacity: usize },
    Watch { tx: watch::Sender<Arc<T>> },
}

impl<T: Event> Slot<T> {
    const fn kind(&self) -> ChannelKind {
        match self {
            Self::Broadcast { capacity, .. } => ChannelKind::Broadcast { capacity: *capacity },
            Self::Queue { capacity, .. } => ChannelKind::Mpsc { capacity: *capacity },
            Self::Watch { .. } => ChannelKind::Watch,
        }
    }

    fn mismatch(&self, wanted: &'static str) -> EventBusError {
        EventBusError::KindMismatch {
            message: format!(
                "{} is bound to a {} channel, not {wanted}",
                type_name::<T>(),
                self.kind().name()
            )
            .into(),
            context: None,
        }
    }
}

fn new_queue<T: Event>(capacity: usize) -> Slot<T> {
    let (tx, rx) = mpsc::channel(capacity);
    Slot::Queue { tx, parked: Some(rx), capacity }
}

/// Type-indexed pub/sub shared across the platform's slices.
///
/// Cloning is cheap; every clone talks to the same channels. Payloads
/// ride as `Arc<T>`, so a fan-out never deep-clones the event.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    slots: Arc<RwLock<FxHashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl EventBus {
    /// Creates an empty bus; channels open lazily on first use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T`, opening the channel
    /// with [`DEFAULT_CAPACITY`] when absent.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is already bound to a
    /// queue or watch channel.
    ///
    /// # Examples
    /// ```rust
    /// use atelier_event_bus::{EventBus, NextEvent};
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct QuoteReceived { lead_id: u64 }
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), atelier_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut inbox = bus.subscribe::<QuoteReceived>()?;
    /// bus.publish(QuoteReceived { lead_id: 7 })?;
    /// assert_eq!(inbox.next_event().await.unwrap().lead_id, 7);
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to broadcast events of type `T` with an explicit ring
    /// capacity. A capacity differing from an already-open channel is
    /// logged and the existing channel reused.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is bound to another
    /// kind, [`EventBusError::InvalidCapacity`] when `capacity` is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        check_capacity(capacity)?;
        self.with_slot(
            || {
                let (tx, _) = broadcast::channel(capacity);
                Slot::Broadcast { tx, capacity }
            },
            |slot| match slot {
                Slot::Broadcast { tx, capacity: fixed } => {
                    warn_capacity::<T>(*fixed, capacity);
                    Ok(tx.subscribe())
                },
                other => Err(other.mismatch("broadcast")),
            },
        )
    }

    /// Takes the consuming end of the bounded queue for `T`. A queue
    /// hands its receiver out exactly once.
    ///
    /// # Errors
    /// [`EventBusError::ReceiverTaken`] on a second take,
    /// [`EventBusError::KindMismatch`] when `T` is bound to another
    /// kind, [`EventBusError::InvalidCapacity`] when `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use atelier_event_bus::EventBus;
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct MailerJob { to: String }
    ///
    /// # fn main() -> Result<(), atelier_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let inbox = bus.subscribe_mpsc::<MailerJob>(8)?;
    /// assert!(bus.subscribe_mpsc::<MailerJob>(8).is_err());
    /// # drop(inbox);
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe_mpsc<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<mpsc::Receiver<Arc<T>>, EventBusError> {
        check_capacity(capacity)?;
        self.with_slot(
            || new_queue::<T>(capacity),
            |slot| match slot {
                Slot::Queue { parked, capacity: fixed, .. } => {
                    warn_capacity::<T>(*fixed, capacity);
                    parked.take().ok_or_else(|| EventBusError::ReceiverTaken {
                        message: type_name::<T>().into(),
                        context: None,
                    })
                },
                other => Err(other.mismatch("mpsc")),
            },
        )
    }

    /// Subscribes to the watch channel for `T`, seeding it with
    /// `initial` when absent. An existing channel keeps its current
    /// value; `initial` is discarded.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is bound to another
    /// kind.
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        let initial = Arc::new(initial);
        self.with_slot(
            || {
                let (tx, _) = watch::channel(Arc::clone(&initial));
                Slot::Watch { tx }
            },
            |slot| match slot {
                Slot::Watch { tx } => Ok(tx.subscribe()),
                other => Err(other.mismatch("watch")),
            },
        )
    }

    /// Broadcasts an event, returning how many subscribers received it.
    /// Zero subscribers is not an error; the event is dropped.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is bound to a queue or
    /// watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Broadcast variant for callers that already hold the event in an
    /// `Arc`.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is bound to a queue or
    /// watch channel.
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        self.with_slot(
            || {
                let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
                Slot::Broadcast { tx, capacity: DEFAULT_CAPACITY }
            },
            |slot| match slot {
                Slot::Broadcast { tx, .. } => match tx.send(event) {
                    Ok(count) => {
                        trace!(event = type_name::<T>(), count, "Event delivered");
                        Ok(count)
                    },
                    Err(_) => {
                        trace!(event = type_name::<T>(), "No subscribers; event dropped");
                        Ok(0)
                    },
                },
                other => Err(other.mismatch("broadcast")),
            },
        )
    }

    /// Pushes an event onto the bounded queue for `T` without blocking.
    ///
    /// # Errors
    /// [`EventBusError::ChannelFull`] when the queue is at capacity,
    /// [`EventBusError::Closed`] when the receiver is gone,
    /// [`EventBusError::KindMismatch`] when `T` is bound to another
    /// kind.
    pub fn publish_mpsc<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        self.publish_mpsc_arc(Arc::new(event))
    }

    /// Queue variant for callers that already hold the event in an
    /// `Arc`.
    ///
    /// # Errors
    /// Same as [`EventBus::publish_mpsc`].
    pub fn publish_mpsc_arc<T: Event>(&self, event: Arc<T>) -> Result<(), EventBusError> {
        // Clone the sender out instead of sending under the map lock.
        let tx = self.with_slot(
            || new_queue::<T>(DEFAULT_CAPACITY),
            |slot| match slot {
                Slot::Queue { tx, .. } => Ok(tx.clone()),
                other => Err(other.mismatch("mpsc")),
            },
        )?;
        tx.try_send(event).map_err(|error| match error {
            mpsc::error::TrySendError::Full(_) => EventBusError::ChannelFull {
                message: type_name::<T>().into(),
                context: Some("queue at capacity".into()),
            },
            mpsc::error::TrySendError::Closed(_) => EventBusError::Closed {
                message: type_name::<T>().into(),
                context: Some("queue receiver dropped".into()),
            },
        })
    }

    /// Replaces the latest value on the watch channel for `T`, opening
    /// it with `event` when absent.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is bound to another
    /// kind.
    ///
    /// # Examples
    /// ```rust
    /// use atelier_event_bus::EventBus;
    ///
    /// #[derive(Debug, Clone, Copy, PartialEq, Default)]
    /// struct StageSnapshot { scroll: f32 }
    ///
    /// # fn main() -> Result<(), atelier_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// bus.publish_watch(StageSnapshot { scroll: 0.25 })?;
    /// bus.publish_watch(StageSnapshot { scroll: 0.75 })?;
    /// let rx = bus.subscribe_watch(StageSnapshot::default())?;
    /// assert_eq!(rx.borrow().scroll, 0.75);
    /// # Ok(())
    /// # }
    /// ```
    pub fn publish_watch<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        self.publish_watch_arc(Arc::new(event))
    }

    /// Watch variant for callers that already hold the event in an
    /// `Arc`.
    ///
    /// # Errors
    /// [`EventBusError::KindMismatch`] when `T` is bound to another
    /// kind.
    pub fn publish_watch_arc<T: Event>(&self, event: Arc<T>) -> Result<(), EventBusError> {
        self.with_slot(
            || {
                let (tx, _) = watch::channel(Arc::clone(&event));
                Slot::Watch { tx }
            },
            |slot| match slot {
                Slot::Watch { tx } => {
                    tx.send_replace(Arc::clone(&event));
                    Ok(())
                },
                other => Err(other.mismatch("watch")),
            },
        )
    }

    /// Reports the kind an event type is currently bound to, if any.
    #[must_use]
    pub fn kind_of<T: Event>(&self) -> Option<ChannelKind> {
        self.slots
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<Slot<T>>())
            .map(Slot::kind)
    }

    /// Drops every channel, closing all outstanding receivers. Returns
    /// how many channels were open.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut slots = self.slots.write();
        let open = slots.len();
        slots.clear();
        open
    }

    /// Runs `apply` against the slot for `T`, creating it with `init`
    /// first when absent.
    fn with_slot<T: Event, R>(
        &self,
        init: impl FnOnce() -> Slot<T>,
        apply: impl FnOnce(&mut Slot<T>) -> Result<R, EventBusError>,
    ) -> Result<R, EventBusError> {
        let mut slots = self.slots.write();
        let slot = slots
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                trace!(event = type_name::<T>(), "Opening event channel");
                Box::new(init())
            })
            .downcast_mut::<Slot<T>>()
            .ok_or_else(|| EventBusError::Internal {
                message: type_name::<T>().into(),
                context: Some("slot stored under the wrong type".into()),
            })?;
        apply(slot)
    }
}

fn warn_capacity<T>(fixed: usize, requested: usize) {
    if fixed != requested {
        warn!(
            event = type_name::<T>(),
            fixed, requested, "Channel already open with a different capacity"
        );
    }
}

fn check_capacity(capacity: usize) -> Result<(), EventBusError> {
    if capacity == 0 {
        return Err(EventBusError::InvalidCapacity {
            message: "bounded channels need room for at least one event".into(),
            context: None,
        });
    }
    Ok(())
}
