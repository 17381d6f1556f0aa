//! Bus integration for choreography signals.
//!
//! Intro completion is mirrored onto the event bus as a latest-value watch
//! event, so late subscribers still observe a completion that happened
//! before they subscribed. [`completed`] wraps the watch in a single
//! cancelable future with a timeout fallback; the frame-driven
//! [`crate::stage::BackdropStage`] carries its own clock fallbacks and does
//! not depend on this.

use std::time::Duration;

use atelier_event_bus::EventBus;
use tracing::warn;

use crate::{error::MotionError, hub::InteractionSnapshot, intro::IntroSequencer};

/// Latest-value completion flag for the entrance intro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntroComplete {
    pub done: bool,
}

/// Which side of the race resolved a [`completed`] wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    /// The intro published its completion.
    Signal,
    /// The fallback deadline fired first.
    Timeout,
}

/// Registers the watch channel so its kind is fixed before any publisher
/// races a subscriber.
///
/// # Errors
/// Returns [`MotionError::Bus`] if a channel of a different kind already
/// exists for [`IntroComplete`].
pub fn register(bus: &EventBus) -> Result<(), MotionError> {
    bus.subscribe_watch(IntroComplete::default())?;
    Ok(())
}

/// Wires an intro sequencer's completion hook to publish on the bus.
pub fn wire_intro(bus: &EventBus, intro: &mut IntroSequencer) {
    let bus = bus.clone();
    intro.set_on_complete(move || {
        if let Err(error) = bus.publish_watch(IntroComplete { done: true }) {
            warn!(%error, "Failed to publish intro completion");
        }
    });
}

/// Mirrors the interaction snapshot for async observers outside the frame
/// loop. The frame loop itself reads the hub directly.
///
/// # Errors
/// Returns [`MotionError::Bus`] if a channel of a different kind already
/// exists for [`InteractionSnapshot`].
pub fn mirror_interaction(
    bus: &EventBus,
    snapshot: InteractionSnapshot,
) -> Result<(), MotionError> {
    bus.publish_watch(snapshot)?;
    Ok(())
}

/// Resolves when the intro completes or `fallback` elapses, whichever comes
/// first. Dropping the future cancels the wait; nothing else is pending.
///
/// # Errors
/// Returns [`MotionError::Bus`] if the completion channel cannot be
/// subscribed to.
pub async fn completed(bus: &EventBus, fallback: Duration) -> Result<CompletionCause, MotionError> {
    let mut receiver = bus.subscribe_watch(IntroComplete::default())?;
    if receiver.borrow().done {
        return Ok(CompletionCause::Signal);
    }
    let wait = async {
        while receiver.changed().await.is_ok() {
            if receiver.borrow().done {
                return CompletionCause::Signal;
            }
        }
        // Sender dropped without completing; only the deadline remains.
        CompletionCause::Timeout
    };
    match tokio::time::timeout(fallback, wait).await {
        Ok(cause) => Ok(cause),
        Err(_) => Ok(CompletionCause::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::ScrollLock;
    use atelier_kernel::session::MemorySessionStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn resolves_on_the_completion_signal() {
        let bus = EventBus::new();
        register(&bus).expect("register watch channel");

        let mut intro = IntroSequencer::new(
            Arc::new(MemorySessionStore::new()),
            ScrollLock::new(),
            false,
        );
        wire_intro(&bus, &mut intro);
        intro.start_if_pending(0.0);

        let waiter = tokio::spawn({
            let bus = bus.clone();
            async move { completed(&bus, Duration::from_secs(5)).await }
        });
        intro.advance(10_000.0); // ceiling path publishes completion

        let cause = waiter.await.expect("join").expect("completed");
        assert_eq!(cause, CompletionCause::Signal);
    }

    #[tokio::test]
    async fn late_subscriber_still_sees_a_past_completion() {
        let bus = EventBus::new();
        let mut intro = IntroSequencer::new(
            Arc::new(MemorySessionStore::new()),
            ScrollLock::new(),
            false,
        );
        wire_intro(&bus, &mut intro);
        intro.start_if_pending(0.0);
        intro.cancel();

        let cause = completed(&bus, Duration::from_millis(100)).await.expect("completed");
        assert_eq!(cause, CompletionCause::Signal);
    }

    #[tokio::test]
    async fn falls_back_to_the_deadline_without_a_signal() {
        let bus = EventBus::new();
        register(&bus).expect("register watch channel");
        let cause = completed(&bus, Duration::from_millis(25)).await.expect("completed");
        assert_eq!(cause, CompletionCause::Timeout);
    }

    #[tokio::test]
    async fn interaction_mirror_is_latest_value() {
        let bus = EventBus::new();
        mirror_interaction(&bus, InteractionSnapshot { scroll_velocity: 1.0, attractor: None })
            .expect("mirror");
        mirror_interaction(&bus, InteractionSnapshot { scroll_velocity: 2.0, attractor: None })
            .expect("mirror");
        let receiver = bus
            .subscribe_watch(InteractionSnapshot::default())
            .expect("subscribe");
        assert_eq!(receiver.borrow().scroll_velocity, 2.0);
    }
}
