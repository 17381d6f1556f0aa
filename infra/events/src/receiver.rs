use std::any::type_name;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::warn;

use crate::bus::Event;

/// Uniform async pull across the three channel flavors.
///
/// Broadcast receivers ride through lag by resuming from the oldest
/// retained event; watch receivers resolve on the next change with the
/// latest value. The name deliberately avoids the receivers' inherent
/// `recv`, so calls stay unambiguous without fully-qualified syntax.
pub trait NextEvent<T> {
    /// Waits for the next event, `None` once the channel closes.
    fn next_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> NextEvent<T> for broadcast::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        loop {
            match self.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        event = type_name::<T>(),
                        skipped, "Receiver lagged; resuming from the oldest retained event"
                    );
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T: Event> NextEvent<T> for mpsc::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        self.recv().await
    }
}

impl<T: Event> NextEvent<T> for watch::Receiver<Arc<T>> {
    async fn next_event(&mut self) -> Option<Arc<T>> {
        self.changed().await.ok()?;
        let latest = self.borrow_and_update().clone();
        Some(latest)
    }
}
