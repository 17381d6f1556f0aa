pub mod fixtures;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atelier_event_bus::{ChannelKind, DEFAULT_CAPACITY, EventBus, EventBusError, NextEvent};

    use super::fixtures::{MailerJob, QuoteReceived, StageSnapshot};

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let bus = EventBus::new();
        let mut first = bus.subscribe::<QuoteReceived>().expect("subscribe");
        let mut second = bus.subscribe::<QuoteReceived>().expect("subscribe");

        let delivered = bus.publish(QuoteReceived { lead_id: 7 }).expect("publish");
        assert_eq!(delivered, 2);

        let a = first.next_event().await.expect("first receives");
        let b = second.next_event().await.expect("second receives");
        assert_eq!(a.lead_id, 7);
        assert!(Arc::ptr_eq(&a, &b), "fan-out shares one allocation");
    }

    #[tokio::test]
    async fn event_types_keep_separate_channels() {
        #[derive(Clone, Debug, PartialEq, Eq)]
        struct Unrelated(u64);

        let bus = EventBus::new();
        let mut quotes = bus.subscribe::<QuoteReceived>().expect("subscribe");
        let mut other = bus.subscribe::<Unrelated>().expect("subscribe");

        bus.publish(QuoteReceived { lead_id: 1 }).expect("publish");
        bus.publish(Unrelated(2)).expect("publish");

        assert_eq!(quotes.next_event().await.expect("quote").lead_id, 1);
        assert_eq!(other.next_event().await.expect("unrelated").0, 2);
    }

    #[tokio::test]
    async fn publish_without_subscribers_reports_zero() {
        let bus = EventBus::new();
        let delivered = bus.publish(QuoteReceived { lead_id: 1 }).expect("publish");
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn kind_is_fixed_by_first_use() {
        let bus = EventBus::new();
        let _rx = bus.subscribe::<QuoteReceived>().expect("subscribe");

        assert_eq!(
            bus.kind_of::<QuoteReceived>(),
            Some(ChannelKind::Broadcast { capacity: DEFAULT_CAPACITY })
        );
        assert!(matches!(
            bus.subscribe_mpsc::<QuoteReceived>(4),
            Err(EventBusError::KindMismatch { .. })
        ));
        assert!(matches!(
            bus.publish_watch(QuoteReceived { lead_id: 1 }),
            Err(EventBusError::KindMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn queue_hands_out_its_receiver_once() {
        let bus = EventBus::new();
        let _inbox = bus.subscribe_mpsc::<MailerJob>(4).expect("first take");
        assert!(matches!(
            bus.subscribe_mpsc::<MailerJob>(4),
            Err(EventBusError::ReceiverTaken { .. })
        ));
    }

    #[tokio::test]
    async fn queue_delivers_in_order() {
        let bus = EventBus::new();
        let mut inbox = bus.subscribe_mpsc::<MailerJob>(4).expect("subscribe");

        for sequence in 0..3 {
            bus.publish_mpsc(MailerJob { sequence }).expect("publish");
        }
        for sequence in 0..3 {
            assert_eq!(inbox.next_event().await.expect("job").sequence, sequence);
        }
    }

    #[tokio::test]
    async fn queue_rejects_when_full() {
        let bus = EventBus::new();
        let mut inbox = bus.subscribe_mpsc::<MailerJob>(1).expect("subscribe");

        bus.publish_mpsc(MailerJob { sequence: 0 }).expect("fits");
        assert!(matches!(
            bus.publish_mpsc(MailerJob { sequence: 1 }),
            Err(EventBusError::ChannelFull { .. })
        ));

        assert_eq!(inbox.next_event().await.expect("drain").sequence, 0);
        bus.publish_mpsc(MailerJob { sequence: 2 }).expect("room again");
    }

    #[tokio::test]
    async fn queue_reports_closed_after_receiver_drop() {
        let bus = EventBus::new();
        let inbox = bus.subscribe_mpsc::<MailerJob>(2).expect("subscribe");
        drop(inbox);

        assert!(matches!(
            bus.publish_mpsc(MailerJob { sequence: 0 }),
            Err(EventBusError::Closed { .. })
        ));
    }

    #[tokio::test]
    async fn watch_keeps_only_the_latest() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_watch(StageSnapshot::default()).expect("subscribe");

        bus.publish_watch(StageSnapshot { scroll: 0.25 }).expect("publish");
        bus.publish_watch(StageSnapshot { scroll: 0.5 }).expect("publish");

        let latest = rx.next_event().await.expect("changed");
        assert!((latest.scroll - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn watch_seeds_from_first_publish() {
        let bus = EventBus::new();
        bus.publish_watch(StageSnapshot { scroll: 0.75 }).expect("publish");

        // The late subscriber's initial is discarded; the channel already
        // holds a value.
        let rx = bus.subscribe_watch(StageSnapshot::default()).expect("subscribe");
        assert!((rx.borrow().scroll - 0.75).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn lagged_subscriber_resumes_from_oldest_retained() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_with_capacity::<QuoteReceived>(2).expect("subscribe");

        for lead_id in 1..=4 {
            bus.publish(QuoteReceived { lead_id }).expect("publish");
        }

        // Ring of two: ids 1 and 2 are gone, delivery resumes at 3.
        assert_eq!(rx.next_event().await.expect("resume").lead_id, 3);
        assert_eq!(rx.next_event().await.expect("next").lead_id, 4);
    }

    #[tokio::test]
    async fn shutdown_closes_every_channel() {
        let bus = EventBus::new();
        let mut quotes = bus.subscribe::<QuoteReceived>().expect("subscribe");
        let _stage = bus.subscribe_watch(StageSnapshot::default()).expect("subscribe");

        assert_eq!(bus.shutdown(), 2);
        assert!(quotes.next_event().await.is_none(), "sender gone after shutdown");
    }

    #[tokio::test]
    async fn dropping_the_last_bus_handle_closes_receivers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<QuoteReceived>().expect("subscribe");
        drop(bus);

        assert!(rx.next_event().await.is_none());
    }

    #[tokio::test]
    async fn concurrent_publishers_all_deliver() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_with_capacity::<QuoteReceived>(128).expect("subscribe");

        let first = tokio::spawn({
            let bus = bus.clone();
            async move {
                for lead_id in 0..50 {
                    bus.publish(QuoteReceived { lead_id }).expect("publish");
                }
            }
        });
        let second = tokio::spawn({
            let bus = bus.clone();
            async move {
                for lead_id in 50..100 {
                    bus.publish(QuoteReceived { lead_id }).expect("publish");
                }
            }
        });
        first.await.expect("join");
        second.await.expect("join");

        for _ in 0..100 {
            assert!(rx.next_event().await.is_some(), "all events arrive");
        }
    }

    #[tokio::test]
    async fn invalid_capacity_is_rejected() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.subscribe_with_capacity::<QuoteReceived>(0),
            Err(EventBusError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            bus.subscribe_mpsc::<MailerJob>(0),
            Err(EventBusError::InvalidCapacity { .. })
        ));
    }
}
