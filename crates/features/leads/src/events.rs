//! Bus integration for lead signals.
//!
//! A stored quote is fanned out as a broadcast so side channels
//! (notifications, future CRM sync) can react without the request path
//! knowing about them.

use atelier_event_bus::EventBus;
use tracing::warn;

use crate::error::LeadsError;
use crate::model::Lead;

/// Broadcast raised after a quote request lands in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSubmitted {
    pub lead: Lead,
}

/// Registers the broadcast channel so its kind is fixed before any
/// publisher races a subscriber.
///
/// # Errors
/// Returns [`LeadsError::Bus`] if a channel of a different kind already
/// exists for [`LeadSubmitted`].
pub fn register(bus: &EventBus) -> Result<(), LeadsError> {
    drop(bus.subscribe::<LeadSubmitted>()?);
    Ok(())
}

/// Fans a stored lead out to subscribers. Best-effort by contract: the
/// lead is already persisted, so a bus failure is logged, not returned.
pub fn announce(bus: &EventBus, lead: Lead) {
    if let Err(error) = bus.publish(LeadSubmitted { lead }) {
        warn!(%error, "Failed to broadcast stored lead");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BudgetRange, LeadStatus, ProjectType, Timeline};

    fn sample_lead() -> Lead {
        Lead {
            id: "a1".into(),
            created_at: "2026-01-05T12:00:00.000000Z".into(),
            name: "Ada".into(),
            company: None,
            email: "ada@example.com".into(),
            phone: None,
            project_type: ProjectType::Website,
            budget_range: BudgetRange::NotSure,
            timeline: Timeline::Flexible,
            message: None,
            status: LeadStatus::New,
            file_url: None,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_announced_leads() {
        let bus = EventBus::new();
        register(&bus).expect("register broadcast channel");

        let mut receiver = bus.subscribe::<LeadSubmitted>().expect("subscribe");
        announce(&bus, sample_lead());

        let event = receiver.recv().await.expect("receive");
        assert_eq!(event.lead.email, "ada@example.com");
    }

    #[test]
    fn announce_without_subscribers_is_silent() {
        // The registration receiver is dropped immediately; publishing into
        // the empty channel must not error out of the request path.
        let bus = EventBus::new();
        register(&bus).expect("register broadcast channel");
        announce(&bus, sample_lead());
    }
}
