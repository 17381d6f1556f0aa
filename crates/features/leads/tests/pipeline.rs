#![cfg(feature = "server")]

use atelier_database::Database;
use atelier_event_bus::EventBus;
use atelier_leads::model::{LeadStatus, ProjectType, QuoteSubmission};
use atelier_leads::repository::LeadRepository;
use atelier_leads::{LeadsError, events, init, validation};
use std::time::Duration;

async fn mem_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("atelier_test", "leads")
        .init()
        .await
        .expect("connect to mem://")
}

fn submission(name: &str, email: &str) -> QuoteSubmission {
    QuoteSubmission {
        name: name.into(),
        company: "Lovelace Ltd".into(),
        email: email.into(),
        phone: "+44 20 7946 0958".into(),
        project_type: "automation".into(),
        budget_range: "35k-75k".into(),
        timeline: "3-6-months".into(),
        message: "We drown in spreadsheets".into(),
    }
}

#[tokio::test]
async fn submissions_flow_through_the_pipeline() {
    let repo = LeadRepository::new(mem_db().await);

    let first = repo
        .create(validation::validate(&submission("Ada", "ada@example.com")).expect("valid"))
        .await
        .expect("create first");
    // Ordering is by timestamp; keep the second strictly later.
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = repo
        .create(validation::validate(&submission("Grace", "grace@example.com")).expect("valid"))
        .await
        .expect("create second");

    let all = repo.list(None).await.expect("list");
    assert_eq!(
        all.iter().map(|lead| lead.id.as_str()).collect::<Vec<_>>(),
        vec![second.id.as_str(), first.id.as_str()],
        "newest first"
    );
    assert!(all.iter().all(|lead| lead.status == LeadStatus::New));

    let moved = repo.update_status(&first.id, LeadStatus::Contacted).await.expect("move");
    assert_eq!(moved.id, first.id);
    assert_eq!(moved.status, LeadStatus::Contacted);
    assert_eq!(moved.name, "Ada", "update must not disturb other fields");

    let contacted = repo.list(Some(LeadStatus::Contacted)).await.expect("filtered list");
    assert_eq!(contacted.len(), 1);
    assert_eq!(contacted[0].id, first.id);

    let stats = repo.stats().await.expect("stats");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.new, 1);
    assert_eq!(stats.contacted, 1);
    assert_eq!(stats.qualified, 0);
    assert_eq!(stats.closed, 0);
}

#[tokio::test]
async fn stored_leads_round_trip_verbatim() {
    let repo = LeadRepository::new(mem_db().await);

    let created = repo
        .create(validation::validate(&submission("Ada", "ada@example.com")).expect("valid"))
        .await
        .expect("create");

    assert_eq!(created.project_type, ProjectType::Automation);
    assert_eq!(created.company.as_deref(), Some("Lovelace Ltd"));
    assert!(created.created_at.ends_with('Z'), "timestamps are stored as UTC");

    let listed = repo.list(None).await.expect("list");
    assert_eq!(listed, vec![created], "read-back matches what create returned");
}

#[tokio::test]
async fn blank_optionals_store_as_absent() {
    let repo = LeadRepository::new(mem_db().await);

    let mut sparse = submission("Ada", "ada@example.com");
    sparse.company = String::new();
    sparse.phone = "  ".into();
    sparse.message = String::new();

    let created =
        repo.create(validation::validate(&sparse).expect("valid")).await.expect("create");
    let listed = repo.list(None).await.expect("list");

    assert_eq!(created.company, None);
    assert_eq!(listed[0].phone, None);
    assert_eq!(listed[0].message, None);
    assert_eq!(listed[0].file_url, None);
}

#[tokio::test]
async fn moving_an_unknown_lead_is_not_found() {
    let repo = LeadRepository::new(mem_db().await);

    let err = repo.update_status("missing", LeadStatus::Closed).await.expect_err("no such lead");
    assert!(matches!(err, LeadsError::NotFound { .. }));
}

#[tokio::test]
async fn empty_pipeline_stats_are_zero() {
    let repo = LeadRepository::new(mem_db().await);

    let stats = repo.stats().await.expect("stats");
    assert_eq!(stats.total, 0);
    assert_eq!(stats.of(LeadStatus::New), 0);
}

#[tokio::test]
async fn init_creates_slice_and_fixes_the_broadcast_channel() {
    let db = mem_db().await;
    let bus = EventBus::new();

    let slice = init(&db, &bus).expect("init");
    assert!(slice.is::<atelier_leads::Leads>());

    // Re-init must tolerate the already-registered channel.
    init(&db, &bus).expect("second init");

    let mut receiver = bus.subscribe::<events::LeadSubmitted>().expect("subscribe");
    let repo = LeadRepository::new(db);
    let created = repo
        .create(validation::validate(&submission("Ada", "ada@example.com")).expect("valid"))
        .await
        .expect("create");
    events::announce(&bus, created.clone());

    let event = receiver.recv().await.expect("event");
    assert_eq!(event.lead.id, created.id);
}
