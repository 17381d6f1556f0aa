use atelier_database::{Database, DatabaseError};

async fn studio_db(database: &str) -> Database {
    Database::builder()
        .url("mem://")
        .session("atelier_test", database)
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn in_memory_engine_comes_up_healthy() {
    let db = studio_db("health").await;
    db.health().await.expect("health probe");
}

#[tokio::test]
async fn init_without_url_or_session_is_refused() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn boot_settles_the_builtin_manifest() {
    let db = studio_db("migrations").await;

    let mut response = db
        .query("SELECT VALUE slice_key FROM migration ORDER BY slice_key")
        .await
        .expect("read ledger");
    let slices = response.take::<Vec<String>>(0).expect("decode ledger");
    assert_eq!(slices, vec!["engine".to_owned(), "identity".to_owned(), "leads".to_owned()]);
}

#[tokio::test]
async fn lead_rows_default_their_status() {
    let db = studio_db("leads").await;

    db.query(
        "CREATE lead:smoke SET
            name = 'Ada',
            email = 'ada@example.com',
            project_type = 'website',
            budget_range = 'not-sure',
            timeline = 'flexible',
            created_at = '2025-01-01T00:00:00.000000Z'",
    )
    .await
    .expect("insert lead")
    .check()
    .expect("schema accepts required fields");

    let mut response = db.query("SELECT VALUE status FROM lead:smoke").await.expect("read status");
    let status = response.take::<Vec<String>>(0).expect("decode status");
    assert_eq!(status, vec!["new".to_owned()]);
}

#[tokio::test]
async fn record_sessions_stay_behind_table_permissions() {
    let db = studio_db("sessions").await;

    db.query(
        "CREATE user:maren SET
            email = 'maren@example.test',
            display_name = 'Maren',
            password_hash = 'irrelevant',
            salt = 'irrelevant',
            created_at = '2025-01-01T00:00:00.000000Z'",
    )
    .await
    .expect("seed user")
    .check()
    .expect("schema accepts the user");

    // Bare keys and full record ids resolve to the same session.
    let session = db.authenticate("maren").await.expect("record session");
    db.authenticate("user:maren").await.expect("same session by record id");

    // Staff tables carry PERMISSIONS NONE, so a record session sees nothing.
    let mut response =
        session.query("SELECT VALUE email FROM user").await.expect("query as record user");
    let emails = response.take::<Vec<String>>(0).expect("decode emails");
    assert!(emails.is_empty(), "record sessions must not read staff rows");
}
