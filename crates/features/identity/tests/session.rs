#![cfg(feature = "server")]

use atelier_database::Database;
use atelier_domain::config::{ApiConfig, IdentityConfig};
use atelier_identity::repository::UserRepository;
use atelier_identity::{credentials, init};
use atelier_kernel::server::auth::{SessionRevocations, decode_session, encode_session};
use atelier_kernel::server::SessionClaims;

async fn mem_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("atelier_test", "identity")
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn init_seeds_exactly_one_admin() {
    let db = mem_db().await;
    let config = ApiConfig::default();

    let slice = init(&config, &db).await.expect("init");
    assert!(slice.is::<atelier_identity::Identity>());

    let repo = UserRepository::new(db.clone());
    assert_eq!(repo.count().await.expect("count"), 1);

    // A second boot against the same data must not reseed.
    init(&config, &db).await.expect("second init");
    assert_eq!(repo.count().await.expect("count"), 1);
}

#[tokio::test]
async fn seeded_admin_credentials_verify() {
    let db = mem_db().await;
    let config = ApiConfig::default();
    init(&config, &db).await.expect("init");

    let seed = &config.security.identity.admin;
    let repo = UserRepository::new(db);
    let row = repo
        .find_by_email(&seed.email.to_lowercase())
        .await
        .expect("lookup")
        .expect("seeded account present");

    assert!(
        credentials::verify_password(&seed.password, &row.salt, &row.password_hash)
            .expect("verify"),
        "configured password must match the stored digest"
    );
    assert!(
        !credentials::verify_password("wrong", &row.salt, &row.password_hash).expect("verify"),
        "any other password must not"
    );
}

#[tokio::test]
async fn accounts_round_trip_by_email_and_id() {
    let repo = UserRepository::new(mem_db().await);

    let created =
        repo.create("Ada@Example.COM", "Ada Lovelace", "difference engine").await.expect("create");
    assert_eq!(created.email, "ada@example.com", "emails are stored lowercased");

    let by_email =
        repo.find_by_email("ada@example.com").await.expect("lookup").expect("present");
    assert_eq!(by_email.id, created.id);

    let by_id = repo.find_by_id(&created.id).await.expect("lookup").expect("present");
    assert_eq!(by_id.into_user(), created);

    assert!(repo.find_by_email("nobody@example.com").await.expect("lookup").is_none());
    assert!(repo.find_by_id("missing").await.expect("lookup").is_none());
}

#[test]
fn sign_out_revocation_blocks_a_still_valid_token() {
    let identity = IdentityConfig::default();
    let claims = SessionClaims::issue(&identity.jwt, "u1", "admin@atelier.dev");
    let token = encode_session(&identity.jwt, &claims).expect("encode");

    // The token itself stays cryptographically valid after revocation;
    // the guard must consult the revocation set to reject it.
    let revocations = SessionRevocations::from_config(&identity);
    assert!(!revocations.is_revoked(&token));

    revocations.revoke(token.clone());
    assert!(revocations.is_revoked(&token));
    assert!(decode_session(&identity.jwt, &token).is_ok());
}
