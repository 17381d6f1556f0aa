//! Record-access provisioning for scoped database sessions.

use crate::error::DatabaseError;
use ed25519_dalek::SigningKey;
use getrandom::fill;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

/// Name of the record access registered at startup. Session tokens carry it
/// in their `ac` claim so the engine knows which access rules apply.
pub(crate) const ACCESS_NAME: &str = "staff";

/// Claim set SurrealDB expects on a record-access token.
#[derive(Debug, Serialize)]
struct AccessClaims<'a> {
    ns: &'a str,
    db: &'a str,
    ac: &'a str,
    id: &'a str,
    exp: i64,
}

/// Ephemeral Ed25519 key pair scoped to one engine process.
///
/// The private half signs session tokens, the public half is handed to the
/// engine via [`AccessKeys::define_access`]. Keys never touch disk; a restart
/// rotates the pair and invalidates every outstanding token.
#[derive(Debug)]
pub(crate) struct AccessKeys {
    signing_key: EncodingKey,
    public_key_hex: String,
}

impl AccessKeys {
    /// Draws a fresh key pair from OS entropy.
    pub(crate) fn generate() -> Result<Self, DatabaseError> {
        let mut seed = [0u8; 32];
        fill(&mut seed).map_err(|source| DatabaseError::Internal {
            message: source.to_string().into(),
            context: Some("Drawing entropy for the access keys".into()),
        })?;

        let keys = SigningKey::from_bytes(&seed);
        Ok(Self {
            signing_key: EncodingKey::from_ed_der(keys.to_bytes().as_ref()),
            public_key_hex: hex::encode(keys.verifying_key().to_bytes()),
        })
    }

    /// Registers the record access on the connected database so the engine
    /// can verify tokens minted by [`AccessKeys::issue`]. `OVERWRITE` keeps
    /// restarts idempotent.
    pub(crate) async fn define_access(&self, conn: &Surreal<Any>) -> Result<(), DatabaseError> {
        conn.query(format!(
            "DEFINE ACCESS OVERWRITE {ACCESS_NAME} ON DATABASE TYPE RECORD \
             WITH JWT ALGORITHM EDDSA KEY $public_key;"
        ))
        .bind(("public_key", self.public_key_hex.clone()))
        .await?
        .check()
        .map_err(|source| DatabaseError::Auth {
            message: source.to_string().into(),
            context: Some("Registering the record access".into()),
        })?;

        Ok(())
    }

    /// Mints a signed record-access token for `record` (a full `user:...` id),
    /// valid for `ttl_seconds`.
    pub(crate) fn issue(
        &self,
        ns: &str,
        db: &str,
        record: &str,
        ttl_seconds: i64,
    ) -> Result<String, DatabaseError> {
        let claims = AccessClaims {
            ns,
            db,
            ac: ACCESS_NAME,
            id: record,
            exp: (chrono::Utc::now() + chrono::Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(&Header::new(Algorithm::EdDSA), &claims, &self.signing_key).map_err(|source| {
            DatabaseError::Auth {
                message: source.to_string().into(),
                context: Some("Signing the record-access token".into()),
            }
        })
    }
}
