//! SurrealDB storage gateway for staff accounts.

use crate::credentials;
use crate::error::{IdentityError, IdentityErrorExt};
use crate::model::StaffUser;
use atelier_database::Database;
use atelier_domain::config::AdminSeedConfig;
use atelier_kernel::safe_nanoid;
use atelier_kernel::security::resource::ResourceGuard;
use chrono::{SecondsFormat, Utc};
use surrealdb::types::SurrealValue;
use tracing::{debug, info};

/// Explicit projection; `id.id()` unwraps the record id to its string key.
const USER_FIELDS: &str = "id.id() AS id, email, display_name, password_hash, salt, created_at";

/// Storage shape of a staff account, credentials included. Never goes over
/// the wire: handlers convert to [`StaffUser`] before responding.
#[derive(Debug, SurrealValue)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: String,
}

impl UserRow {
    pub fn into_user(self) -> StaffUser {
        StaffUser {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct UserWrite {
    email: String,
    display_name: String,
    password_hash: String,
    salt: String,
    created_at: String,
}

/// Storage gateway for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Looks a staff account up by email (stored lowercased).
    ///
    /// # Errors
    /// Returns [`IdentityError::Storage`] on query failure.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, IdentityError> {
        let mut response = self
            .db
            .query(format!("SELECT {USER_FIELDS} FROM user WHERE email = $email LIMIT 1"))
            .bind(("email", email.to_owned()))
            .await
            .context("Looking up staff account")?;

        let row = response.take::<Option<UserRow>>(0).context("Parsing staff account")?;
        Ok(row)
    }

    /// Looks a staff account up by record id key.
    ///
    /// # Errors
    /// Returns [`IdentityError::Credentials`] when the id points outside the
    /// `user` table and [`IdentityError::Storage`] on query failure.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserRow>, IdentityError> {
        // Session subjects come from our own tokens; one naming a foreign
        // table is tampered or stale and must not reach the query.
        let key = ResourceGuard::key(id, "user").map_err(|err| IdentityError::Credentials {
            message: err.to_string().into(),
            context: Some("Session subject failed table validation".into()),
        })?;

        let mut response = self
            .db
            .query(format!("SELECT {USER_FIELDS} FROM ONLY type::thing('user', $id)"))
            .bind(("id", key))
            .await
            .context("Loading staff account")?;

        let row = response.take::<Option<UserRow>>(0).context("Parsing staff account")?;
        Ok(row)
    }

    /// Creates a staff account with freshly derived credentials.
    ///
    /// # Errors
    /// Returns [`IdentityError::Internal`] if hashing fails and
    /// [`IdentityError::Storage`] if the insert fails.
    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<StaffUser, IdentityError> {
        let salt = credentials::generate_salt()?;
        let password_hash = credentials::hash_password(password, &salt)?;

        let user = StaffUser {
            id: safe_nanoid!(),
            email: email.trim().to_lowercase(),
            display_name: display_name.to_owned(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let row = UserWrite {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            password_hash,
            salt,
            created_at: user.created_at.clone(),
        };

        self.db
            .query("CREATE type::thing('user', $id) CONTENT $user RETURN NONE")
            .bind(("id", user.id.clone()))
            .bind(("user", row))
            .await
            .context("Storing staff account")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Storing staff account")?;

        debug!(id = %user.id, "Staff account stored");
        Ok(user)
    }

    /// Number of staff accounts.
    ///
    /// # Errors
    /// Returns [`IdentityError::Storage`] on query failure.
    pub async fn count(&self) -> Result<u64, IdentityError> {
        let mut response = self
            .db
            .query("(SELECT count() FROM user GROUP ALL)[0].count OR 0")
            .await
            .context("Counting staff accounts")?;

        let count = response.take::<Option<u64>>(0).context("Parsing account count")?;
        Ok(count.unwrap_or_default())
    }

    /// Seeds the first staff account from config when the table is empty.
    /// A non-empty table is left untouched, so redeploys never clobber
    /// credentials that were rotated in production.
    ///
    /// # Errors
    /// Returns [`IdentityError::Storage`] if the count or insert fails.
    pub async fn seed_admin(&self, seed: &AdminSeedConfig) -> Result<(), IdentityError> {
        if self.count().await? > 0 {
            debug!("Staff accounts present, skipping admin seed");
            return Ok(());
        }

        let user = self.create(&seed.email, &seed.display_name, &seed.password).await?;
        info!(id = %user.id, email = %user.email, "Seeded first staff account");
        Ok(())
    }
}
