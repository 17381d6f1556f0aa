//! Embedded schema migrations.
//!
//! The runner executes the built-in manifest inside transactions and records
//! every applied script in the `migration` ledger table. On every boot the
//! checksums of settled entries are compared against the manifest, so a
//! silently edited script fails loudly instead of letting environments
//! drift apart.

use crate::error::{DatabaseError, DatabaseErrorExt};
use crate::manifest::builtin_migrations;
use fxhash::FxHashMap;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// One versioned schema script owned by a feature slice.
#[derive(Debug)]
pub(crate) struct Migration {
    pub slice_key: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub(crate) const fn new(
        slice_key: &'static str,
        version: &'static str,
        script: &'static str,
    ) -> Self {
        Self { slice_key, version, script }
    }

    /// Ledger key, unique per slice and version.
    fn key(&self) -> String {
        format!("{}:{}", self.slice_key, self.version)
    }

    /// Content fingerprint recorded next to the applied entry.
    fn checksum(&self) -> String {
        format!("{:016x}", fxhash::hash64(self.script))
    }

    /// Fails the boot when a script changed after it was applied.
    fn verify_unchanged(&self, recorded: &str) -> Result<(), DatabaseError> {
        let current = self.checksum();
        if recorded == current {
            return Ok(());
        }

        Err(DatabaseError::Migration {
            message: format!(
                "{} was edited after being applied (ledger {recorded}, script {current})",
                self.key(),
            )
            .into(),
            context: Some("Applied scripts are append-only; ship a new version".into()),
        })
    }

    fn to_applied(&self) -> AppliedMigration {
        AppliedMigration {
            slice_key: self.slice_key.to_owned(),
            version: self.version.to_owned(),
            checksum: self.checksum(),
        }
    }
}

/// What one runner pass did, for startup logging.
#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

/// A ledger row, as stored in the `migration` table.
#[derive(Debug, SurrealValue)]
pub(crate) struct AppliedMigration {
    pub slice_key: String,
    pub version: String,
    pub checksum: String,
}

/// Applies pending manifest entries over one connection.
#[derive(Debug)]
pub(crate) struct MigrationRunner {
    conn: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(conn: Surreal<Any>) -> Self {
        Self { conn }
    }

    /// Walks the manifest in order: settled entries are verified against
    /// their recorded checksum and skipped, everything else is applied.
    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        let ledger = self.applied_index().await?;
        let mut report = MigrationReport::default();

        for migration in builtin_migrations() {
            match ledger.get(&migration.key()) {
                Some(entry) => {
                    migration.verify_unchanged(&entry.checksum)?;
                    report.skipped.push(migration.to_applied());
                }
                None => {
                    self.apply(&migration).await?;
                    report.applied.push(migration.to_applied());
                }
            }
        }

        Ok(report)
    }

    /// Executes one script plus its ledger entry in a single transaction, so
    /// a failing script leaves neither schema nor bookkeeping behind.
    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let transaction = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE type::thing('migration', [$slice, $version])
                SET slice_key = $slice, version = $version, checksum = $checksum;
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.conn
            .query(&transaction)
            .bind(("slice", migration.slice_key))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!("Applying migration {}", migration.key()))?
            .check()
            .map_err(|source| DatabaseError::Migration {
                message: source.to_string().into(),
                context: Some(format!("Migration {} rolled back", migration.key()).into()),
            })?;

        Ok(())
    }

    /// Whether the `migration` ledger table exists yet. A fresh datastore
    /// has no ledger until the engine bootstrap script creates it.
    async fn ledger_exists(&self) -> Result<bool, DatabaseError> {
        let mut response = self
            .conn
            .query("(SELECT VALUE tables FROM ONLY INFO FOR DB).migration != NONE")
            .await
            .context("Probing for the migration ledger")?;

        Ok(response.take::<Option<bool>>(0)?.unwrap_or_default())
    }

    /// Settled ledger entries keyed by `slice:version`.
    async fn applied_index(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        if !self.ledger_exists().await? {
            return Ok(FxHashMap::default());
        }

        let entries = self
            .conn
            .query("SELECT slice_key, version, checksum FROM migration")
            .await
            .context("Reading the migration ledger")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Decoding ledger entries")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice_key, entry.version), entry))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksums_are_stable_and_sixteen_hex_chars() {
        for migration in builtin_migrations() {
            assert_eq!(migration.checksum(), migration.checksum());
            assert_eq!(migration.checksum().len(), 16);
        }
    }

    #[test]
    fn engine_bootstrap_runs_first() {
        let migrations = builtin_migrations();
        assert_eq!(migrations[0].slice_key, "engine");
        assert!(migrations[0].script.contains("DEFINE TABLE OVERWRITE migration"));
    }

    #[test]
    fn unchanged_scripts_pass_verification() {
        let migration = Migration::new("engine", "0001", "DEFINE TABLE demo;");
        migration.verify_unchanged(&migration.checksum()).expect("same content");
    }

    #[test]
    fn checksum_drift_is_rejected() {
        let migration = Migration::new("engine", "0001", "DEFINE TABLE demo;");
        let err = migration.verify_unchanged("deadbeefdeadbeef").unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }
}
