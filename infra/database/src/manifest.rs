//! Built-in migration manifest.
//!
//! Each slice that owns persistent tables contributes a versioned script
//! here. Scripts must stay append-only: once a `{slice_key}:{version}` pair
//! has shipped, edits require a new version (the runner rejects checksum
//! drift on applied entries).

use crate::migrations::Migration;

const ENGINE_0001: &str = r"
DEFINE TABLE OVERWRITE migration SCHEMAFULL PERMISSIONS NONE;
DEFINE FIELD OVERWRITE slice_key ON migration TYPE string;
DEFINE FIELD OVERWRITE version ON migration TYPE string;
DEFINE FIELD OVERWRITE checksum ON migration TYPE string;
DEFINE FIELD OVERWRITE applied_at ON migration TYPE datetime DEFAULT time::now();
";

const LEADS_0001: &str = r"
DEFINE TABLE OVERWRITE lead SCHEMAFULL PERMISSIONS NONE;
DEFINE FIELD OVERWRITE name ON lead TYPE string;
DEFINE FIELD OVERWRITE company ON lead TYPE option<string>;
DEFINE FIELD OVERWRITE email ON lead TYPE string;
DEFINE FIELD OVERWRITE phone ON lead TYPE option<string>;
DEFINE FIELD OVERWRITE project_type ON lead TYPE string;
DEFINE FIELD OVERWRITE budget_range ON lead TYPE string;
DEFINE FIELD OVERWRITE timeline ON lead TYPE string;
DEFINE FIELD OVERWRITE message ON lead TYPE option<string>;
DEFINE FIELD OVERWRITE status ON lead TYPE string DEFAULT 'new';
DEFINE FIELD OVERWRITE file_url ON lead TYPE option<string>;
DEFINE FIELD OVERWRITE created_at ON lead TYPE string;
DEFINE INDEX OVERWRITE lead_status_idx ON lead FIELDS status;
DEFINE INDEX OVERWRITE lead_created_at_idx ON lead FIELDS created_at;
";

const IDENTITY_0001: &str = r"
DEFINE TABLE OVERWRITE user SCHEMAFULL PERMISSIONS NONE;
DEFINE FIELD OVERWRITE email ON user TYPE string;
DEFINE FIELD OVERWRITE display_name ON user TYPE string;
DEFINE FIELD OVERWRITE password_hash ON user TYPE string;
DEFINE FIELD OVERWRITE salt ON user TYPE string;
DEFINE FIELD OVERWRITE created_at ON user TYPE string;
DEFINE INDEX OVERWRITE user_email_idx ON user FIELDS email UNIQUE;
";

/// Returns migrations in apply order. The engine bootstrap must stay first:
/// it creates the `migration` bookkeeping table the runner confirms into.
pub(crate) const fn builtin_migrations() -> [Migration; 3] {
    [
        Migration::new("engine", "0001", ENGINE_0001),
        Migration::new("leads", "0001", LEADS_0001),
        Migration::new("identity", "0001", IDENTITY_0001),
    ]
}
