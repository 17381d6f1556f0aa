//! Entity names and feature keys shared across crates.
//! Table names match the migration scripts; feature keys match `FeatureSet`.

/// `lead` table (quote requests).
pub const LEAD: &str = "lead";
/// `user` table (studio staff accounts).
pub const USER: &str = "user";
/// `migration` table (applied schema scripts).
pub const MIGRATION: &str = "migration";

/// Motion choreography feature key.
pub const MOTION: &str = "motion";
/// Lead intake feature key.
pub const LEADS: &str = "leads";
/// Identity/auth feature key.
pub const IDENTITY: &str = "identity";

/// Session-store flag set once the intro has fully played for a visitor.
pub const INTRO_PLAYED: &str = "intro_played";

/// `OpenAPI` tag for system endpoints (health).
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the content catalog endpoint.
pub const CONTENT_TAG: &str = "Content";
/// `OpenAPI` tag for lead intake endpoints.
pub const LEADS_TAG: &str = "Leads";
/// `OpenAPI` tag for auth endpoints.
pub const AUTH_TAG: &str = "Auth";
