//! SurrealDB storage gateway for the lead pipeline.
//!
//! Rows travel as plain strings and are parsed back through the catalog
//! enums on the way out, so a value that drifted outside the catalogs
//! surfaces as [`LeadsError::Decode`] instead of a silent mis-bucket.

use crate::error::{LeadsError, LeadsErrorExt};
use crate::model::{Lead, LeadStats, LeadStatus, NewLead, UnknownValue};
use atelier_database::Database;
use atelier_kernel::safe_nanoid;
use atelier_kernel::security::resource::ResourceGuard;
use chrono::{SecondsFormat, Utc};
use std::str::FromStr;
use surrealdb::types::SurrealValue;
use tracing::debug;

/// Explicit projection; `id.id()` unwraps the record id to its string key.
const LEAD_FIELDS: &str = "id.id() AS id, created_at, name, company, email, phone, \
     project_type, budget_range, timeline, message, status, file_url";

#[derive(Debug, SurrealValue)]
struct LeadRow {
    id: String,
    created_at: String,
    name: String,
    company: Option<String>,
    email: String,
    phone: Option<String>,
    project_type: String,
    budget_range: String,
    timeline: String,
    message: Option<String>,
    status: String,
    file_url: Option<String>,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead, LeadsError> {
        Ok(Lead {
            id: self.id,
            created_at: self.created_at,
            name: self.name,
            company: self.company,
            email: self.email,
            phone: self.phone,
            project_type: parse_catalog(&self.project_type)?,
            budget_range: parse_catalog(&self.budget_range)?,
            timeline: parse_catalog(&self.timeline)?,
            message: self.message,
            status: parse_catalog(&self.status)?,
            file_url: self.file_url,
        })
    }
}

fn parse_catalog<T: FromStr<Err = UnknownValue>>(value: &str) -> Result<T, LeadsError> {
    value.parse().map_err(|err: UnknownValue| LeadsError::Decode {
        message: err.to_string().into(),
        context: Some("Stored lead row".into()),
    })
}

/// Write-side shape for `CREATE`; the record id travels separately as the
/// `type::thing` key, never as a body field.
#[derive(Debug, SurrealValue)]
struct LeadWrite {
    created_at: String,
    name: String,
    company: Option<String>,
    email: String,
    phone: Option<String>,
    project_type: &'static str,
    budget_range: &'static str,
    timeline: &'static str,
    message: Option<String>,
    status: &'static str,
}

/// Storage gateway for quote requests.
#[derive(Debug, Clone)]
pub struct LeadRepository {
    db: Database,
}

impl LeadRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores a validated submission and returns the full record.
    ///
    /// # Errors
    /// Returns [`LeadsError::Storage`] if the insert fails.
    pub async fn create(&self, lead: NewLead) -> Result<Lead, LeadsError> {
        let stored = Lead {
            id: safe_nanoid!(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            name: lead.name,
            company: lead.company,
            email: lead.email,
            phone: lead.phone,
            project_type: lead.project_type,
            budget_range: lead.budget_range,
            timeline: lead.timeline,
            message: lead.message,
            status: LeadStatus::New,
            file_url: None,
        };

        let row = LeadWrite {
            created_at: stored.created_at.clone(),
            name: stored.name.clone(),
            company: stored.company.clone(),
            email: stored.email.clone(),
            phone: stored.phone.clone(),
            project_type: stored.project_type.as_str(),
            budget_range: stored.budget_range.as_str(),
            timeline: stored.timeline.as_str(),
            message: stored.message.clone(),
            status: stored.status.as_str(),
        };

        self.db
            .query("CREATE type::thing('lead', $id) CONTENT $lead RETURN NONE")
            .bind(("id", stored.id.clone()))
            .bind(("lead", row))
            .await
            .context("Storing lead")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Storing lead")?;

        debug!(id = %stored.id, "Lead stored");
        Ok(stored)
    }

    /// Lists leads newest-first, optionally narrowed to one pipeline stage.
    ///
    /// # Errors
    /// Returns [`LeadsError::Storage`] on query failure and
    /// [`LeadsError::Decode`] if a stored row no longer parses.
    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>, LeadsError> {
        let mut response = match status {
            Some(status) => {
                self.db
                    .query(format!(
                        "SELECT {LEAD_FIELDS} FROM lead WHERE status = $status \
                         ORDER BY created_at DESC"
                    ))
                    .bind(("status", status.as_str()))
                    .await
            }
            None => {
                self.db
                    .query(format!("SELECT {LEAD_FIELDS} FROM lead ORDER BY created_at DESC"))
                    .await
            }
        }
        .context("Listing leads")?;

        let rows = response.take::<Vec<LeadRow>>(0).context("Parsing lead rows")?;
        rows.into_iter().map(LeadRow::into_lead).collect()
    }

    /// Counts leads per pipeline stage.
    ///
    /// # Errors
    /// Returns [`LeadsError::Storage`] on query failure and
    /// [`LeadsError::Decode`] if a stored status no longer parses.
    pub async fn stats(&self) -> Result<LeadStats, LeadsError> {
        let mut response =
            self.db.query("SELECT VALUE status FROM lead").await.context("Counting leads")?;
        let statuses = response.take::<Vec<String>>(0).context("Parsing lead statuses")?;

        let mut stats = LeadStats::default();
        for status in &statuses {
            match parse_catalog::<LeadStatus>(status)? {
                LeadStatus::New => stats.new += 1,
                LeadStatus::Contacted => stats.contacted += 1,
                LeadStatus::Qualified => stats.qualified += 1,
                LeadStatus::Closed => stats.closed += 1,
            }
            stats.total += 1;
        }
        Ok(stats)
    }

    /// Moves a lead to a new pipeline stage and returns the updated record.
    ///
    /// # Errors
    /// Returns [`LeadsError::NotFound`] for an unknown id (or one aimed at
    /// another table) and [`LeadsError::Storage`] on query failure.
    pub async fn update_status(&self, id: &str, status: LeadStatus) -> Result<Lead, LeadsError> {
        // An id naming another table answers like a missing lead, so the
        // endpoint cannot be used to probe foreign records.
        let key = ResourceGuard::key(id, "lead").map_err(|_| LeadsError::NotFound {
            message: id.to_owned().into(),
            context: Some("Id does not name a lead".into()),
        })?;

        let mut response = self
            .db
            .query("UPDATE type::thing('lead', $id) SET status = $status RETURN NONE")
            .query(format!("SELECT {LEAD_FIELDS} FROM ONLY type::thing('lead', $id)"))
            .bind(("id", key))
            .bind(("status", status.as_str()))
            .await
            .context("Updating lead status")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Updating lead status")?;

        let row = response.take::<Option<LeadRow>>(1).context("Parsing updated lead")?;
        match row {
            Some(row) => {
                debug!(%id, status = status.as_str(), "Lead status updated");
                row.into_lead()
            }
            None => Err(LeadsError::NotFound { message: id.to_owned().into(), context: None }),
        }
    }
}
