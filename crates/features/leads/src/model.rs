//! Lead pipeline records, their catalog enums and the wire DTOs.
//!
//! The catalog enums carry three string tables each: the canonical
//! wire/storage value (`as_str`), the human-facing option label
//! (`label`), and the serde rename that keeps JSON in lockstep with
//! `as_str`. A unit test pins the serde table to the `as_str` table so
//! they cannot drift apart.

use atelier_derive::api_model;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not one of an enum's accepted values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $kind:literal {
            $($variant:ident => $value:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))]
        $vis enum $name {
            $(#[serde(rename = $value)] $variant,)+
        }

        impl $name {
            /// Every accepted value, in form/display order.
            $vis const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical wire/storage value.
            #[must_use]
            $vis const fn as_str(self) -> &'static str {
                match self { $(Self::$variant => $value,)+ }
            }

            /// Option label shown in the quote form and the admin pipeline.
            #[must_use]
            $vis const fn label(self) -> &'static str {
                match self { $(Self::$variant => $label,)+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(UnknownValue { kind: $kind, value: other.to_owned() }),
                }
            }
        }
    };
}

catalog_enum! {
    /// Pipeline stage of a stored lead.
    pub enum LeadStatus as "status" {
        New => "new", "New";
        Contacted => "contacted", "Contacted";
        Qualified => "qualified", "Qualified";
        Closed => "closed", "Closed";
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        Self::New
    }
}

catalog_enum! {
    /// What the prospect wants built.
    pub enum ProjectType as "project type" {
        Website => "website", "Website";
        WebApp => "webapp", "Web App / Portal";
        Automation => "automation", "Automation / AI";
        Mobile => "mobile", "Mobile App";
        Other => "other", "Other / Not Sure";
    }
}

catalog_enum! {
    /// Self-reported budget bracket.
    pub enum BudgetRange as "budget range" {
        Under5k => "under-5k", "Under $5,000";
        From5kTo15k => "5k-15k", "$5,000 - $15,000";
        From15kTo35k => "15k-35k", "$15,000 - $35,000";
        From35kTo75k => "35k-75k", "$35,000 - $75,000";
        Over75k => "over-75k", "$75,000+";
        NotSure => "not-sure", "Not sure yet";
    }
}

catalog_enum! {
    /// How soon the prospect wants to start.
    pub enum Timeline as "timeline" {
        Asap => "asap", "ASAP";
        OneToTwoMonths => "1-2-months", "1-2 months";
        ThreeToSixMonths => "3-6-months", "3-6 months";
        Flexible => "flexible", "Flexible";
    }
}

/// A stored quote request, as the API returns it.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct Lead {
    pub id: String,
    /// RFC 3339 UTC timestamp recorded at submission.
    pub created_at: String,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: ProjectType,
    pub budget_range: BudgetRange,
    pub timeline: Timeline,
    pub message: Option<String>,
    pub status: LeadStatus,
    pub file_url: Option<String>,
}

/// Raw quote form payload, exactly as the form posted it.
///
/// Select fields arrive as strings (an untouched select posts `""`), so
/// absence and out-of-catalog values both surface as field errors from
/// [`crate::validation::validate`] instead of a body-level reject.
#[api_model]
#[derive(Clone, Default, PartialEq)]
#[serde(default)]
pub struct QuoteSubmission {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub project_type: String,
    pub budget_range: String,
    pub timeline: String,
    pub message: String,
}

/// A validated submission, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: ProjectType,
    pub budget_range: BudgetRange,
    pub timeline: Timeline,
    pub message: Option<String>,
}

/// Pipeline counters for the admin dashboard header.
#[api_model]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadStats {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    pub qualified: u64,
    pub closed: u64,
}

impl LeadStats {
    /// Count of a single pipeline stage.
    #[must_use]
    pub const fn of(&self, status: LeadStatus) -> u64 {
        match status {
            LeadStatus::New => self.new,
            LeadStatus::Contacted => self.contacted,
            LeadStatus::Qualified => self.qualified,
            LeadStatus::Closed => self.closed,
        }
    }
}

/// `PATCH /api/leads/{id}` body.
#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LeadStatusUpdate {
    pub status: LeadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_values_match_the_canonical_table() {
        for status in LeadStatus::ALL {
            let json = serde_json::to_value(status).expect("serialize");
            assert_eq!(json.as_str(), Some(status.as_str()));
        }
        for kind in ProjectType::ALL {
            let json = serde_json::to_value(kind).expect("serialize");
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
        for range in BudgetRange::ALL {
            let json = serde_json::to_value(range).expect("serialize");
            assert_eq!(json.as_str(), Some(range.as_str()));
        }
        for timeline in Timeline::ALL {
            let json = serde_json::to_value(timeline).expect("serialize");
            assert_eq!(json.as_str(), Some(timeline.as_str()));
        }
    }

    #[test]
    fn parse_round_trips_every_value() {
        for range in BudgetRange::ALL {
            assert_eq!(range.as_str().parse::<BudgetRange>().ok(), Some(*range));
        }
        for timeline in Timeline::ALL {
            assert_eq!(timeline.as_str().parse::<Timeline>().ok(), Some(*timeline));
        }
    }

    #[test]
    fn unknown_values_are_reported_with_their_kind() {
        let err = "spaceship".parse::<ProjectType>().expect_err("not a project type");
        assert_eq!(err.kind(), "project type");
        assert_eq!(err.value(), "spaceship");
    }

    #[test]
    fn lead_serializes_in_camel_case() {
        let lead = Lead {
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
        };

        let json = serde_json::to_value(&lead).expect("serialize");
        assert_eq!(json["createdAt"], "2026-01-05T12:00:00.000000Z");
        assert_eq!(json["projectType"], "website");
        assert_eq!(json["budgetRange"], "not-sure");
        assert_eq!(json["status"], "new");
    }

    #[test]
    fn submission_tolerates_missing_fields() {
        let submission: QuoteSubmission = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(submission, QuoteSubmission::default());
    }

    #[test]
    fn stats_expose_counts_per_stage() {
        let stats = LeadStats { total: 10, new: 4, contacted: 3, qualified: 2, closed: 1 };
        assert_eq!(stats.of(LeadStatus::New), 4);
        assert_eq!(stats.of(LeadStatus::Closed), 1);
    }
}
