//! Server-side quote validation.
//!
//! The same checks run in the browser form for inline feedback, so the
//! messages here are written for humans, not logs. Field keys follow the
//! JSON wire names (camelCase) so the client can attach each message to
//! its input without a mapping table.

use crate::model::{BudgetRange, NewLead, ProjectType, QuoteSubmission, Timeline};
use std::collections::BTreeMap;

/// One message per offending field, keyed by wire field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Checks a raw submission and, when clean, produces the typed record.
///
/// Free-text fields are trimmed; optional ones collapse to `None` when
/// blank. Select fields must parse into their catalogs, which covers both
/// the untouched-select case (empty string) and hostile values.
///
/// # Errors
/// Returns every failed field with its form message.
pub fn validate(submission: &QuoteSubmission) -> Result<NewLead, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = submission.name.trim();
    if name.is_empty() {
        errors.insert("name".into(), "Name is required".into());
    }

    let email = submission.email.trim();
    if email.is_empty() {
        errors.insert("email".into(), "Email is required".into());
    } else if !is_valid_email(email) {
        errors.insert("email".into(), "Please enter a valid email".into());
    }

    let phone = submission.phone.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.insert("phone".into(), "Please enter a valid phone number".into());
    }

    let project_type = submission.project_type.parse::<ProjectType>().ok();
    if project_type.is_none() {
        errors.insert("projectType".into(), "Please select a project type".into());
    }

    let budget_range = submission.budget_range.parse::<BudgetRange>().ok();
    if budget_range.is_none() {
        errors.insert("budgetRange".into(), "Please select a budget range".into());
    }

    let timeline = submission.timeline.parse::<Timeline>().ok();
    if timeline.is_none() {
        errors.insert("timeline".into(), "Please select a timeline".into());
    }

    match (project_type, budget_range, timeline) {
        (Some(project_type), Some(budget_range), Some(timeline)) if errors.is_empty() => {
            Ok(NewLead {
                name: name.to_owned(),
                company: optional(&submission.company),
                email: email.to_owned(),
                phone: optional(&submission.phone),
                project_type,
                budget_range,
                timeline,
                message: optional(&submission.message),
            })
        }
        _ => Err(errors),
    }
}

/// Accepts `local@domain.tld` shapes: no whitespace, exactly one `@`,
/// at least one `.` in the domain with text on both sides.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

/// Accepts at least ten characters drawn from digits, whitespace and
/// `- + ( )`. Deliberately loose; dial strings vary too much for more.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().count() >= 10
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '+' | '(' | ')'))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_submission() -> QuoteSubmission {
        QuoteSubmission {
            name: "  Ada Lovelace  ".into(),
            company: "   ".into(),
            email: " ada@example.com ".into(),
            phone: "+1 (555) 123-4567".into(),
            project_type: "webapp".into(),
            budget_range: "15k-35k".into(),
            timeline: "1-2-months".into(),
            message: "Portal for our field teams".into(),
        }
    }

    #[test]
    fn clean_submission_is_trimmed_and_typed() {
        let lead = validate(&complete_submission()).expect("valid submission");

        assert_eq!(lead.name, "Ada Lovelace");
        assert_eq!(lead.company, None, "blank company collapses to None");
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.phone.as_deref(), Some("+1 (555) 123-4567"));
        assert_eq!(lead.project_type, ProjectType::WebApp);
        assert_eq!(lead.budget_range, BudgetRange::From15kTo35k);
        assert_eq!(lead.timeline, Timeline::OneToTwoMonths);
        assert_eq!(lead.message.as_deref(), Some("Portal for our field teams"));
    }

    #[test]
    fn blank_name_is_required() {
        let mut submission = complete_submission();
        submission.name = "   ".into();

        let errors = validate(&submission).expect_err("name missing");
        assert_eq!(errors.get("name").map(String::as_str), Some("Name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn email_distinguishes_missing_from_malformed() {
        let mut submission = complete_submission();
        submission.email = String::new();
        let errors = validate(&submission).expect_err("email missing");
        assert_eq!(errors.get("email").map(String::as_str), Some("Email is required"));

        submission.email = "ada-at-example.com".into();
        let errors = validate(&submission).expect_err("email malformed");
        assert_eq!(errors.get("email").map(String::as_str), Some("Please enter a valid email"));
    }

    #[test]
    fn email_shape_matrix() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@sub.domain.io"));
        assert!(!is_valid_email("a@b"), "domain needs a dot");
        assert!(!is_valid_email("a b@c.d"), "no whitespace in local part");
        assert!(!is_valid_email("a@b .d"), "no whitespace in domain");
        assert!(!is_valid_email("a@@b.c"), "single @ only");
        assert!(!is_valid_email("@b.c"), "local part required");
        assert!(!is_valid_email("a@.c"), "domain head required");
        assert!(!is_valid_email("a@b."), "domain tail required");
    }

    #[test]
    fn phone_is_optional_but_checked_when_present() {
        let mut submission = complete_submission();
        submission.phone = "  ".into();
        assert!(validate(&submission).is_ok(), "absent phone passes");

        submission.phone = "555-1234".into();
        let errors = validate(&submission).expect_err("too short");
        assert_eq!(
            errors.get("phone").map(String::as_str),
            Some("Please enter a valid phone number")
        );

        submission.phone = "555-CALL-NOW!".into();
        assert!(validate(&submission).is_err(), "letters rejected");
    }

    #[test]
    fn untouched_selects_report_all_three_fields() {
        let submission = QuoteSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            ..QuoteSubmission::default()
        };

        let errors = validate(&submission).expect_err("selects missing");
        assert_eq!(
            errors.get("projectType").map(String::as_str),
            Some("Please select a project type")
        );
        assert_eq!(
            errors.get("budgetRange").map(String::as_str),
            Some("Please select a budget range")
        );
        assert_eq!(errors.get("timeline").map(String::as_str), Some("Please select a timeline"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn out_of_catalog_select_is_a_field_error() {
        let mut submission = complete_submission();
        submission.project_type = "spaceship".into();

        let errors = validate(&submission).expect_err("unknown project type");
        assert!(errors.contains_key("projectType"));
    }

    #[test]
    fn whitespace_message_collapses_to_none() {
        let mut submission = complete_submission();
        submission.message = " \n\t ".into();

        let lead = validate(&submission).expect("still valid");
        assert_eq!(lead.message, None);
    }
}
