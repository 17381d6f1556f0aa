//! Presentation helpers for the admin pipeline.
//!
//! Timestamps are stored as RFC 3339 strings; both helpers take the
//! rendering clock as a parameter so they stay pure and testable.

use crate::model::LeadStatus;
use chrono::{DateTime, Utc};

impl LeadStatus {
    /// Badge color token for the pipeline UI.
    #[must_use]
    pub const fn accent(self) -> &'static str {
        match self {
            Self::New => "blue",
            Self::Contacted => "yellow",
            Self::Qualified => "green",
            Self::Closed => "gray",
        }
    }
}

/// Buckets a submission timestamp relative to `now`: "Just now" under a
/// minute, then minutes, hours and days, then the calendar date past a
/// week. Unparseable input is echoed back rather than replaced.
#[must_use]
pub fn relative_time(created_at: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(created_at) else {
        return created_at.to_owned();
    };

    let seconds = (now - then.with_timezone(&Utc)).num_seconds();
    if seconds < 60 {
        return "Just now".to_owned();
    }
    if seconds < 3600 {
        return format!("{}m ago", seconds / 60);
    }
    if seconds < 86_400 {
        return format!("{}h ago", seconds / 3600);
    }
    if seconds < 604_800 {
        return format!("{}d ago", seconds / 86_400);
    }
    format_date(created_at)
}

/// `"Jan 5, 2026"`-style date, or the raw string when it does not parse.
#[must_use]
pub fn format_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map_or_else(|_| created_at.to_owned(), |then| then.format("%b %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn buckets_follow_the_age_of_the_lead() {
        let now = noon();

        assert_eq!(relative_time("2026-01-05T11:59:30Z", now), "Just now");
        assert_eq!(relative_time("2026-01-05T11:55:00Z", now), "5m ago");
        assert_eq!(relative_time("2026-01-05T09:00:00Z", now), "3h ago");
        assert_eq!(relative_time("2026-01-03T12:00:00Z", now), "2d ago");
        assert_eq!(relative_time("2025-11-20T08:30:00Z", now), "Nov 20, 2025");
    }

    #[test]
    fn bucket_edges_round_down() {
        let now = noon();

        assert_eq!(relative_time("2026-01-05T11:59:01Z", now), "Just now");
        assert_eq!(relative_time("2026-01-05T11:59:00Z", now), "1m ago");
        assert_eq!(relative_time("2026-01-05T11:00:01Z", now), "59m ago");
        assert_eq!(relative_time("2025-12-29T12:00:01Z", now), "6d ago");
        assert_eq!(relative_time("2025-12-29T12:00:00Z", now), "Dec 29, 2025");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        // Clock skew between server and browser must not show "-1m ago".
        assert_eq!(relative_time("2026-01-05T12:03:00Z", noon()), "Just now");
    }

    #[test]
    fn garbage_timestamps_echo_through() {
        assert_eq!(relative_time("yesterday-ish", noon()), "yesterday-ish");
        assert_eq!(format_date("yesterday-ish"), "yesterday-ish");
    }

    #[test]
    fn single_digit_days_have_no_padding() {
        assert_eq!(format_date("2026-03-07T00:00:00Z"), "Mar 7, 2026");
    }

    #[test]
    fn every_status_has_an_accent() {
        for status in LeadStatus::ALL {
            assert!(!status.accent().is_empty());
        }
    }
}
