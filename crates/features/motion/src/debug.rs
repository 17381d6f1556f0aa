//! QA query flags and the debug readout.
//!
//! Showcase and debugging behavior hides behind query-string switches so
//! production visitors never see it: `motion=1` forces animations past a
//! reduced-motion preference, `motionBoost=1` selects the larger reveal
//! profile, `motionDebug=1` renders the tier badge and `fieldDebug=1` the
//! field statistics. Server configuration can pin any switch on for a whole
//! deployment (preview environments); the query can only add, never remove.

use atelier_domain::config::MotionConfig;
use serde::{Deserialize, Serialize};

/// Parsed motion switches for one page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionFlags {
    pub force_motion: bool,
    pub boost: bool,
    pub tier_debug: bool,
    pub field_debug: bool,
}

impl MotionFlags {
    /// Parses flags from a raw query string (leading `?` tolerated).
    /// Unknown keys and malformed pairs are ignored.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut flags = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if value != "1" {
                continue;
            }
            match key {
                "motion" => flags.force_motion = true,
                "motionBoost" => flags.boost = true,
                "motionDebug" => flags.tier_debug = true,
                "fieldDebug" => flags.field_debug = true,
                _ => {}
            }
        }
        flags
    }

    /// Overlays deployment configuration; either source can switch a flag on.
    #[must_use]
    pub const fn overlay(self, config: &MotionConfig) -> Self {
        Self {
            force_motion: self.force_motion || config.force_motion,
            boost: self.boost || config.boost,
            tier_debug: self.tier_debug || config.tier_debug,
            field_debug: self.field_debug || config.field_debug,
        }
    }

    /// Folds the resolved flags back into a [`MotionConfig`] for components
    /// that take configuration rather than flags.
    #[must_use]
    pub fn into_config(self, base: &MotionConfig) -> MotionConfig {
        MotionConfig {
            force_motion: self.force_motion,
            boost: self.boost,
            tier_debug: self.tier_debug,
            field_debug: self.field_debug,
            tier_override: base.tier_override,
        }
    }
}

/// One-line diagnostics for the on-page badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugReadout {
    pub tier: u8,
    pub reason: String,
    pub points: usize,
    pub animating: bool,
    pub paused: bool,
    pub backdrop_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_switches() {
        let flags = MotionFlags::from_query("motion=1&motionBoost=1&motionDebug=1&fieldDebug=1");
        assert_eq!(flags, MotionFlags {
            force_motion: true,
            boost: true,
            tier_debug: true,
            field_debug: true
        });
    }

    #[test]
    fn tolerates_leading_question_mark_and_noise() {
        let flags = MotionFlags::from_query("?utm_source=x&motion=1&broken&=1&motionDebug=0");
        assert!(flags.force_motion);
        assert!(!flags.tier_debug, "only the literal value 1 activates a switch");
        assert!(!flags.boost);
    }

    #[test]
    fn empty_query_means_production_defaults() {
        assert_eq!(MotionFlags::from_query(""), MotionFlags::default());
    }

    #[test]
    fn config_can_pin_flags_on_but_query_cannot_remove() {
        let config = MotionConfig { boost: true, ..MotionConfig::default() };
        let flags = MotionFlags::from_query("motion=1").overlay(&config);
        assert!(flags.force_motion);
        assert!(flags.boost, "deployment pin survives a query without the switch");
    }

    #[test]
    fn into_config_preserves_the_tier_override() {
        let base = MotionConfig { tier_override: Some(2), ..MotionConfig::default() };
        let config = MotionFlags::from_query("fieldDebug=1").into_config(&base);
        assert!(config.field_debug);
        assert_eq!(config.tier_override, Some(2));
    }
}
