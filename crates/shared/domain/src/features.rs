//! Feature switches for the deployable surface.
//!
//! The studio ships one binary; which slices it boots is decided here.
//! [`FeatureSet`] rides inside [`ApiConfig`](crate::config::ApiConfig) and
//! accepts either raw bits (stable across key renames) or a readable token
//! list such as `"motion,leads"` in config files and environment overrides.

use crate::constants::{IDENTITY, LEADS, MOTION};
use bitflags::bitflags;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// The slices a deployment boots.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct FeatureSet: u32 {
        /// Scroll choreography, capability tiers, the ambient field.
        const MOTION = 1 << 0;
        /// Public quote intake plus the staff lead pipeline.
        const LEADS = 1 << 1;
        /// Staff accounts and session auth.
        const IDENTITY = 1 << 2;

        const ALL = Self::MOTION.bits() | Self::LEADS.bits() | Self::IDENTITY.bits();
    }
}

impl FeatureSet {
    /// Single-bit flags paired with their config tokens.
    const KEYED: [(Self, &'static str); 3] =
        [(Self::MOTION, MOTION), (Self::LEADS, LEADS), (Self::IDENTITY, IDENTITY)];

    fn from_token(token: &str) -> Self {
        match token {
            MOTION => Self::MOTION,
            LEADS => Self::LEADS,
            IDENTITY => Self::IDENTITY,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

/// Everything on. Deployments opt slices out, never in.
impl Default for FeatureSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Parses a comma-separated token list. Unknown tokens contribute nothing,
/// so a stale config keeps booting the slices it still names.
impl From<&str> for FeatureSet {
    fn from(list: &str) -> Self {
        list.split(',').map(str::trim).map(Self::from_token).fold(Self::empty(), Self::union)
    }
}

impl From<u32> for FeatureSet {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        if self.contains(Self::ALL) {
            return f.write_str("all");
        }
        let mut sep = "";
        for (flag, key) in Self::KEYED {
            if self.contains(flag) {
                write!(f, "{sep}{key}")?;
                sep = ",";
            }
        }
        Ok(())
    }
}

impl Serialize for FeatureSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FeatureSetVisitor)
    }
}

struct FeatureSetVisitor;

impl Visitor<'_> for FeatureSetVisitor {
    type Value = FeatureSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("feature bits or a token list like \"motion,leads\"")
    }

    fn visit_u64<E: de::Error>(self, bits: u64) -> Result<Self::Value, E> {
        // Retain unknown bits so configs written by newer builds still load.
        u32::try_from(bits).map(FeatureSet::from_bits_retain).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, bits: i64) -> Result<Self::Value, E> {
        u32::try_from(bits).map(FeatureSet::from_bits_retain).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, list: &str) -> Result<Self::Value, E> {
        Ok(FeatureSet::from(list))
    }
}
