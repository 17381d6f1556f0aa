//! One-shot capability detection.
//!
//! Environment signals are sampled exactly once when the page mounts and
//! folded into a [`CapabilityProfile`] that every other motion component
//! consumes. Nothing here re-detects at runtime: window resizes and media
//! query flips after mount deliberately do not change the tier, so the
//! choreography never restarts mid-session.

use atelier_domain::config::MotionConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Viewport width (px) below which the backdrop is disabled entirely.
pub const NARROW_VIEWPORT_PX: f32 = 768.0;
/// Device pixel ratio cap applied to rendering regardless of the real ratio.
pub const PIXEL_RATIO_CAP: f32 = 2.0;
/// Assumed core count when the platform does not expose one.
pub const DEFAULT_CORES: u32 = 4;
/// Assumed pixel ratio when the platform does not expose one.
pub const DEFAULT_PIXEL_RATIO: f32 = 1.0;

/// Raw environment signals sampled once at mount.
///
/// `cores` and `device_pixel_ratio` are `None` when the platform does not
/// expose them; classification then assumes [`DEFAULT_CORES`] and
/// [`DEFAULT_PIXEL_RATIO`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvSignals {
    pub reduced_motion: bool,
    pub coarse_pointer: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub cores: Option<u32>,
    pub device_pixel_ratio: Option<f32>,
    pub save_data: bool,
}

impl EnvSignals {
    /// Placeholder used when no environment is available (prerender, tests).
    /// Conservative on every axis so downstream gates all stay closed.
    pub(crate) const ABSENT: Self = Self {
        reduced_motion: false,
        coarse_pointer: true,
        viewport_width: 0.0,
        viewport_height: 0.0,
        cores: None,
        device_pixel_ratio: None,
        save_data: false,
    };

    #[must_use]
    pub fn is_narrow(&self) -> bool {
        self.viewport_width < NARROW_VIEWPORT_PX
    }
}

/// Discrete visual fidelity level.
///
/// Tiers only ever gate *visual extras*. Content, navigation and forms work
/// identically at every tier including [`Tier::Off`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(u8)]
pub enum Tier {
    /// No backdrop at all (reduced motion, phones, missing environment).
    #[default]
    Off = 0,
    /// A sparse static field, never animated.
    Static = 1,
    /// The standard animated field.
    Animated = 2,
    /// Dense animated field for high-end desktops.
    Full = 3,
}

impl Tier {
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Maps a raw tier index to a tier, clamping out-of-range values upward.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Off,
            1 => Self::Static,
            2 => Self::Animated,
            _ => Self::Full,
        }
    }

    /// Per-tier particle budget.
    #[must_use]
    pub const fn budget(self) -> TierBudget {
        match self {
            Self::Off => TierBudget { points: 0, point_size: 0.0, opacity: 0.0, animate: false },
            Self::Static => {
                TierBudget { points: 600, point_size: 4.0, opacity: 0.65, animate: false }
            }
            Self::Animated => {
                TierBudget { points: 1500, point_size: 4.0, opacity: 0.78, animate: true }
            }
            Self::Full => {
                TierBudget { points: 2800, point_size: 3.5, opacity: 0.75, animate: true }
            }
        }
    }

    #[must_use]
    pub const fn animates(self) -> bool {
        self.budget().animate
    }
}

/// Rendering budget attached to a [`Tier`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBudget {
    /// Number of particles allocated for the backdrop.
    pub points: usize,
    /// Point sprite size in device pixels.
    pub point_size: f32,
    /// Backdrop opacity.
    pub opacity: f32,
    /// Whether the field advances every frame or stays frozen.
    pub animate: bool,
}

/// The resolved capability decision, carried through the whole page lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    pub tier: Tier,
    /// Human-readable trail of why this tier was chosen; surfaced by the
    /// debug badge and logged once at resolution time.
    pub reason: String,
    /// Effective device pixel ratio after applying [`PIXEL_RATIO_CAP`].
    pub pixel_ratio: f32,
    /// Reduced-motion preference after the force-motion override.
    pub reduced_motion: bool,
    /// The raw signals the decision was made from.
    pub signals: EnvSignals,
}

impl CapabilityProfile {
    #[must_use]
    pub const fn budget(&self) -> TierBudget {
        self.tier.budget()
    }

    /// Whether entrance animations (reveals, intro) may run at all.
    #[must_use]
    pub const fn motion_enabled(&self) -> bool {
        !self.reduced_motion
    }
}

/// Resolves the visual tier from sampled signals, applying config overrides.
///
/// Decision order (first match wins): missing environment, reduced motion,
/// small touch viewport, small viewport, save-data, then the desktop ladder
/// by core count and pixel ratio. `force_motion` neutralizes the
/// reduced-motion signal for QA sessions; `tier_override` replaces the final
/// tier while keeping the original reason in the trail.
#[must_use]
pub fn detect(signals: Option<EnvSignals>, config: &MotionConfig) -> CapabilityProfile {
    let (mut tier, mut reason, signals) = match signals {
        None => (Tier::Off, "no-environment".to_owned(), EnvSignals::ABSENT),
        Some(signals) => {
            let (tier, reason) = classify(&signals, config);
            (tier, reason, signals)
        }
    };
    if let Some(index) = config.tier_override {
        let forced = Tier::from_index(index);
        reason = format!("override({index}) was: {reason}");
        tier = forced;
    }
    let pixel_ratio =
        signals.device_pixel_ratio.unwrap_or(DEFAULT_PIXEL_RATIO).min(PIXEL_RATIO_CAP);
    let reduced_motion = signals.reduced_motion && !config.force_motion;
    info!(tier = tier.index(), reason = %reason, "Visual tier resolved");
    CapabilityProfile { tier, reason, pixel_ratio, reduced_motion, signals }
}

fn classify(signals: &EnvSignals, config: &MotionConfig) -> (Tier, String) {
    let reduced = signals.reduced_motion && !config.force_motion;
    if reduced {
        return (Tier::Off, "reduced-motion".to_owned());
    }
    if signals.coarse_pointer && signals.is_narrow() {
        return (Tier::Off, "small-touch".to_owned());
    }
    if signals.is_narrow() {
        return (Tier::Off, "small-viewport".to_owned());
    }
    if signals.save_data {
        return (Tier::Static, "save-data".to_owned());
    }
    let cores = signals.cores.unwrap_or(DEFAULT_CORES);
    let ratio = signals.device_pixel_ratio.unwrap_or(DEFAULT_PIXEL_RATIO);
    if cores >= 8 && ratio <= PIXEL_RATIO_CAP {
        (Tier::Full, format!("desktop high-end, cores={cores} dpr={ratio}"))
    } else if cores >= 4 {
        (Tier::Animated, format!("desktop mid-range, cores={cores}"))
    } else {
        (Tier::Static, format!("desktop baseline, cores={cores}"))
    }
}
