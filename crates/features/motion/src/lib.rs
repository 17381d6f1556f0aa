//! # Motion System
//!
//! The choreography layer behind the studio site: one capability decision at
//! mount fans out into smooth scrolling, the particle backdrop, the entrance
//! intro, viewport reveals and the navigation chrome.
//!
//! ## Architecture
//!
//! Everything here is deterministic, synchronous state driven by explicit
//! clocks: callers pass frame timestamps in, render values come out. The
//! split follows the runtime data flow:
//!
//! 1. **Capability ([`capability`]):** samples environment signals once and
//!    resolves a visual [`capability::Tier`] with a reason trail.
//! 2. **Inputs ([`scroll`], [`hub`]):** the interpolated scroll engine and
//!    the interaction hub that fans scroll velocity and pointer attractors
//!    out to consumers, one writer per field.
//! 3. **Surfaces ([`field`], [`intro`], [`reveal`], [`chrome`], [`stage`]):**
//!    the particle simulation, the entrance timeline, per-element reveals,
//!    navbar state and the backdrop stage.
//! 4. **Conductor ([`director`]):** advances all of the above in a fixed
//!    per-frame order so no consumer ever sees half-updated state.
//!
//! Heavier effects degrade tier by tier; content never does. A reduced-motion
//! preference wins over every other signal, and the `server` feature adds
//! the event-bus mirror ([`events`]) plus the feature slice used by the API
//! process.
//!
//! ## Determinism
//!
//! The particle field allocates from an explicit seed and the whole system
//! is advanced by timestamps, never wall clocks, so a frame sequence can be
//! replayed in tests byte for byte.

pub mod capability;
pub mod chrome;
pub mod debug;
pub mod director;
pub mod ease;
mod error;
#[cfg(feature = "server")]
pub mod events;
pub mod field;
pub mod hub;
pub mod intro;
pub mod lock;
pub mod reveal;
pub mod scroll;
pub mod stage;

pub use crate::error::{MotionError, MotionErrorExt};

use atelier_domain::config::MotionConfig;

/// Motion feature state shared with the API process.
#[atelier_derive::atelier_slice]
pub struct Motion {
    pub config: MotionConfig,
}

/// Initialize the motion feature.
///
/// Registers the intro-completion watch channel so its kind is fixed before
/// any client races it, and captures the motion configuration for handlers
/// that surface debug flags.
///
/// # Errors
/// Returns [`MotionError::Bus`] if the completion channel already exists
/// with a different kind.
#[cfg(feature = "server")]
pub fn init(
    config: &atelier_domain::config::ApiConfig,
    events: &atelier_event_bus::EventBus,
) -> Result<atelier_kernel::domain::registry::InitializedSlice, MotionError> {
    events::register(events)?;

    tracing::info!("Motion server slice initialized");

    let inner = MotionInner { config: config.motion.clone() };

    let slice = Motion::new(inner);

    Ok(atelier_kernel::domain::registry::InitializedSlice::new(slice))
}
