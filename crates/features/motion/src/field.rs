//! Particle field simulation.
//!
//! Owns the backdrop point cloud: a seeded spherical allocation plus a
//! per-frame advance combining ambient drift, a damped scroll push and a
//! pointer attractor. The simulation is pure data, positions in and
//! positions out, so the drawing layer can be swapped without touching the
//! math and tests drive it with explicit clocks.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    capability::{Tier, TierBudget},
    hub::InteractionSnapshot,
};

/// Radius of the spherical spawn volume, world units.
pub const SPREAD: f32 = 12.0;
/// Attractor influence radius in normalized device coordinates.
pub const ATTRACTOR_RADIUS: f32 = 1.5;
/// Distances below this are inside the dead zone and exert no force.
pub const ATTRACTOR_DEAD_ZONE: f32 = 0.01;

/// Backdrop camera distance from the origin along +Z, world units.
/// Renderers project [`ParticleField::positions`] with this same camera.
pub const CAMERA_DISTANCE: f32 = 8.0;
/// Vertical field of view of the backdrop camera.
pub const CAMERA_FOV_DEGREES: f32 = 60.0;

const DRIFT_TIME_SCALE: f64 = 0.0001;
const DRIFT_PHASE_STEP: f64 = 0.1;
const DRIFT_AMPLITUDE: f32 = 0.02;
const VELOCITY_SCALE: f64 = 0.0003;
const VELOCITY_DAMPING: f64 = 0.1;
const VELOCITY_DECAY: f64 = 0.98;
const PUSH_SCALE: f32 = 0.2;
const ATTRACTOR_STRENGTH: f32 = 0.15;

/// Screen and world-plane extents the field projects between.
///
/// The world extents describe the visible plane at the spawn volume's center
/// given the fixed backdrop camera, so attractor math stays aligned with
/// whatever actually draws the points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldViewport {
    pub screen_width: f32,
    pub screen_height: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl FieldViewport {
    /// Derives world extents from the screen size and the backdrop camera
    /// (distance 8, 60 degree vertical field of view).
    #[must_use]
    pub fn from_screen(screen_width: f32, screen_height: f32) -> Self {
        let screen_width = screen_width.max(1.0);
        let screen_height = screen_height.max(1.0);
        let world_height =
            2.0 * CAMERA_DISTANCE * (CAMERA_FOV_DEGREES.to_radians() / 2.0).tan();
        let world_width = world_height * (screen_width / screen_height);
        Self { screen_width, screen_height, world_width, world_height }
    }

    const fn aspect(&self) -> f32 {
        self.world_width / self.world_height
    }
}

#[derive(Debug)]
pub struct ParticleField {
    budget: TierBudget,
    base: Vec<Vec3>,
    current: Vec<Vec3>,
    /// Per-point scroll responsiveness in `[0.5, 1.0)`, fixed at allocation.
    multiplier: Vec<f32>,
    viewport: FieldViewport,
    damped_velocity: f64,
    velocity_offset: f64,
    paused: bool,
}

impl ParticleField {
    /// Allocates the point cloud for `tier` from a deterministic seed.
    ///
    /// Points are distributed uniformly inside a sphere of radius [`SPREAD`]
    /// (cube-root radius sampling), pulled slightly toward the camera on the
    /// z axis. The same seed always produces the same cloud.
    #[must_use]
    pub fn new(tier: Tier, seed: u64, viewport: FieldViewport) -> Self {
        let budget = tier.budget();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut base = Vec::with_capacity(budget.points);
        let mut multiplier = Vec::with_capacity(budget.points);
        for _ in 0..budget.points {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (2.0_f32.mul_add(rng.random::<f32>(), -1.0)).acos();
            let radius = rng.random::<f32>().cbrt() * SPREAD;
            base.push(Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius.mul_add(phi.cos(), -(SPREAD * 0.3)),
            ));
            multiplier.push(0.5_f32.mul_add(rng.random::<f32>(), 0.5));
        }
        let current = base.clone();
        Self {
            budget,
            base,
            current,
            multiplier,
            viewport,
            damped_velocity: 0.0,
            velocity_offset: 0.0,
            paused: false,
        }
    }

    #[must_use]
    pub const fn budget(&self) -> TierBudget {
        self.budget
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Current point positions, one [`Vec3`] per particle.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.current
    }

    pub fn set_viewport(&mut self, viewport: FieldViewport) {
        self.viewport = viewport;
    }

    /// Freezes the simulation (hidden tab, background mode).
    pub const fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advances one frame.
    ///
    /// No-op while paused or for static budgets, in which case the points
    /// hold their base positions. All terms are bounded, so positions never
    /// overflow or go NaN regardless of input magnitude.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn advance(&mut self, now_ms: f64, interaction: &InteractionSnapshot) {
        if self.paused || !self.budget.animate || self.current.is_empty() {
            return;
        }

        let target_velocity = interaction.scroll_velocity * VELOCITY_SCALE;
        self.damped_velocity += (target_velocity - self.damped_velocity) * VELOCITY_DAMPING;
        self.velocity_offset = (self.velocity_offset + self.damped_velocity) * VELOCITY_DECAY;
        let push = self.velocity_offset as f32;

        let attractor = interaction.attractor.map(|(x, y)| {
            (
                (x / self.viewport.screen_width).mul_add(2.0, -1.0),
                -((y / self.viewport.screen_height).mul_add(2.0, -1.0)),
            )
        });
        let aspect = self.viewport.aspect();
        let half_world_width = self.viewport.world_width * 0.5;
        let half_world_height = self.viewport.world_height * 0.5;

        let time = now_ms * DRIFT_TIME_SCALE;
        for (index, (current, base)) in
            self.current.iter_mut().zip(self.base.iter()).enumerate()
        {
            let drift =
                ((time + index as f64 * DRIFT_PHASE_STEP).sin() as f32) * DRIFT_AMPLITUDE;

            let (mut force_x, mut force_y) = (0.0, 0.0);
            if let Some((ax, ay)) = attractor {
                let point_x = (base.x / half_world_width) * aspect;
                let point_y = base.y / half_world_height;
                let dx = ax - point_x;
                let dy = ay - point_y;
                let distance = dx.hypot(dy);
                if distance > ATTRACTOR_DEAD_ZONE && distance < ATTRACTOR_RADIUS {
                    let strength = (1.0 - distance / ATTRACTOR_RADIUS) * ATTRACTOR_STRENGTH;
                    force_x = dx * strength;
                    force_y = dy * strength;
                }
            }

            current.x = base.x + drift + force_x;
            current.y =
                base.y + drift + (push * self.multiplier[index]).mul_add(PUSH_SCALE, force_y);
            current.z = drift.mul_add(0.5, base.z);
        }
    }
}
