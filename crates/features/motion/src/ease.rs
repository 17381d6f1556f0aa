//! Easing curves shared by the intro timeline and the reveal engine.
//!
//! All functions map a linear progress value in `[0, 1]` to an eased value in
//! the same range. Inputs outside the range are clamped so callers can feed
//! raw `elapsed / duration` ratios without pre-checking.

/// Cubic ease-out: fast start, soft landing. Used for entrance animations.
#[must_use]
pub fn ease_out_cubic(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Cubic ease-in-out: soft on both ends. Used for panel slides.
#[must_use]
pub fn ease_in_out_cubic(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0_f32.mul_add(p, -2.0)).powi(3) / 2.0
    }
}

/// A CSS-style cubic bezier timing curve anchored at `(0, 0)` and `(1, 1)`.
///
/// The curve is parameterized over `t`, while callers supply progress on the
/// x axis, so [`CubicBezier::solve`] first inverts `x(t)` numerically (Newton
/// iterations with a bisection fallback) and then samples `y(t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    const NEWTON_ITERATIONS: usize = 6;
    const BISECTION_ITERATIONS: usize = 24;
    const EPSILON: f32 = 1e-5;

    #[must_use]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a: f32, b: f32, t: f32) -> f32 {
        // Cubic bezier with P0 = 0 and P3 = 1, expanded into Horner form.
        let c3 = 3.0_f32.mul_add(a - b, 1.0);
        let c2 = 3.0_f32.mul_add(b, -6.0 * a);
        let c1 = 3.0 * a;
        ((c3 * t + c2) * t + c1) * t
    }

    fn sample_derivative(a: f32, b: f32, t: f32) -> f32 {
        let c3 = 3.0_f32.mul_add(a - b, 1.0);
        let c2 = 3.0_f32.mul_add(b, -6.0 * a);
        let c1 = 3.0 * a;
        (3.0 * c3 * t + 2.0 * c2).mul_add(t, c1)
    }

    fn t_for_x(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..Self::NEWTON_ITERATIONS {
            let slope = Self::sample_derivative(self.x1, self.x2, t);
            if slope.abs() < Self::EPSILON {
                break;
            }
            let error = Self::sample(self.x1, self.x2, t) - x;
            if error.abs() < Self::EPSILON {
                return t;
            }
            t -= error / slope;
        }
        if (0.0..=1.0).contains(&t)
            && (Self::sample(self.x1, self.x2, t) - x).abs() < Self::EPSILON
        {
            return t;
        }
        // Newton escaped the unit interval or stalled on a flat slope.
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..Self::BISECTION_ITERATIONS {
            let current = Self::sample(self.x1, self.x2, t);
            if (current - x).abs() < Self::EPSILON {
                break;
            }
            if current < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Evaluates the curve at `x` (clamped to `[0, 1]`).
    #[must_use]
    pub fn solve(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.t_for_x(x)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_cubic_endpoints_and_clamping() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-2.0), 0.0);
        assert_eq!(ease_out_cubic(3.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn ease_in_out_cubic_is_symmetric_around_midpoint() {
        let lo = ease_in_out_cubic(0.25);
        let hi = ease_in_out_cubic(0.75);
        assert!((lo + hi - 1.0).abs() < 1e-5);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn bezier_hits_endpoints() {
        let curve = CubicBezier::new(0.22, 1.0, 0.36, 1.0);
        assert_eq!(curve.solve(0.0), 0.0);
        assert_eq!(curve.solve(1.0), 1.0);
    }

    #[test]
    fn bezier_is_monotone_non_decreasing() {
        let curve = CubicBezier::new(0.22, 1.0, 0.36, 1.0);
        let mut previous = 0.0;
        for step in 0..=100 {
            let eased = curve.solve(step as f32 / 100.0);
            assert!(eased + 1e-4 >= previous, "regressed at step {step}");
            previous = eased;
        }
    }

    #[test]
    fn linear_bezier_is_identity() {
        let curve = CubicBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
        for step in 0..=20 {
            let x = step as f32 / 20.0;
            assert!((curve.solve(x) - x).abs() < 1e-3, "diverged at {x}");
        }
    }
}
