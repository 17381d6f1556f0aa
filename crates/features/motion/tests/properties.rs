//! Property tests for the motion invariants that must hold for any input.

use atelier_domain::config::MotionConfig;
use atelier_motion::{
    capability::{EnvSignals, Tier, detect},
    field::{FieldViewport, ParticleField},
    hub::InteractionSnapshot,
    scroll::ScrollEngine,
};
use proptest::prelude::*;

fn arbitrary_signals() -> impl Strategy<Value = EnvSignals> {
    (
        any::<bool>(),
        any::<bool>(),
        0.0_f32..4096.0,
        0.0_f32..4096.0,
        proptest::option::of(1_u32..64),
        proptest::option::of(0.5_f32..4.0),
        any::<bool>(),
    )
        .prop_map(
            |(reduced_motion, coarse_pointer, width, height, cores, ratio, save_data)| {
                EnvSignals {
                    reduced_motion,
                    coarse_pointer,
                    viewport_width: width,
                    viewport_height: height,
                    cores,
                    device_pixel_ratio: ratio,
                    save_data,
                }
            },
        )
}

proptest! {
    #[test]
    fn reduced_motion_always_resolves_to_off(signals in arbitrary_signals()) {
        let signals = EnvSignals { reduced_motion: true, ..signals };
        let profile = detect(Some(signals), &MotionConfig::default());
        prop_assert_eq!(profile.tier, Tier::Off);
    }

    #[test]
    fn detection_is_total_and_consistent(signals in arbitrary_signals()) {
        let profile = detect(Some(signals), &MotionConfig::default());
        prop_assert!(!profile.reason.is_empty());
        prop_assert!(profile.pixel_ratio <= 2.0);
        // The budget table is the single source of truth for the tier.
        prop_assert_eq!(profile.budget().points, profile.tier.budget().points);
        if signals.viewport_width < 768.0 {
            prop_assert_eq!(profile.tier, Tier::Off);
        }
    }

    #[test]
    fn field_positions_stay_finite_for_any_interaction_stream(
        seed in any::<u64>(),
        inputs in proptest::collection::vec(
            (-1.0e6_f64..1.0e6, proptest::option::of((0.0_f32..2000.0, 0.0_f32..2000.0))),
            1..60,
        ),
    ) {
        let mut field =
            ParticleField::new(Tier::Animated, seed, FieldViewport::from_screen(1440.0, 900.0));
        let mut now = 0.0;
        for (velocity, attractor) in inputs {
            now += 16.667;
            field.advance(now, &InteractionSnapshot { scroll_velocity: velocity, attractor });
            for point in field.positions() {
                prop_assert!(point.is_finite(), "non-finite position {point:?}");
            }
        }
    }

    #[test]
    fn scroll_position_stays_clamped_and_converges(
        target in 0.0_f64..50_000.0,
        max in 1.0_f64..20_000.0,
    ) {
        let signals = EnvSignals {
            reduced_motion: false,
            coarse_pointer: false,
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            cores: Some(8),
            device_pixel_ratio: Some(1.0),
            save_data: false,
        };
        let mut engine = ScrollEngine::new(&detect(Some(signals), &MotionConfig::default()));
        engine.set_max_scroll(max);
        engine.scroll_to(target);

        let mut state = engine.state();
        for frame in 0..2000 {
            state = engine.step(f64::from(frame) * 16.667);
            prop_assert!(state.position >= 0.0);
            prop_assert!(state.position <= max);
            prop_assert!((0.0..=1.0).contains(&state.progress));
        }
        prop_assert_eq!(state.position, target.clamp(0.0, max));
        prop_assert_eq!(state.velocity, 0.0);
    }
}
