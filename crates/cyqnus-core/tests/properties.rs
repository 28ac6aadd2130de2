//! Property-based tests for cyqnus-core primitives.
//!
//! Covers parameter store clamping, pitch math identities and smoothing
//! convergence using proptest for randomized input generation.

use proptest::prelude::*;
use cyqnus_core::{
    ParamDescriptor, ParamId, ParamSource, ParamStore, SmoothedParam, cents_to_ratio,
    midi_to_freq, semitones_to_ratio,
};

static SHAPES: &[&str] = &["Sine", "Saw", "Square", "Triangle", "Pulse", "Noise"];

fn layout() -> [ParamDescriptor; 3] {
    [
        ParamDescriptor::seconds("Attack", "Atk", 0.001, 32.0, 0.01)
            .with_id(ParamId(100), "amp_attack"),
        ParamDescriptor::semitones("Coarse", "Coarse", -24.0, 24.0, 0.0)
            .with_id(ParamId(202), "osc1_coarse"),
        ParamDescriptor::choice("Wave", "Wave", SHAPES, 0).with_id(ParamId(200), "osc1_wave"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Whatever is written, the store only ever holds in-range values, and
    /// stepped parameters hold integers.
    #[test]
    fn store_values_stay_in_range(
        index in 0usize..3,
        value in prop::num::f32::ANY,
    ) {
        let store = ParamStore::new(&layout());
        store.set(index, value);

        let desc = *store.descriptor(index).unwrap();
        let got = store.value(index);
        prop_assert!(got.is_finite(), "non-finite value {} stored", got);
        prop_assert!(desc.in_range(got), "{} outside [{}, {}]", got, desc.min, desc.max);
        if index > 0 {
            prop_assert_eq!(got, got.round());
        }
    }

    /// Transposing a note up one octave in semitones doubles its frequency.
    #[test]
    fn octave_doubles_frequency(note in 0u8..=115) {
        let ratio = midi_to_freq(note + 12) / midi_to_freq(note);
        prop_assert!((ratio - 2.0).abs() < 1e-4, "ratio {}", ratio);
    }

    /// 100 cents and 1 semitone describe the same interval.
    #[test]
    fn cents_match_semitones(semis in -24.0f32..24.0f32) {
        let a = semitones_to_ratio(semis);
        let b = cents_to_ratio(semis * 100.0);
        prop_assert!((a - b).abs() <= a * 1e-5, "{} vs {}", a, b);
    }

    /// The master gain smoother converges toward any gain target in [0, 1].
    #[test]
    fn smoothed_gain_convergence(
        initial in 0.0f32..=1.0f32,
        target in 0.0f32..=1.0f32,
    ) {
        let mut gain = SmoothedParam::with_config(initial, 48000.0, 50.0);
        gain.set_target(target);

        // 10 time constants
        for _ in 0..24000 {
            let g = gain.advance();
            prop_assert!(g >= initial.min(target) - 1e-6 && g <= initial.max(target) + 1e-6);
        }
        prop_assert!((gain.get() - target).abs() < 1e-3, "got {}, want {}", gain.get(), target);
    }
}
