//! Property-based tests for cyqnus-synth.
//!
//! Randomized envelope settings, oscillator tuning and event sequences,
//! checked for bounded output and stage invariants.

use cyqnus_core::ParamStore;
use cyqnus_synth::params::{AMP_ATTACK, AMP_DECAY, AMP_HOLD, AMP_RELEASE, AMP_SUSTAIN};
use cyqnus_synth::{
    AhdsrEnvelope, AhdsrParams, AudioBuffer, EnvelopeState, Oscillator, OscillatorWaveform,
    PARAM_LAYOUT, TimedEvent, VoicePool,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;

fn waveform() -> impl Strategy<Value = OscillatorWaveform> {
    (0usize..6).prop_map(|i| OscillatorWaveform::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any stage times, the envelope output stays in [0, 1] through a
    /// full note and ends idle at exactly zero.
    #[test]
    fn envelope_output_bounded(
        attack in 0.0f32..0.02,
        hold in 0.0f32..0.02,
        decay in 0.0f32..0.02,
        sustain in 0.0f32..=1.0,
        release in 0.0f32..0.02,
        gate_samples in 0usize..3000,
    ) {
        let mut env = AhdsrEnvelope::new(SR);
        env.set_params(AhdsrParams { attack, hold, decay, sustain, release });
        env.note_on();

        for _ in 0..gate_samples {
            let level = env.advance();
            prop_assert!((0.0..=1.0).contains(&level), "gate level {}", level);
        }
        let at_release = env.level();
        env.note_off();

        // Release is at most 0.02 s = 960 samples
        let mut prev = at_release;
        for _ in 0..1000 {
            let level = env.advance();
            prop_assert!(level <= prev + 1e-6, "release rose {} -> {}", prev, level);
            prev = level;
        }
        prop_assert_eq!(env.state(), EnvelopeState::Idle);
        prop_assert_eq!(env.advance(), 0.0);
    }

    /// Output stays in [-level, level] and phase in [0, 1) for any tuning.
    #[test]
    fn oscillator_bounded_for_any_tuning(
        wave in waveform(),
        base in 0.0f32..30000.0,
        coarse in -48i32..48,
        fine in -300.0f32..300.0,
        detune in 0.0f32..50.0,
        level in 0.0f32..=1.0,
        pw in 0.0f32..=1.0,
    ) {
        let mut osc = Oscillator::new(SR);
        osc.set_waveform(wave);
        osc.set_frequency(base);
        osc.set_coarse(coarse);
        osc.set_fine(fine);
        osc.set_detune_hz(detune);
        osc.set_level(level);
        osc.set_pulse_width(pw);

        prop_assert!(osc.effective_frequency() >= 0.0);
        for _ in 0..512 {
            let s = osc.advance();
            prop_assert!(s.abs() <= level + 1e-6, "{:?} produced {}", wave, s);
            prop_assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    /// Random event streams never push the mix beyond the number of voices
    /// and never leave more voices active than the pool holds.
    #[test]
    fn pool_mix_bounded(
        notes in prop::collection::vec((0usize..256, 0u8..128, 0.0f32..=1.0, any::<bool>()), 0..24),
        sustain in 0.0f32..=1.0,
    ) {
        let store = ParamStore::new(&PARAM_LAYOUT);
        store.set(AMP_ATTACK, 0.001);
        store.set(AMP_HOLD, 0.0);
        store.set(AMP_DECAY, 0.005);
        store.set(AMP_SUSTAIN, sustain);
        store.set(AMP_RELEASE, 0.002);

        let mut events: Vec<TimedEvent> = notes
            .iter()
            .map(|&(offset, note, velocity, on)| {
                if on {
                    TimedEvent::note_on(offset, note, velocity)
                } else {
                    TimedEvent::note_off(offset, note, true)
                }
            })
            .collect();
        events.sort_by_key(|e| e.offset);

        let mut pool: VoicePool<4, 3> = VoicePool::new(SR);
        let mut buffer = AudioBuffer::new(2, 256);
        pool.render_block(&mut buffer, &events, &store);

        prop_assert!(pool.active_voice_count() <= 4);
        prop_assert!(buffer.peak() <= 4.0 + 1e-4, "peak {}", buffer.peak());
        prop_assert_eq!(buffer.channel(0), buffer.channel(1));
    }
}
