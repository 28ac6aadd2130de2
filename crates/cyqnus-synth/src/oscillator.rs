//! Naive audio-rate oscillator.
//!
//! A normalised phase accumulator (`phase` in `[0, 1)`) driving one of six
//! waveforms. No band limiting is applied: edges alias above a few kHz.
//! Pitch is a base frequency transposed by coarse semitones and fine cents,
//! plus a flat detune offset in Hz.

use core::f32::consts::TAU;
use cyqnus_core::{cents_to_ratio, sanitize_sample_rate, semitones_to_ratio};
use libm::{floorf, roundf, sinf};

/// Coarse tuning range in semitones (symmetric).
pub const COARSE_RANGE: i32 = 24;
/// Fine tuning range in cents (symmetric).
pub const FINE_RANGE: f32 = 100.0;
/// Narrowest allowed pulse width.
pub const MIN_PULSE_WIDTH: f32 = 0.01;
/// Widest allowed pulse width.
pub const MAX_PULSE_WIDTH: f32 = 0.99;

const DEFAULT_NOISE_SEED: u32 = 0x12345678;

/// Wrap into `[0, 1)`, whatever the overshoot.
#[inline]
fn wrap_unit(phase: f32) -> f32 {
    let wrapped = phase - floorf(phase);
    // floorf can leave exactly 1.0 behind for tiny negative inputs
    if (0.0..1.0).contains(&wrapped) { wrapped } else { 0.0 }
}

/// Oscillator waveform types, in parameter index order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OscillatorWaveform {
    /// Sine waveform - pure fundamental tone.
    #[default]
    Sine,
    /// Descending sawtooth, +1 to -1 over one period.
    Saw,
    /// Square waveform (50% duty cycle).
    Square,
    /// Triangle waveform.
    Triangle,
    /// Rectangular wave with the oscillator's pulse width as duty cycle.
    Pulse,
    /// White noise, not phase driven.
    Noise,
}

impl OscillatorWaveform {
    /// Every waveform in index order.
    pub const ALL: [Self; 6] = [
        Self::Sine,
        Self::Saw,
        Self::Square,
        Self::Triangle,
        Self::Pulse,
        Self::Noise,
    ];

    /// Display names in index order.
    pub const NAMES: [&'static str; 6] = ["Sine", "Saw", "Square", "Triangle", "Pulse", "Noise"];

    /// Waveform for a parameter index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Waveform for a raw parameter value. Values are rounded to the
    /// nearest index; anything outside `0..=5` is `None`.
    pub fn from_param(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let rounded = roundf(value);
        if rounded < 0.0 {
            return None;
        }
        Self::from_index(rounded as usize)
    }

    /// Parameter index of this waveform.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .and_then(Self::from_index)
    }
}

/// Per-oscillator settings copied in at note-on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorParams {
    /// Waveform, `None` when the source index was unrecognised.
    pub waveform: Option<OscillatorWaveform>,
    /// Output level in `[0, 1]`.
    pub level: f32,
    /// Transposition in whole semitones.
    pub coarse: i32,
    /// Fine tuning in cents.
    pub fine: f32,
    /// Duty cycle for [`OscillatorWaveform::Pulse`].
    pub pulse_width: f32,
    /// Flat frequency offset in Hz.
    pub detune_hz: f32,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Some(OscillatorWaveform::Sine),
            level: 0.8,
            coarse: 0,
            fine: 0.0,
            pulse_width: 0.5,
            detune_hz: 0.0,
        }
    }
}

/// Naive phase-accumulator oscillator.
///
/// # Example
///
/// ```rust
/// use cyqnus_synth::{Oscillator, OscillatorWaveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_waveform(OscillatorWaveform::Saw);
/// osc.set_frequency(110.0);
/// osc.set_coarse(12);
///
/// assert!((osc.effective_frequency() - 220.0).abs() < 1e-3);
/// assert_eq!(osc.advance(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Phase increment per sample
    phase_inc: f32,
    sample_rate: f32,
    /// Base (note) frequency in Hz
    frequency: f32,
    /// Frequency after tuning and detune
    effective: f32,
    waveform: Option<OscillatorWaveform>,
    level: f32,
    coarse: i32,
    fine: f32,
    pulse_width: f32,
    detune_hz: f32,
    /// Xorshift state, never zero
    noise_state: u32,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(cyqnus_core::DEFAULT_SAMPLE_RATE)
    }
}

impl Oscillator {
    /// Create a sine oscillator at 440 Hz, level 1.
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_inc: 0.0,
            sample_rate: sanitize_sample_rate(sample_rate),
            frequency: 440.0,
            effective: 440.0,
            waveform: Some(OscillatorWaveform::Sine),
            level: 1.0,
            coarse: 0,
            fine: 0.0,
            pulse_width: 0.5,
            detune_hz: 0.0,
            noise_state: DEFAULT_NOISE_SEED,
        };
        osc.update_phase_increment();
        osc
    }

    /// Set sample rate and recalculate phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.update_phase_increment();
    }

    /// Get current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Set base frequency in Hz. Negative values clamp to 0.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz.max(0.0);
        self.update_phase_increment();
    }

    /// Base frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Frequency actually played: base x coarse x fine + detune.
    pub fn effective_frequency(&self) -> f32 {
        self.effective
    }

    /// Phase increment per sample (cycles).
    pub fn phase_increment(&self) -> f32 {
        self.phase_inc
    }

    /// Set waveform type.
    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = Some(waveform);
    }

    /// Set waveform from a raw parameter value.
    ///
    /// An unrecognised index is a programming error: it panics in debug
    /// builds and silences the oscillator in release builds.
    pub fn set_waveform_param(&mut self, value: f32) {
        let waveform = OscillatorWaveform::from_param(value);
        debug_assert!(waveform.is_some(), "unrecognised waveform index {}", value);
        self.waveform = waveform;
    }

    /// Current waveform, `None` if silenced by an invalid index.
    pub fn waveform(&self) -> Option<OscillatorWaveform> {
        self.waveform
    }

    /// Set output level, clamped to `[0, 1]`.
    pub fn set_level(&mut self, level: f32) {
        self.level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
    }

    /// Output level.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set coarse tuning in semitones, clamped to `±24`.
    pub fn set_coarse(&mut self, semitones: i32) {
        self.coarse = semitones.clamp(-COARSE_RANGE, COARSE_RANGE);
        self.update_phase_increment();
    }

    /// Coarse tuning in semitones.
    pub fn coarse(&self) -> i32 {
        self.coarse
    }

    /// Set fine tuning in cents, clamped to `±100`.
    pub fn set_fine(&mut self, cents: f32) {
        self.fine = if cents.is_nan() {
            0.0
        } else {
            cents.clamp(-FINE_RANGE, FINE_RANGE)
        };
        self.update_phase_increment();
    }

    /// Fine tuning in cents.
    pub fn fine(&self) -> f32 {
        self.fine
    }

    /// Set the flat detune offset in Hz. Negative values clamp to 0.
    pub fn set_detune_hz(&mut self, hz: f32) {
        self.detune_hz = if hz.is_finite() { hz.max(0.0) } else { 0.0 };
        self.update_phase_increment();
    }

    /// Detune offset in Hz.
    pub fn detune_hz(&self) -> f32 {
        self.detune_hz
    }

    /// Set pulse width (duty cycle), clamped to `[0.01, 0.99]`.
    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = if width.is_nan() {
            0.5
        } else {
            width.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH)
        };
    }

    /// Pulse width.
    pub fn pulse_width(&self) -> f32 {
        self.pulse_width
    }

    /// Jump to a phase offset in cycles. Any value wraps into `[0, 1)`.
    pub fn set_phase_offset(&mut self, cycles: f32) {
        self.phase = if cycles.is_finite() {
            wrap_unit(cycles)
        } else {
            0.0
        };
    }

    /// Get current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Seed the noise generator. Zero is replaced by a fixed non-zero seed.
    pub fn set_noise_seed(&mut self, seed: u32) {
        self.noise_state = if seed == 0 { DEFAULT_NOISE_SEED } else { seed };
    }

    /// Apply a full parameter set (waveform, level, tuning, pulse width).
    ///
    /// The base frequency is left alone.
    pub fn apply(&mut self, params: &OscillatorParams) {
        debug_assert!(params.waveform.is_some(), "unrecognised waveform index");
        self.waveform = params.waveform;
        self.set_level(params.level);
        self.set_pulse_width(params.pulse_width);
        self.set_coarse(params.coarse);
        self.set_fine(params.fine);
        self.set_detune_hz(params.detune_hz);
    }

    /// Generate next sample, then advance the phase.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let sample = self.generate_sample();
        self.phase = wrap_unit(self.phase + self.phase_inc);
        sample * self.level
    }

    #[inline]
    fn generate_sample(&mut self) -> f32 {
        let phase = self.phase;
        match self.waveform {
            Some(OscillatorWaveform::Sine) => sinf(TAU * phase),
            Some(OscillatorWaveform::Saw) => 1.0 - 2.0 * phase,
            Some(OscillatorWaveform::Square) => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Some(OscillatorWaveform::Triangle) => {
                if phase < 0.5 {
                    -1.0 + 4.0 * phase
                } else {
                    3.0 - 4.0 * phase
                }
            }
            Some(OscillatorWaveform::Pulse) => {
                if phase < self.pulse_width {
                    1.0
                } else {
                    -1.0
                }
            }
            Some(OscillatorWaveform::Noise) => self.generate_noise(),
            None => 0.0,
        }
    }

    #[inline]
    fn generate_noise(&mut self) -> f32 {
        // xorshift32
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;

        ((x as i32 as f32) / (i32::MAX as f32)).clamp(-1.0, 1.0)
    }

    fn update_phase_increment(&mut self) {
        let tuned = self.frequency
            * semitones_to_ratio(self.coarse as f32)
            * cents_to_ratio(self.fine)
            + self.detune_hz;
        self.effective = if tuned.is_finite() { tuned.max(0.0) } else { 0.0 };
        self.phase_inc = self.effective / self.sample_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    /// Quarter-period steps: 12 kHz at 48 kHz visits phases 0, .25, .5, .75.
    fn quarter_osc(waveform: OscillatorWaveform) -> Oscillator {
        let mut osc = Oscillator::new(SR);
        osc.set_waveform(waveform);
        osc.set_frequency(12000.0);
        osc
    }

    fn four(osc: &mut Oscillator) -> [f32; 4] {
        core::array::from_fn(|_| osc.advance())
    }

    #[test]
    fn test_waveform_index_round_trip() {
        for (i, wave) in OscillatorWaveform::ALL.iter().enumerate() {
            assert_eq!(wave.index(), i);
            assert_eq!(OscillatorWaveform::from_index(i), Some(*wave));
            assert_eq!(OscillatorWaveform::from_name(wave.name()), Some(*wave));
        }
        assert_eq!(
            OscillatorWaveform::from_param(3.2),
            Some(OscillatorWaveform::Triangle)
        );
        assert_eq!(OscillatorWaveform::from_param(6.0), None);
        assert_eq!(OscillatorWaveform::from_param(-1.0), None);
        assert_eq!(OscillatorWaveform::from_param(f32::NAN), None);
        assert_eq!(
            OscillatorWaveform::from_name("PULSE"),
            Some(OscillatorWaveform::Pulse)
        );
    }

    #[test]
    fn test_sine_quarter_points() {
        let s = four(&mut quarter_osc(OscillatorWaveform::Sine));
        assert!(s[0].abs() < 1e-6);
        assert!((s[1] - 1.0).abs() < 1e-6);
        assert!(s[2].abs() < 1e-5);
        assert!((s[3] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_saw_descends() {
        assert_eq!(
            four(&mut quarter_osc(OscillatorWaveform::Saw)),
            [1.0, 0.5, 0.0, -0.5]
        );
    }

    #[test]
    fn test_square() {
        assert_eq!(
            four(&mut quarter_osc(OscillatorWaveform::Square)),
            [1.0, 1.0, -1.0, -1.0]
        );
    }

    #[test]
    fn test_triangle() {
        assert_eq!(
            four(&mut quarter_osc(OscillatorWaveform::Triangle)),
            [-1.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_pulse_width_sets_duty() {
        let mut osc = quarter_osc(OscillatorWaveform::Pulse);
        osc.set_pulse_width(0.2);
        assert_eq!(four(&mut osc), [1.0, -1.0, -1.0, -1.0]);
        osc.set_pulse_width(0.8);
        assert_eq!(four(&mut osc), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_pulse_width_clamped_on_write() {
        let mut osc = Oscillator::new(SR);
        osc.set_pulse_width(0.0);
        assert_eq!(osc.pulse_width(), MIN_PULSE_WIDTH);
        osc.set_pulse_width(1.0);
        assert_eq!(osc.pulse_width(), MAX_PULSE_WIDTH);
    }

    #[test]
    fn test_level_scales_output() {
        let mut osc = quarter_osc(OscillatorWaveform::Square);
        osc.set_level(0.25);
        assert_eq!(osc.advance(), 0.25);
        osc.set_level(7.0);
        assert_eq!(osc.level(), 1.0);
        osc.set_level(-1.0);
        assert_eq!(osc.advance(), 0.0);
    }

    #[test]
    fn test_untuned_frequency_is_exact() {
        let mut osc = Oscillator::new(SR);
        for base in [27.5_f32, 261.62558, 440.0, 4186.009] {
            osc.set_frequency(base);
            assert_eq!(osc.effective_frequency(), base);
        }
    }

    #[test]
    fn test_tuning_composition() {
        let mut osc = Oscillator::new(SR);
        osc.set_frequency(220.0);
        osc.set_coarse(12);
        assert!((osc.effective_frequency() - 440.0).abs() < 1e-3);
        osc.set_fine(-100.0);
        assert!((osc.effective_frequency() - 415.3047).abs() < 1e-2);
        osc.set_fine(0.0);
        osc.set_detune_hz(3.0);
        assert!((osc.effective_frequency() - 443.0).abs() < 1e-3);
        assert!((osc.phase_increment() - 443.0 / SR).abs() < 1e-7);
    }

    #[test]
    fn test_tuning_clamps() {
        let mut osc = Oscillator::new(SR);
        osc.set_coarse(60);
        assert_eq!(osc.coarse(), 24);
        osc.set_coarse(-60);
        assert_eq!(osc.coarse(), -24);
        osc.set_fine(250.0);
        assert_eq!(osc.fine(), 100.0);
        osc.set_detune_hz(-5.0);
        assert_eq!(osc.detune_hz(), 0.0);
    }

    #[test]
    fn test_negative_frequency_is_silent() {
        let mut osc = Oscillator::new(SR);
        osc.set_waveform(OscillatorWaveform::Saw);
        osc.set_frequency(-100.0);
        assert_eq!(osc.effective_frequency(), 0.0);
        for _ in 0..10 {
            assert_eq!(osc.advance(), 1.0);
        }
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn test_large_increment_wraps() {
        let mut osc = Oscillator::new(SR);
        osc.set_frequency(SR * 3.3);
        assert!(osc.phase_increment() > 3.0);
        for _ in 0..1000 {
            osc.advance();
            let p = osc.phase();
            assert!((0.0..1.0).contains(&p), "phase escaped: {}", p);
        }
    }

    #[test]
    fn test_phase_offset_wraps() {
        let mut osc = Oscillator::new(SR);
        osc.set_phase_offset(2.25);
        assert!((osc.phase() - 0.25).abs() < 1e-6);
        osc.set_phase_offset(-0.25);
        assert!((osc.phase() - 0.75).abs() < 1e-6);
        osc.set_phase_offset(f32::INFINITY);
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn test_noise_range_and_seeding() {
        let mut a = Oscillator::new(SR);
        a.set_waveform(OscillatorWaveform::Noise);
        let mut b = a.clone();
        let mut c = a.clone();
        c.set_noise_seed(99);

        let mut differs = false;
        for _ in 0..4096 {
            let x = a.advance();
            assert!((-1.0..=1.0).contains(&x), "noise out of range: {}", x);
            assert_eq!(x, b.advance());
            differs |= x != c.advance();
        }
        assert!(differs, "different seeds should decorrelate");
    }

    #[test]
    fn test_noise_seed_zero_is_replaced() {
        let mut osc = Oscillator::new(SR);
        osc.set_waveform(OscillatorWaveform::Noise);
        osc.set_noise_seed(0);
        let any_nonzero = (0..16).any(|_| osc.advance() != 0.0);
        assert!(any_nonzero);
    }

    #[test]
    fn test_apply_params() {
        let mut osc = Oscillator::new(SR);
        osc.set_frequency(100.0);
        osc.apply(&OscillatorParams {
            waveform: Some(OscillatorWaveform::Pulse),
            level: 0.5,
            coarse: 12,
            fine: 0.0,
            pulse_width: 0.25,
            detune_hz: 1.0,
        });
        assert_eq!(osc.waveform(), Some(OscillatorWaveform::Pulse));
        assert_eq!(osc.level(), 0.5);
        assert_eq!(osc.pulse_width(), 0.25);
        assert!((osc.effective_frequency() - 201.0).abs() < 1e-3);
    }

    #[test]
    fn test_sample_rate_change_updates_increment() {
        let mut osc = Oscillator::new(SR);
        osc.set_frequency(480.0);
        assert!((osc.phase_increment() - 0.01).abs() < 1e-7);
        osc.set_sample_rate(96000.0);
        assert!((osc.phase_increment() - 0.005).abs() < 1e-7);
        osc.set_sample_rate(0.0);
        assert_eq!(osc.sample_rate(), cyqnus_core::DEFAULT_SAMPLE_RATE);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unrecognised waveform")]
    fn test_invalid_waveform_panics_in_debug() {
        let mut osc = Oscillator::new(SR);
        osc.set_waveform_param(9.0);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_invalid_waveform_is_silent_in_release() {
        let mut osc = Oscillator::new(SR);
        osc.set_waveform_param(9.0);
        assert_eq!(osc.waveform(), None);
        assert_eq!(osc.advance(), 0.0);
    }
}
