//! Pitch and level math.
//!
//! All functions are allocation-free and `no_std` friendly (`libm` backed).
//!
//! # Pitch
//!
//! - [`midi_to_freq`] / [`freq_to_midi`] - Equal temperament, A4 (note 69) = 440 Hz
//! - [`semitones_to_ratio`] / [`cents_to_ratio`] - Interval to frequency ratio
//!
//! # Levels
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Sample Rate
//!
//! - [`sanitize_sample_rate`] - Replace invalid rates with [`DEFAULT_SAMPLE_RATE`]

use libm::{expf, log2f, logf, powf};

/// Sample rate used whenever a caller supplies a rate that is not a positive,
/// finite number.
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

/// Reference pitch for note 69 (A4) in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// MIDI note number of A4.
pub const A4_NOTE: f32 = 69.0;

/// Return `sample_rate` if it is positive and finite, otherwise
/// [`DEFAULT_SAMPLE_RATE`].
///
/// # Example
/// ```rust
/// use cyqnus_core::{DEFAULT_SAMPLE_RATE, sanitize_sample_rate};
///
/// assert_eq!(sanitize_sample_rate(48000.0), 48000.0);
/// assert_eq!(sanitize_sample_rate(0.0), DEFAULT_SAMPLE_RATE);
/// assert_eq!(sanitize_sample_rate(f32::NAN), DEFAULT_SAMPLE_RATE);
/// ```
#[inline]
pub fn sanitize_sample_rate(sample_rate: f32) -> f32 {
    if sample_rate > 0.0 && sample_rate.is_finite() {
        sample_rate
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            sample_rate,
            "invalid sample rate, falling back to {} Hz",
            DEFAULT_SAMPLE_RATE
        );
        DEFAULT_SAMPLE_RATE
    }
}

/// Convert MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz.
///
/// # Example
/// ```rust
/// use cyqnus_core::midi_to_freq;
///
/// assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
/// assert!((midi_to_freq(81) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    A4_FREQUENCY * powf(2.0, (f32::from(note) - A4_NOTE) / 12.0)
}

/// Convert frequency in Hz to a (fractional) MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    A4_NOTE + 12.0 * log2f(freq / A4_FREQUENCY)
}

/// Convert a semitone interval to a frequency ratio.
///
/// 12 semitones = 1 octave = ratio of 2. Zero semitones is exactly 1.0.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    powf(2.0, semitones / 12.0)
}

/// Convert cents to frequency ratio.
///
/// 100 cents = 1 semitone. Zero cents is exactly 1.0.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    powf(2.0, cents / 1200.0)
}

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use cyqnus_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels (floored at -200 dB).
///
/// # Example
/// ```rust
/// use cyqnus_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_to_freq_a4() {
        let freq = midi_to_freq(69);
        assert!(
            (freq - 440.0).abs() < 0.01,
            "A4 should be 440 Hz, got {}",
            freq
        );
    }

    #[test]
    fn test_midi_to_freq_middle_c() {
        let freq = midi_to_freq(60);
        assert!(
            (freq - 261.63).abs() < 0.1,
            "C4 should be ~261.63 Hz, got {}",
            freq
        );
    }

    #[test]
    fn test_freq_to_midi_inverts_midi_to_freq() {
        for note in [21_u8, 60, 69, 108] {
            let back = freq_to_midi(midi_to_freq(note));
            assert!(
                (back - f32::from(note)).abs() < 1e-3,
                "note {} came back as {}",
                note,
                back
            );
        }
    }

    #[test]
    fn test_zero_intervals_are_exact_unity() {
        assert_eq!(semitones_to_ratio(0.0), 1.0);
        assert_eq!(cents_to_ratio(0.0), 1.0);
    }

    #[test]
    fn test_interval_ratios() {
        assert!((semitones_to_ratio(12.0) - 2.0).abs() < 1e-5);
        assert!((semitones_to_ratio(-12.0) - 0.5).abs() < 1e-5);
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-5);
        assert!((cents_to_ratio(100.0) - semitones_to_ratio(1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_sample_rate() {
        assert_eq!(sanitize_sample_rate(96000.0), 96000.0);
        assert_eq!(sanitize_sample_rate(-1.0), DEFAULT_SAMPLE_RATE);
        assert_eq!(sanitize_sample_rate(0.0), DEFAULT_SAMPLE_RATE);
        assert_eq!(sanitize_sample_rate(f32::INFINITY), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_db_round_trip() {
        for db in [-40.0_f32, -6.0, 0.0, 3.0] {
            let rt = linear_to_db(db_to_linear(db));
            assert!((rt - db).abs() < 1e-3, "{} dB came back as {}", db, rt);
        }
    }
}
