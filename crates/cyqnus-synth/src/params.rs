//! Parameter layout and the per-note snapshot.
//!
//! The layout is a fixed table of [`ParamDescriptor`]s. Engine code addresses
//! parameters by index through the constants below; patch files and the CLI
//! address them by `string_id`.
//!
//! | index | string id | range | default |
//! |-------|-----------|-------|---------|
//! | 0 | `amp_attack` | 0.001–32 s | 0.01 |
//! | 1 | `amp_hold` | 0–32 s | 0 |
//! | 2 | `amp_decay` | 0.001–32 s | 1.0 |
//! | 3 | `amp_sustain` | 0–1 | 0.5 |
//! | 4 | `amp_release` | 0.001–32 s | 0.01 |
//! | 5 | `master_gain` | 0–1 | 0.8 |
//! | 6 + 6k.. | `osc{k+1}_wave`, `_level`, `_coarse`, `_fine`, `_pw`, `_detune` | | |

use cyqnus_core::{ParamDescriptor, ParamId, ParamSource};

use crate::envelope::AhdsrParams;
use crate::oscillator::{OscillatorParams, OscillatorWaveform};

/// Most oscillators a voice can carry.
pub const MAX_OSCILLATORS: usize = 3;

/// Attack time index.
pub const AMP_ATTACK: usize = 0;
/// Hold time index.
pub const AMP_HOLD: usize = 1;
/// Decay time index.
pub const AMP_DECAY: usize = 2;
/// Sustain level index.
pub const AMP_SUSTAIN: usize = 3;
/// Release time index.
pub const AMP_RELEASE: usize = 4;
/// Master output gain index.
pub const MASTER_GAIN: usize = 5;

/// Index of the first oscillator parameter.
pub const OSC_BASE: usize = 6;
/// Parameters per oscillator.
pub const OSC_STRIDE: usize = 6;

/// Offset of the waveform parameter within an oscillator block.
pub const OSC_WAVE: usize = 0;
/// Offset of the level parameter.
pub const OSC_LEVEL: usize = 1;
/// Offset of the coarse tuning parameter.
pub const OSC_COARSE: usize = 2;
/// Offset of the fine tuning parameter.
pub const OSC_FINE: usize = 3;
/// Offset of the pulse width parameter.
pub const OSC_PULSE_WIDTH: usize = 4;
/// Offset of the detune parameter.
pub const OSC_DETUNE: usize = 5;

/// Total number of parameters in [`PARAM_LAYOUT`].
pub const PARAM_COUNT: usize = OSC_BASE + OSC_STRIDE * MAX_OSCILLATORS;

/// Index of parameter `offset` of oscillator `osc` (0-based).
#[inline]
pub const fn osc_param(osc: usize, offset: usize) -> usize {
    OSC_BASE + osc * OSC_STRIDE + offset
}

const WAVEFORM_CHOICES: &[&str] = &OscillatorWaveform::NAMES;

const OSC_STRING_IDS: [[&str; OSC_STRIDE]; MAX_OSCILLATORS] = [
    ["osc1_wave", "osc1_level", "osc1_coarse", "osc1_fine", "osc1_pw", "osc1_detune"],
    ["osc2_wave", "osc2_level", "osc2_coarse", "osc2_fine", "osc2_pw", "osc2_detune"],
    ["osc3_wave", "osc3_level", "osc3_coarse", "osc3_fine", "osc3_pw", "osc3_detune"],
];

const OSC_GROUPS: [&str; MAX_OSCILLATORS] = ["osc1", "osc2", "osc3"];

/// Each oscillator starts an octave above the previous one.
const OSC_DEFAULT_COARSE: [f32; MAX_OSCILLATORS] = [0.0, 12.0, 24.0];

const fn build_layout() -> [ParamDescriptor; PARAM_COUNT] {
    let mut out = [ParamDescriptor::level("", "", 0.0); PARAM_COUNT];

    out[AMP_ATTACK] = ParamDescriptor::seconds("Attack", "Atk", 0.001, 32.0, 0.01)
        .with_id(ParamId(100), "amp_attack")
        .with_group("envelope");
    out[AMP_HOLD] = ParamDescriptor::seconds("Hold", "Hold", 0.0, 32.0, 0.0)
        .with_id(ParamId(101), "amp_hold")
        .with_group("envelope");
    out[AMP_DECAY] = ParamDescriptor::seconds("Decay", "Dec", 0.001, 32.0, 1.0)
        .with_id(ParamId(102), "amp_decay")
        .with_group("envelope");
    out[AMP_SUSTAIN] = ParamDescriptor::level("Sustain", "Sus", 0.5)
        .with_id(ParamId(103), "amp_sustain")
        .with_group("envelope");
    out[AMP_RELEASE] = ParamDescriptor::seconds("Release", "Rel", 0.001, 32.0, 0.01)
        .with_id(ParamId(104), "amp_release")
        .with_group("envelope");
    out[MASTER_GAIN] =
        ParamDescriptor::level("Master Gain", "Master", 0.8).with_id(ParamId(110), "master_gain");

    let mut k = 0;
    while k < MAX_OSCILLATORS {
        let ids = OSC_STRING_IDS[k];
        let group = OSC_GROUPS[k];
        let base_id = 200 + 10 * k as u32;

        out[osc_param(k, OSC_WAVE)] = ParamDescriptor::choice("Waveform", "Wave", WAVEFORM_CHOICES, 0)
            .with_id(ParamId(base_id), ids[OSC_WAVE])
            .with_group(group);
        out[osc_param(k, OSC_LEVEL)] = ParamDescriptor::level("Level", "Level", 0.8)
            .with_id(ParamId(base_id + 1), ids[OSC_LEVEL])
            .with_group(group);
        out[osc_param(k, OSC_COARSE)] =
            ParamDescriptor::semitones("Coarse", "Coarse", -24.0, 24.0, OSC_DEFAULT_COARSE[k])
                .with_id(ParamId(base_id + 2), ids[OSC_COARSE])
                .with_group(group);
        out[osc_param(k, OSC_FINE)] = ParamDescriptor::cents("Fine", "Fine", -100.0, 100.0, 0.0)
            .with_id(ParamId(base_id + 3), ids[OSC_FINE])
            .with_group(group);
        out[osc_param(k, OSC_PULSE_WIDTH)] = ParamDescriptor::level("Pulse Width", "PW", 0.5)
            .with_id(ParamId(base_id + 4), ids[OSC_PULSE_WIDTH])
            .with_group(group);
        out[osc_param(k, OSC_PULSE_WIDTH)].min = 0.01;
        out[osc_param(k, OSC_PULSE_WIDTH)].max = 0.99;
        out[osc_param(k, OSC_DETUNE)] = ParamDescriptor::hertz("Detune", "Detune", 0.0, 10.0, 0.0)
            .with_id(ParamId(base_id + 5), ids[OSC_DETUNE])
            .with_group(group);

        k += 1;
    }

    out
}

/// The complete parameter layout, in index order.
pub static PARAM_LAYOUT: [ParamDescriptor; PARAM_COUNT] = build_layout();

/// Envelope and oscillator settings captured from a [`ParamSource`] at
/// the moment a note starts.
///
/// Later parameter changes do not reach a sounding note.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchSnapshot<const OSCS: usize> {
    /// Amplitude envelope settings.
    pub envelope: AhdsrParams,
    /// One entry per oscillator.
    pub oscillators: [OscillatorParams; OSCS],
}

impl<const OSCS: usize> Default for PatchSnapshot<OSCS> {
    fn default() -> Self {
        Self::read(&[] as &[f32])
    }
}

impl<const OSCS: usize> PatchSnapshot<OSCS> {
    /// Read the current values of every layout parameter.
    ///
    /// Missing indices (a source shorter than [`PARAM_LAYOUT`]) read as the
    /// layout default. Oscillators beyond [`MAX_OSCILLATORS`] reuse the last
    /// oscillator's block.
    pub fn read<S: ParamSource + ?Sized>(source: &S) -> Self {
        let get = |index: usize| {
            if index < source.param_count() {
                source.value(index)
            } else {
                PARAM_LAYOUT[index].default
            }
        };

        let envelope = AhdsrParams {
            attack: get(AMP_ATTACK),
            hold: get(AMP_HOLD),
            decay: get(AMP_DECAY),
            sustain: get(AMP_SUSTAIN),
            release: get(AMP_RELEASE),
        }
        .sanitized();

        let oscillators = core::array::from_fn(|k| {
            let k = k.min(MAX_OSCILLATORS - 1);
            OscillatorParams {
                waveform: OscillatorWaveform::from_param(get(osc_param(k, OSC_WAVE))),
                level: get(osc_param(k, OSC_LEVEL)),
                coarse: libm::roundf(get(osc_param(k, OSC_COARSE))) as i32,
                fine: get(osc_param(k, OSC_FINE)),
                pulse_width: get(osc_param(k, OSC_PULSE_WIDTH)),
                detune_hz: get(osc_param(k, OSC_DETUNE)),
            }
        });

        Self {
            envelope,
            oscillators,
        }
    }
}

/// Current master gain from a source, clamped to `[0, 1]`.
pub fn master_gain<S: ParamSource + ?Sized>(source: &S) -> f32 {
    if MASTER_GAIN < source.param_count() {
        let gain = source.value(MASTER_GAIN);
        if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) }
    } else {
        PARAM_LAYOUT[MASTER_GAIN].default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyqnus_core::{ParamFlags, ParamStore};

    #[test]
    fn test_layout_ids_are_unique() {
        for (i, a) in PARAM_LAYOUT.iter().enumerate() {
            assert!(!a.string_id.is_empty(), "param {} has no string id", i);
            for b in &PARAM_LAYOUT[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate id {:?}", a.id);
                assert_ne!(a.string_id, b.string_id);
            }
        }
    }

    #[test]
    fn test_layout_indices_match_ids() {
        assert_eq!(PARAM_LAYOUT[AMP_ATTACK].string_id, "amp_attack");
        assert_eq!(PARAM_LAYOUT[MASTER_GAIN].id, ParamId(110));
        assert_eq!(PARAM_LAYOUT[osc_param(0, OSC_WAVE)].id, ParamId(200));
        assert_eq!(PARAM_LAYOUT[osc_param(2, OSC_DETUNE)].id, ParamId(225));
        assert_eq!(PARAM_LAYOUT[osc_param(1, OSC_PULSE_WIDTH)].string_id, "osc2_pw");
        assert_eq!(PARAM_LAYOUT.len(), 24);
    }

    #[test]
    fn test_layout_defaults() {
        assert_eq!(PARAM_LAYOUT[AMP_DECAY].default, 1.0);
        assert_eq!(PARAM_LAYOUT[AMP_SUSTAIN].default, 0.5);
        assert_eq!(PARAM_LAYOUT[osc_param(0, OSC_COARSE)].default, 0.0);
        assert_eq!(PARAM_LAYOUT[osc_param(1, OSC_COARSE)].default, 12.0);
        assert_eq!(PARAM_LAYOUT[osc_param(2, OSC_COARSE)].default, 24.0);
        let pw = &PARAM_LAYOUT[osc_param(0, OSC_PULSE_WIDTH)];
        assert_eq!((pw.min, pw.max, pw.default), (0.01, 0.99, 0.5));
    }

    #[test]
    fn test_wave_and_coarse_are_stepped() {
        for k in 0..MAX_OSCILLATORS {
            let wave = &PARAM_LAYOUT[osc_param(k, OSC_WAVE)];
            assert!(wave.flags.contains(ParamFlags::STEPPED));
            assert_eq!(wave.max, 5.0);
            assert_eq!(wave.choice_label(4.0), Some("Pulse"));
            assert!(PARAM_LAYOUT[osc_param(k, OSC_COARSE)]
                .flags
                .contains(ParamFlags::STEPPED));
        }
    }

    #[test]
    fn test_snapshot_from_defaults() {
        let store = ParamStore::new(&PARAM_LAYOUT);
        let snap = PatchSnapshot::<3>::read(&store);
        assert_eq!(snap.envelope, AhdsrParams::default());
        assert_eq!(snap.oscillators[0], OscillatorParams::default());
        assert_eq!(snap.oscillators[1].coarse, 12);
        assert_eq!(snap.oscillators[2].coarse, 24);
        assert_eq!(PatchSnapshot::<3>::default(), snap);
    }

    #[test]
    fn test_snapshot_reads_store_values() {
        let store = ParamStore::new(&PARAM_LAYOUT);
        store.set(AMP_SUSTAIN, 0.9);
        store.set(osc_param(1, OSC_WAVE), 4.0);
        store.set(osc_param(1, OSC_FINE), -30.0);
        let snap = PatchSnapshot::<2>::read(&store);
        assert_eq!(snap.envelope.sustain, 0.9);
        assert_eq!(snap.oscillators[1].waveform, Some(OscillatorWaveform::Pulse));
        assert_eq!(snap.oscillators[1].fine, -30.0);
    }

    #[test]
    fn test_snapshot_from_raw_slice_flags_bad_waveform() {
        let mut raw = [0.0_f32; PARAM_COUNT];
        raw[osc_param(0, OSC_WAVE)] = 17.0;
        raw[AMP_ATTACK] = -2.0;
        let snap = PatchSnapshot::<1>::read(&raw);
        assert_eq!(snap.oscillators[0].waveform, None);
        assert_eq!(snap.envelope.attack, 0.0);
    }

    #[test]
    fn test_master_gain() {
        let store = ParamStore::new(&PARAM_LAYOUT);
        assert_eq!(master_gain(&store), 0.8);
        store.set(MASTER_GAIN, 0.25);
        assert_eq!(master_gain(&store), 0.25);
        assert_eq!(master_gain(&[] as &[f32]), 0.8);
    }
}
