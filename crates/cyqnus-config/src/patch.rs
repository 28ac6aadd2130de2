//! Patch file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use cyqnus_core::{ParamSource, ParamStore};
use cyqnus_synth::params::{
    AMP_ATTACK, AMP_DECAY, AMP_HOLD, AMP_RELEASE, AMP_SUSTAIN, MASTER_GAIN, OSC_COARSE,
    OSC_DETUNE, OSC_FINE, OSC_LEVEL, OSC_PULSE_WIDTH, OSC_WAVE, master_gain, osc_param,
};
use cyqnus_synth::{MAX_OSCILLATORS, OscillatorParams, PARAM_LAYOUT, PatchSnapshot};

use crate::error::ConfigError;
use crate::validation::{self, ValidationError};

/// Keys not recognised by a patch section, kept so they can be reported.
pub type UnknownKeys = BTreeMap<String, toml::Value>;

/// `[envelope]` table. Missing keys take the layout default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeConfig {
    /// Attack time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<f32>,
    /// Hold time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<f32>,
    /// Decay time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<f32>,
    /// Sustain level in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustain: Option<f32>,
    /// Release time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<f32>,
    /// Anything else in the table.
    #[serde(flatten)]
    pub unknown: UnknownKeys,
}

/// One `[[oscillators]]` entry. Missing keys take the layout default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OscillatorConfig {
    /// Waveform name, e.g. `"Saw"` (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave: Option<String>,
    /// Output level in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<f32>,
    /// Transposition in semitones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coarse: Option<i32>,
    /// Fine tuning in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine: Option<f32>,
    /// Pulse duty cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse_width: Option<f32>,
    /// Detune in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detune: Option<f32>,
    /// Anything else in the table.
    #[serde(flatten)]
    pub unknown: UnknownKeys,
}

impl OscillatorConfig {
    /// Oscillator with the given waveform name and level.
    pub fn new(wave: impl Into<String>, level: f32) -> Self {
        Self {
            wave: Some(wave.into()),
            level: Some(level),
            ..Self::default()
        }
    }

    /// Set coarse tuning.
    pub fn with_coarse(mut self, semitones: i32) -> Self {
        self.coarse = Some(semitones);
        self
    }

    /// Set fine tuning.
    pub fn with_fine(mut self, cents: f32) -> Self {
        self.fine = Some(cents);
        self
    }

    /// Set pulse width.
    pub fn with_pulse_width(mut self, width: f32) -> Self {
        self.pulse_width = Some(width);
        self
    }

    /// Set detune.
    pub fn with_detune(mut self, hz: f32) -> Self {
        self.detune = Some(hz);
        self
    }

    fn from_params(params: &OscillatorParams) -> Self {
        Self {
            wave: params.waveform.map(|w| w.name().to_string()),
            level: Some(params.level),
            coarse: Some(params.coarse),
            fine: Some(params.fine),
            pulse_width: Some(params.pulse_width),
            detune: Some(params.detune_hz),
            unknown: UnknownKeys::new(),
        }
    }
}

/// A synth patch: envelope and oscillator settings stored as TOML.
///
/// Patches describe a complete sound. Applying one resets every parameter
/// it does not mention to the layout default.
///
/// # TOML Format
///
/// ```toml
/// name = "Soft Pad"
/// description = "Slow attack, two detuned saws"
/// master_gain = 0.7
///
/// [envelope]
/// attack = 0.8
/// hold = 0.0
/// decay = 1.5
/// sustain = 0.6
/// release = 2.0
///
/// [[oscillators]]
/// wave = "Saw"
/// level = 0.7
///
/// [[oscillators]]
/// wave = "Saw"
/// level = 0.7
/// coarse = 0
/// detune = 1.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Output gain after the voice mix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_gain: Option<f32>,

    /// Amplitude envelope.
    #[serde(default)]
    pub envelope: EnvelopeConfig,

    /// Oscillators in order; at most [`MAX_OSCILLATORS`].
    #[serde(default)]
    pub oscillators: Vec<OscillatorConfig>,

    /// Unrecognised top-level keys.
    #[serde(flatten)]
    pub unknown: UnknownKeys,
}

impl Patch {
    /// Create a new patch with every parameter at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            master_gain: None,
            envelope: EnvelopeConfig::default(),
            oscillators: Vec::new(),
            unknown: UnknownKeys::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the envelope stage values.
    pub fn with_envelope(
        mut self,
        attack: f32,
        hold: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Self {
        self.envelope = EnvelopeConfig {
            attack: Some(attack),
            hold: Some(hold),
            decay: Some(decay),
            sustain: Some(sustain),
            release: Some(release),
            unknown: UnknownKeys::new(),
        };
        self
    }

    /// Add an oscillator.
    pub fn with_oscillator(mut self, oscillator: OscillatorConfig) -> Self {
        self.oscillators.push(oscillator);
        self
    }

    /// Set master gain.
    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = Some(gain);
        self
    }

    /// Capture every parameter currently held by `source`.
    pub fn from_store<S: ParamSource + ?Sized>(name: impl Into<String>, source: &S) -> Self {
        let snapshot: PatchSnapshot<MAX_OSCILLATORS> = PatchSnapshot::read(source);
        let env = snapshot.envelope;
        Self::new(name)
            .with_master_gain(master_gain(source))
            .with_envelope(env.attack, env.hold, env.decay, env.sustain, env.release)
            .with_oscillators(snapshot.oscillators.iter().map(OscillatorConfig::from_params))
    }

    fn with_oscillators(mut self, oscillators: impl IntoIterator<Item = OscillatorConfig>) -> Self {
        self.oscillators.extend(oscillators);
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %patch.name, "loaded patch");
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Report every problem: unknown keys, unknown waveforms, too many
    /// oscillators and values outside the layout ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (assignments, mut errors) = self.assignments();
        for (index, value) in assignments {
            if let Err(e) = validation::validate_param(PARAM_LAYOUT[index].string_id, value) {
                errors.push(e);
            }
        }
        validation::collect(errors)
    }

    /// Write the patch into `store`.
    ///
    /// Structural problems (unknown waveform, too many oscillators) abort
    /// before anything is written. Unknown keys are skipped with a warning.
    /// Out-of-range values are clamped by the store.
    pub fn apply(&self, store: &ParamStore) -> Result<(), ConfigError> {
        let (assignments, errors) = self.assignments();

        let (unknown, structural): (Vec<_>, Vec<_>) = errors
            .into_iter()
            .partition(|e| matches!(e, ValidationError::UnknownParameter { .. }));
        validation::collect(structural)?;
        for e in unknown {
            tracing::warn!(patch = %self.name, "{e}");
        }

        store.reset_to_defaults();
        for (index, value) in assignments {
            store.set(index, value);
            let stored = store.get(index);
            if stored != value {
                tracing::warn!(
                    param = PARAM_LAYOUT[index].string_id,
                    value,
                    stored,
                    "value clamped"
                );
            }
        }
        tracing::debug!(patch = %self.name, "applied patch");
        Ok(())
    }

    /// Layout index and value for every parameter the patch sets, plus the
    /// problems found on the way.
    fn assignments(&self) -> (Vec<(usize, f32)>, Vec<ValidationError>) {
        let mut out = Vec::new();
        let mut errors = Vec::new();

        report_unknown(&mut errors, "patch", &self.unknown);
        if let Some(gain) = self.master_gain {
            out.push((MASTER_GAIN, gain));
        }

        let env = &self.envelope;
        report_unknown(&mut errors, "envelope", &env.unknown);
        for (index, value) in [
            (AMP_ATTACK, env.attack),
            (AMP_HOLD, env.hold),
            (AMP_DECAY, env.decay),
            (AMP_SUSTAIN, env.sustain),
            (AMP_RELEASE, env.release),
        ] {
            if let Some(value) = value {
                out.push((index, value));
            }
        }

        if self.oscillators.len() > MAX_OSCILLATORS {
            errors.push(ValidationError::TooManyOscillators {
                count: self.oscillators.len(),
                max: MAX_OSCILLATORS,
            });
        }

        for (k, osc) in self.oscillators.iter().take(MAX_OSCILLATORS).enumerate() {
            report_unknown(&mut errors, &format!("oscillator {}", k + 1), &osc.unknown);

            if let Some(name) = &osc.wave {
                match validation::validate_waveform(k + 1, name) {
                    Ok(wave) => out.push((osc_param(k, OSC_WAVE), wave.index() as f32)),
                    Err(e) => errors.push(e),
                }
            }
            for (offset, value) in [
                (OSC_LEVEL, osc.level),
                (OSC_COARSE, osc.coarse.map(|c| c as f32)),
                (OSC_FINE, osc.fine),
                (OSC_PULSE_WIDTH, osc.pulse_width),
                (OSC_DETUNE, osc.detune),
            ] {
                if let Some(value) = value {
                    out.push((osc_param(k, offset), value));
                }
            }
        }

        (out, errors)
    }
}

fn report_unknown(errors: &mut Vec<ValidationError>, section: &str, keys: &UnknownKeys) {
    errors.extend(keys.keys().map(|param| ValidationError::UnknownParameter {
        section: section.to_string(),
        param: param.clone(),
    }));
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Init")
    }
}
