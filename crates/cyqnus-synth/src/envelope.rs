//! AHDSR envelope generator.
//!
//! Attack, Hold, Decay, Sustain and Release stages with linear-in-time
//! segments. One envelope is built per voice slot and reused across notes;
//! its stage times are copied in at note-on through [`AhdsrParams`].

use cyqnus_core::sanitize_sample_rate;

/// Output level at or below which the release stage snaps to Idle.
pub const RELEASE_FLOOR: f32 = 1.0e-5;

/// AHDSR envelope states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Envelope is inactive. Output is exactly zero.
    #[default]
    Idle,
    /// Linear ramp from 0 up to 1.
    Attack,
    /// Holds the peak level for the hold time.
    Hold,
    /// Linear fall from 1 to the sustain level.
    Decay,
    /// Emits the sustain level until note-off.
    Sustain,
    /// Linear fall from the level at note-off to 0.
    Release,
}

/// Stage times (seconds) and sustain level for an [`AhdsrEnvelope`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AhdsrParams {
    /// Attack time in seconds.
    pub attack: f32,
    /// Hold time in seconds.
    pub hold: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level in `[0, 1]`.
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,
}

impl Default for AhdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.01,
            hold: 0.0,
            decay: 1.0,
            sustain: 0.5,
            release: 0.01,
        }
    }
}

impl AhdsrParams {
    /// Clamp into the valid domain: durations `>= 0`, sustain in `[0, 1]`.
    /// Non-finite values become 0.
    pub fn sanitized(self) -> Self {
        Self {
            attack: non_negative(self.attack),
            hold: non_negative(self.hold),
            decay: non_negative(self.decay),
            sustain: non_negative(self.sustain).min(1.0),
            release: non_negative(self.release),
        }
    }
}

#[inline]
fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Linear AHDSR envelope generator.
///
/// # Example
///
/// ```rust
/// use cyqnus_synth::{AhdsrEnvelope, AhdsrParams, EnvelopeState};
///
/// let mut env = AhdsrEnvelope::new(48000.0);
/// env.set_params(AhdsrParams {
///     attack: 0.005,
///     hold: 0.0,
///     decay: 0.1,
///     sustain: 0.7,
///     release: 0.2,
/// });
///
/// env.note_on();
/// for _ in 0..1000 {
///     let gain = env.advance();
///     assert!((0.0..=1.0).contains(&gain));
/// }
///
/// env.note_off();
/// assert_eq!(env.state(), EnvelopeState::Release);
/// ```
#[derive(Debug, Clone)]
pub struct AhdsrEnvelope {
    state: EnvelopeState,
    /// Seconds spent in the current stage
    elapsed: f32,
    /// Last emitted level
    level: f32,
    release_start_level: f32,
    params: AhdsrParams,
    sample_rate: f32,
    /// Seconds per sample
    dt: f32,
}

impl Default for AhdsrEnvelope {
    fn default() -> Self {
        Self::new(cyqnus_core::DEFAULT_SAMPLE_RATE)
    }
}

impl AhdsrEnvelope {
    /// Create an idle envelope with default stage times.
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = sanitize_sample_rate(sample_rate);
        Self {
            state: EnvelopeState::Idle,
            elapsed: 0.0,
            level: 0.0,
            release_start_level: 0.0,
            params: AhdsrParams::default(),
            sample_rate,
            dt: 1.0 / sample_rate,
        }
    }

    /// Set sample rate. Invalid rates fall back to the default.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sanitize_sample_rate(sample_rate);
        self.dt = 1.0 / self.sample_rate;
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Copy in new stage times, clamped into the valid domain.
    pub fn set_params(&mut self, params: AhdsrParams) {
        self.params = params.sanitized();
    }

    /// Stage times currently in effect.
    pub fn params(&self) -> &AhdsrParams {
        &self.params
    }

    /// Start the attack stage.
    ///
    /// From Idle the ramp starts at 0. A retrigger picks the ramp up at the
    /// current level so the output does not jump down.
    pub fn note_on(&mut self) {
        self.state = EnvelopeState::Attack;
        self.elapsed = self.level.clamp(0.0, 1.0) * self.params.attack;
    }

    /// Enter release from whatever level the envelope is at now.
    ///
    /// No-op when Idle.
    pub fn note_off(&mut self) {
        if self.state != EnvelopeState::Idle {
            self.release_start_level = self.level;
            self.state = EnvelopeState::Release;
            self.elapsed = 0.0;
        }
    }

    /// Hard stop to Idle with no release ramp.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
        self.elapsed = 0.0;
        self.release_start_level = 0.0;
    }

    /// Get current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Get current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Check if envelope is active (not idle).
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Advance envelope by one sample and return the gain in `[0, 1]`.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let p = self.params;
        match self.state {
            EnvelopeState::Idle => return 0.0,

            EnvelopeState::Attack => {
                if p.attack <= 0.0 {
                    self.level = 1.0;
                    self.enter(EnvelopeState::Hold);
                } else {
                    self.elapsed += self.dt;
                    self.level = (self.elapsed / p.attack).clamp(0.0, 1.0);
                    if self.level >= 1.0 {
                        self.enter(EnvelopeState::Hold);
                    }
                }
            }

            EnvelopeState::Hold => {
                if p.hold <= 0.0 {
                    self.enter(EnvelopeState::Decay);
                } else {
                    self.elapsed += self.dt;
                    if self.elapsed >= p.hold {
                        self.enter(EnvelopeState::Decay);
                    }
                }
            }

            EnvelopeState::Decay => {
                if p.decay <= 0.0 {
                    self.level = p.sustain;
                    self.enter(EnvelopeState::Sustain);
                } else {
                    self.elapsed += self.dt;
                    let progress = self.elapsed / p.decay;
                    self.level = (1.0 - progress * (1.0 - p.sustain)).clamp(0.0, 1.0);
                    if self.elapsed >= p.decay {
                        self.level = p.sustain;
                        self.enter(EnvelopeState::Sustain);
                    }
                }
            }

            EnvelopeState::Sustain => {
                self.level = p.sustain;
            }

            EnvelopeState::Release => {
                if p.release <= 0.0 {
                    self.level = 0.0;
                    self.enter(EnvelopeState::Idle);
                } else {
                    self.elapsed += self.dt;
                    let progress = (self.elapsed / p.release).clamp(0.0, 1.0);
                    self.level = self.release_start_level * (1.0 - progress);
                    if progress >= 1.0 || self.level <= RELEASE_FLOOR {
                        self.level = 0.0;
                        self.enter(EnvelopeState::Idle);
                    }
                }
            }
        }

        self.level
    }

    #[inline]
    fn enter(&mut self, state: EnvelopeState) {
        self.state = state;
        self.elapsed = 0.0;
    }
}
