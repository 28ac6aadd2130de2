//! Parameter metadata.
//!
//! Every synth parameter is described by a [`ParamDescriptor`] carrying its
//! display names, unit, range, default and a pair of stable identifiers:
//!
//! - [`ParamId`]: numeric ID for automation and persistence
//! - `string_id`: human-readable ID used by patch files and the CLI
//!
//! Descriptors are `const`-constructible so a whole layout can live in a
//! `static` table.
//!
//! # Example
//!
//! ```rust
//! use cyqnus_core::{ParamDescriptor, ParamFlags, ParamId, ParamUnit};
//!
//! static WAVES: &[&str] = &["Sine", "Saw"];
//!
//! const WAVE: ParamDescriptor = ParamDescriptor::choice("Waveform", "Wave", WAVES, 0)
//!     .with_id(ParamId(200), "osc1_wave");
//!
//! assert_eq!(WAVE.unit, ParamUnit::Choice);
//! assert!(WAVE.flags.contains(ParamFlags::STEPPED));
//! assert_eq!(WAVE.quantize(0.7), 1.0);
//! assert_eq!(WAVE.choice_label(1.0), Some("Saw"));
//! ```

use libm::roundf;

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
///
/// # Convention
///
/// - Amplitude envelope: 100..=104
/// - Master gain: 110
/// - Oscillator `k` (1-based): `200 + 10 * (k - 1)` onward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// # Example
///
/// ```rust
/// use cyqnus_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::AUTOMATABLE));
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter only takes integer values (choices, semitones).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Full description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Attack", "Fine Tune").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value the parameter holds before anything writes to it.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Stable string ID, e.g. `"amp_attack"`. Default: `""` (unassigned).
    pub string_id: &'static str,

    /// Capability flags. Default: [`ParamFlags::AUTOMATABLE`].
    pub flags: ParamFlags,

    /// Parameter group (e.g., `"envelope"`, `"osc2"`). Empty means top-level.
    pub group: &'static str,

    /// Labels for [`ParamUnit::Choice`] parameters, indexed by value.
    pub choices: &'static [&'static str],
}

impl ParamDescriptor {
    const fn base(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
        step: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            group: "",
            choices: &[],
        }
    }

    /// Time parameter in seconds.
    ///
    /// # Arguments
    ///
    /// * `name` - Full parameter name (e.g., "Attack")
    /// * `short_name` - Short name for narrow displays (e.g., "Atk")
    /// * `min` - Minimum time in seconds
    /// * `max` - Maximum time in seconds
    /// * `default` - Default time in seconds
    pub const fn seconds(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, short_name, ParamUnit::Seconds, min, max, default, 0.001)
    }

    /// Unitless level in `[0, 1]`.
    pub const fn level(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self::base(name, short_name, ParamUnit::None, 0.0, 1.0, default, 0.01)
    }

    /// Frequency parameter in Hz.
    pub const fn hertz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, short_name, ParamUnit::Hertz, min, max, default, 0.01)
    }

    /// Whole-semitone transposition. Always [`ParamFlags::STEPPED`].
    pub const fn semitones(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, short_name, ParamUnit::Semitones, min, max, default, 1.0)
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
    }

    /// Fine tuning in cents.
    pub const fn cents(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(name, short_name, ParamUnit::Cents, min, max, default, 1.0)
    }

    /// Discrete choice over `choices`, stored as the index `0..choices.len()`.
    ///
    /// Always [`ParamFlags::STEPPED`].
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        choices: &'static [&'static str],
        default: usize,
    ) -> Self {
        let max = if choices.is_empty() {
            0.0
        } else {
            (choices.len() - 1) as f32
        };
        let mut desc = Self::base(
            name,
            short_name,
            ParamUnit::Choice,
            0.0,
            max,
            default as f32,
            1.0,
        )
        .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED));
        desc.choices = choices;
        desc
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cyqnus_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::level("Sustain", "Sus", 0.5).with_id(ParamId(103), "amp_sustain");
    /// assert_eq!(desc.id, ParamId(103));
    /// assert_eq!(desc.string_id, "amp_sustain");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the parameter group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cyqnus_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::seconds("Attack", "Atk", 0.001, 32.0, 0.01);
    /// assert_eq!(desc.clamp(1.0), 1.0);
    /// assert_eq!(desc.clamp(-1.0), 0.001);
    /// assert_eq!(desc.clamp(100.0), 32.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Clamps, then rounds to the nearest integer for stepped parameters.
    #[inline]
    pub fn quantize(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        if self.flags.contains(ParamFlags::STEPPED) {
            roundf(clamped)
        } else {
            clamped
        }
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[inline]
    pub fn in_range(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Label of a choice parameter's value, or `None` for other units.
    pub fn choice_label(&self, value: f32) -> Option<&'static str> {
        if self.choices.is_empty() {
            return None;
        }
        let index = self.quantize(value) as usize;
        self.choices.get(index).copied()
    }

    /// Index of a choice label (ASCII case-insensitive).
    pub fn choice_index(&self, label: &str) -> Option<usize> {
        self.choices
            .iter()
            .position(|choice| choice.eq_ignore_ascii_case(label))
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Seconds (s) - envelope stage times.
    Seconds,

    /// Hertz (Hz) - frequency offsets.
    Hertz,

    /// Semitones (st) - coarse transposition.
    Semitones,

    /// Cents (ct) - fine tuning.
    Cents,

    /// Index into the descriptor's `choices`.
    Choice,

    /// No unit - for dimensionless parameters such as levels.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cyqnus_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Seconds.suffix(), " s");
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Seconds => " s",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Semitones => " st",
            ParamUnit::Cents => " ct",
            ParamUnit::Choice | ParamUnit::None => "",
        }
    }
}
