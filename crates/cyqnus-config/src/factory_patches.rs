//! Factory patches bundled with the library.
//!
//! Always available without external files; useful as starting points and
//! as rendering fixtures.

use crate::{ConfigError, Patch};

/// Identifier and TOML source of every factory patch.
static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("init", INIT_PATCH),
    ("soft_pad", SOFT_PAD_PATCH),
    ("square_lead", SQUARE_LEAD_PATCH),
    ("pluck", PLUCK_PATCH),
    ("noise_hit", NOISE_HIT_PATCH),
];

/// One sine at default settings.
const INIT_PATCH: &str = r#"
name = "Init"
description = "Single sine, default envelope"

[[oscillators]]
wave = "Sine"
level = 1.0

[[oscillators]]
level = 0.0

[[oscillators]]
level = 0.0
"#;

const SOFT_PAD_PATCH: &str = r#"
name = "Soft Pad"
description = "Slow attack, two detuned saws and a sine an octave down"
master_gain = 0.7

[envelope]
attack = 0.8
hold = 0.0
decay = 1.5
sustain = 0.6
release = 2.0

[[oscillators]]
wave = "Saw"
level = 0.7
coarse = 0

[[oscillators]]
wave = "Saw"
level = 0.7
coarse = 0
detune = 1.5

[[oscillators]]
wave = "Sine"
level = 0.5
coarse = -12
"#;

const SQUARE_LEAD_PATCH: &str = r#"
name = "Square Lead"
description = "Snappy square with a narrow pulse an octave up"

[envelope]
attack = 0.005
hold = 0.05
decay = 0.2
sustain = 0.8
release = 0.15

[[oscillators]]
wave = "Square"
level = 0.8

[[oscillators]]
wave = "Pulse"
level = 0.4
coarse = 12
pulse_width = 0.2

[[oscillators]]
level = 0.0
"#;

const PLUCK_PATCH: &str = r#"
name = "Pluck"
description = "Fast decay to silence, triangle and fifth"

[envelope]
attack = 0.001
hold = 0.0
decay = 0.35
sustain = 0.0
release = 0.1

[[oscillators]]
wave = "Triangle"
level = 1.0
coarse = 0

[[oscillators]]
wave = "Triangle"
level = 0.3
coarse = 7
fine = 2.0

[[oscillators]]
level = 0.0
"#;

const NOISE_HIT_PATCH: &str = r#"
name = "Noise Hit"
description = "Percussive noise burst over a low sine"

[envelope]
attack = 0.001
hold = 0.01
decay = 0.12
sustain = 0.0
release = 0.05

[[oscillators]]
wave = "Noise"
level = 0.6

[[oscillators]]
wave = "Sine"
level = 0.8
coarse = -12

[[oscillators]]
level = 0.0
"#;

/// Parse every factory patch.
pub fn factory_patches() -> Vec<Patch> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .collect()
}

/// Identifiers of every factory patch.
pub fn factory_patch_names() -> Vec<&'static str> {
    FACTORY_PATCHES_TOML.iter().map(|(name, _)| *name).collect()
}

/// Look up a factory patch by identifier or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use cyqnus_config::get_factory_patch;
///
/// let pad = get_factory_patch("soft_pad").unwrap();
/// assert_eq!(pad.name, "Soft Pad");
/// assert!(get_factory_patch("Soft Pad").is_ok());
/// assert!(get_factory_patch("missing").is_err());
/// ```
pub fn get_factory_patch(name: &str) -> Result<Patch, ConfigError> {
    if let Some((_, toml)) = FACTORY_PATCHES_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return Patch::from_toml(toml);
    }

    factory_patches()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::PatchNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyqnus_core::ParamStore;
    use cyqnus_synth::PARAM_LAYOUT;

    #[test]
    fn test_all_factory_patches_parse() {
        assert_eq!(factory_patches().len(), FACTORY_PATCHES_TOML.len());
        assert_eq!(factory_patch_names()[0], "init");
    }

    #[test]
    fn test_all_factory_patches_valid() {
        for patch in factory_patches() {
            assert!(
                patch.validate().is_ok(),
                "factory patch '{}' invalid: {:?}",
                patch.name,
                patch.validate()
            );
            let store = ParamStore::new(&PARAM_LAYOUT);
            patch.apply(&store).unwrap();
        }
    }

    #[test]
    fn test_lookup_by_display_name() {
        assert_eq!(get_factory_patch("square lead").unwrap().name, "Square Lead");
        assert_eq!(get_factory_patch("PLUCK").unwrap().name, "Pluck");
    }

    #[test]
    fn test_unknown_patch() {
        assert!(matches!(
            get_factory_patch("nope"),
            Err(ConfigError::PatchNotFound(ref n)) if n == "nope"
        ));
    }
}
