//! Shared CLI helpers used across multiple commands.

use cyqnus_config::{ConfigError, Patch, get_factory_patch};
use cyqnus_core::ParamStore;
use std::path::Path;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load a patch by factory name, or from a TOML file path.
pub fn load_patch(name: &str) -> anyhow::Result<Patch> {
    match get_factory_patch(name) {
        Ok(patch) => return Ok(patch),
        Err(ConfigError::PatchNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let path = Path::new(name);
    if path.exists() {
        return Ok(Patch::load(path)?);
    }

    anyhow::bail!(
        "Patch '{}' not found. Use 'cyqnus patch list' to see factory patches.",
        name
    )
}

/// Apply `--param` overrides by string id.
///
/// Values are numbers, or a label for choice parameters such as
/// `osc1_wave=saw`. Values outside the range are clamped by the store.
pub fn apply_overrides(store: &ParamStore, overrides: &[(String, String)]) -> anyhow::Result<()> {
    for (key, raw) in overrides {
        let index = store.index_of(key).ok_or_else(|| {
            anyhow::anyhow!("Unknown parameter: {} (see 'cyqnus params')", key)
        })?;
        let Some(desc) = store.descriptor(index) else {
            anyhow::bail!("Unknown parameter: {}", key);
        };

        let value = match raw.parse::<f32>() {
            Ok(v) if v.is_finite() => v,
            _ => desc
                .choice_index(raw)
                .map(|i| i as f32)
                .ok_or_else(|| anyhow::anyhow!("Invalid value for {}: '{}'", key, raw))?,
        };

        store.set(index, value);
        tracing::debug!(param = %key, requested = value, stored = store.get(index), "override");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyqnus_synth::params::{AMP_SUSTAIN, OSC_WAVE, osc_param};
    use cyqnus_synth::{OscillatorWaveform, PARAM_LAYOUT};

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("amp_attack=0.5"),
            Ok(("amp_attack".to_string(), "0.5".to_string()))
        );
        assert_eq!(
            parse_key_val("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let store = ParamStore::new(&PARAM_LAYOUT);
        let overrides = vec![
            ("amp_sustain".to_string(), "0.25".to_string()),
            ("osc1_wave".to_string(), "Square".to_string()),
        ];
        apply_overrides(&store, &overrides).unwrap();
        assert_eq!(store.get(AMP_SUSTAIN), 0.25);
        assert_eq!(
            store.get(osc_param(0, OSC_WAVE)),
            OscillatorWaveform::Square.index() as f32
        );
    }

    #[test]
    fn test_apply_overrides_rejects_unknown() {
        let store = ParamStore::new(&PARAM_LAYOUT);
        let bad_name = vec![("cutoff".to_string(), "1".to_string())];
        assert!(apply_overrides(&store, &bad_name).is_err());
        let bad_value = vec![("amp_hold".to_string(), "long".to_string())];
        assert!(apply_overrides(&store, &bad_value).is_err());
    }

    #[test]
    fn test_load_patch_factory_and_missing() {
        assert_eq!(load_patch("pluck").unwrap().name, "Pluck");
        assert!(load_patch("/no/such/patch.toml").is_err());
    }
}
