//! Parameter layout listing.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use cyqnus_core::{ParamDescriptor, ParamFlags};
use cyqnus_synth::PARAM_LAYOUT;

#[derive(Args)]
pub struct ParamsArgs {
    /// Only show one group (envelope, osc1, osc2, osc3)
    #[arg(long)]
    group: Option<String>,

    /// Print the layout as JSON
    #[arg(long)]
    json: bool,
}

fn describe(index: usize, desc: &ParamDescriptor) -> serde_json::Value {
    serde_json::json!({
        "index": index,
        "id": desc.id.0,
        "string_id": desc.string_id,
        "name": desc.name,
        "group": desc.group,
        "min": desc.min,
        "max": desc.max,
        "default": desc.default,
        "unit": desc.unit.suffix().trim(),
        "stepped": desc.flags.contains(ParamFlags::STEPPED),
        "choices": desc.choices,
    })
}

fn format_range(desc: &ParamDescriptor) -> String {
    if desc.choices.is_empty() {
        format!("{} - {}{}", desc.min, desc.max, desc.unit.suffix())
    } else {
        desc.choices.join("|")
    }
}

fn format_default(desc: &ParamDescriptor) -> String {
    desc.choice_label(desc.default).map_or_else(
        || format!("{}{}", desc.default, desc.unit.suffix()),
        str::to_string,
    )
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let selected: Vec<(usize, &ParamDescriptor)> = PARAM_LAYOUT
        .iter()
        .enumerate()
        .filter(|(_, d)| {
            args.group
                .as_deref()
                .is_none_or(|g| d.group.eq_ignore_ascii_case(g))
        })
        .collect();

    if selected.is_empty() {
        anyhow::bail!(
            "Unknown group: {}",
            args.group.as_deref().unwrap_or_default()
        );
    }

    if args.json {
        let list: Vec<_> = selected.iter().map(|(i, d)| describe(*i, d)).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("Synth Parameters");
    println!("================");
    println!();
    println!(
        "  {:>3}  {:14}  {:12}  {:10}  {:12}  {}",
        "#", "ID", "Name", "Group", "Default", "Range"
    );
    println!(
        "  {:>3}  {:14}  {:12}  {:10}  {:12}  {}",
        "-", "--", "----", "-----", "-------", "-----"
    );
    for (index, desc) in selected {
        println!(
            "  {:>3}  {:14}  {:12}  {:10}  {:12}  {}",
            index,
            desc.string_id,
            desc.name,
            desc.group,
            format_default(desc),
            format_range(desc)
        );
    }
    println!();
    println!("Override with: cyqnus render out.wav --param <ID>=<value>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyqnus_synth::params::{AMP_ATTACK, OSC_WAVE, osc_param};

    #[test]
    fn test_describe_choice_param() {
        let index = osc_param(1, OSC_WAVE);
        let json = describe(index, &PARAM_LAYOUT[index]);
        assert_eq!(json["string_id"], "osc2_wave");
        assert_eq!(json["stepped"], true);
        assert_eq!(json["choices"][1], "Saw");
    }

    #[test]
    fn test_format_helpers() {
        let attack = &PARAM_LAYOUT[AMP_ATTACK];
        assert!(format_range(attack).starts_with("0.001 - 32"));
        assert_eq!(format_default(&PARAM_LAYOUT[osc_param(0, OSC_WAVE)]), "Sine");
    }
}
