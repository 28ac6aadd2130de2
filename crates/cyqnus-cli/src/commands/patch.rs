//! Patch listing, inspection, validation and capture.

use crate::commands::common::{apply_overrides, load_patch, parse_key_val};
use clap::{Args, Subcommand};
use cyqnus_config::{Patch, ValidationError, factory_patch_names, get_factory_patch};
use cyqnus_core::ParamStore;
use cyqnus_synth::PARAM_LAYOUT;
use std::path::PathBuf;

#[derive(Args)]
pub struct PatchArgs {
    #[command(subcommand)]
    command: PatchCommand,
}

#[derive(Subcommand)]
enum PatchCommand {
    /// List factory patches
    List,

    /// Print a patch as TOML
    Show {
        /// Factory patch name or patch file
        #[arg(value_name = "PATCH")]
        patch: String,

        /// Print every parameter value after applying the patch
        #[arg(long)]
        resolved: bool,
    },

    /// Check a patch for unknown keys and out-of-range values
    Validate {
        /// Factory patch name or patch file
        #[arg(value_name = "PATCH")]
        patch: String,
    },

    /// Write a patch file from a starting patch plus overrides
    Save {
        /// Output TOML file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Name stored in the file
        #[arg(long)]
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Factory patch name or patch file to start from
        #[arg(long)]
        from: Option<String>,

        /// Parameter override as string_id=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

pub fn run(args: PatchArgs) -> anyhow::Result<()> {
    match args.command {
        PatchCommand::List => {
            println!("Factory Patches");
            println!("===============");
            println!();
            for id in factory_patch_names() {
                let patch = get_factory_patch(id)?;
                println!(
                    "  {:12} - {}",
                    id,
                    patch.description.as_deref().unwrap_or(&patch.name)
                );
            }
            println!();
            println!("Use 'cyqnus patch show <name>' to see a patch.");
        }

        PatchCommand::Show { patch, resolved } => {
            let patch = load_patch(&patch)?;
            print!("{}", patch.to_toml()?);

            if resolved {
                let store = ParamStore::new(&PARAM_LAYOUT);
                patch.apply(&store)?;
                println!();
                println!("# Resolved values");
                for (desc, value) in PARAM_LAYOUT.iter().zip(store.snapshot()) {
                    match desc.choice_label(value) {
                        Some(label) => println!("# {:14} = {}", desc.string_id, label),
                        None => println!("# {:14} = {}", desc.string_id, value),
                    }
                }
            }
        }

        PatchCommand::Validate { patch } => {
            let patch = load_patch(&patch)?;
            match patch.validate() {
                Ok(()) => println!("'{}' is valid", patch.name),
                Err(ValidationError::Multiple(errors)) => {
                    for e in &errors {
                        println!("  {}", e);
                    }
                    anyhow::bail!("'{}' has {} problems", patch.name, errors.len());
                }
                Err(e) => {
                    println!("  {}", e);
                    anyhow::bail!("'{}' has 1 problem", patch.name);
                }
            }
        }

        PatchCommand::Save {
            output,
            name,
            description,
            from,
            params,
        } => {
            let store = ParamStore::new(&PARAM_LAYOUT);
            if let Some(from) = &from {
                load_patch(from)?.apply(&store)?;
            }
            apply_overrides(&store, &params)?;

            let mut patch = Patch::from_store(name, &store);
            patch.description = description;
            patch.save(&output)?;
            println!("Saved '{}' to {}", patch.name, output.display());
        }
    }

    Ok(())
}
