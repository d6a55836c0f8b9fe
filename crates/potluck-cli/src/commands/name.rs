//! Display-name command handlers

use anyhow::{Context, Result};

use potluck_core::{profile, Config, FileKvStore};

use crate::output::{Output, OutputFormat};

/// Show the saved display name
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let kv = FileKvStore::new(config.profile_path());
    let name = profile::load_display_name(&kv)?;

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "display_name": name }));
        }
        OutputFormat::Quiet => {
            if let Some(name) = name {
                println!("{}", name);
            }
        }
        OutputFormat::Human => match name {
            Some(name) => println!("Display name: {}", name),
            None => {
                println!("No display name set.");
                println!("Set one with: potluck name set <name>");
            }
        },
    }

    Ok(())
}

/// Set the display name
pub fn set(name: String, output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let kv = FileKvStore::new(config.profile_path());
    profile::save_display_name(&kv, &name)?;

    output.success(&format!("Display name set to '{}'", name.trim()));
    Ok(())
}
