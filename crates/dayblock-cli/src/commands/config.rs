//! Configuration commands for CLI.

use clap::Subcommand;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value (dot-separated key, e.g. axis.snap_unit_minutes)
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// Show the full configuration as TOML
    Show,
}

pub fn run(ctx: &Context, action: ConfigAction) -> CliResult {
    let mut config = ctx.load_config()?;
    match action {
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save_to(&ctx.config_path())?;
            println!("{key} = {value}");
        }
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
