//! Profile management subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::{Profile, storage};

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Save --base-url and --api-key as the default profile
    Set,

    /// Display the saved profile
    Show,

    /// Remove the saved profile
    Clear,
}

pub fn handle(cmd: ConfigCommand, connection: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Set => set(connection),
        ConfigSubcommand::Show => show(),
        ConfigSubcommand::Clear => clear(),
    }
}

fn set(connection: &ConnectionArgs) -> Result<()> {
    let profile = Profile::from_args(connection)?;
    let path = storage::save_profile(&profile).context("Failed to save profile")?;

    output::success(&format!("Saved profile to {}", path.display()));
    output::field("Base URL", profile.base_url.as_str());

    Ok(())
}

fn show() -> Result<()> {
    let Some(profile) = storage::load_profile().context("Failed to load profile")? else {
        output::note("No profile saved. Run 'datacube config set' first.");
        return Ok(());
    };

    output::field("Base URL", profile.base_url.as_str());
    output::field("API key", &mask(profile.api_key.expose()));

    Ok(())
}

fn clear() -> Result<()> {
    if storage::clear_profile()? {
        output::success("Profile removed");
    } else {
        output::note("No profile saved.");
    }
    Ok(())
}

/// Hide all but the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_last_four() {
        assert_eq!(mask("dc_live_4f9a2b7c"), "************2b7c");
        assert_eq!(mask("abc"), "***");
    }
}
