//! Profile storage for persisting connection settings.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use datacube_core::{ApiKey, BaseUrl};

use super::Profile;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored profile data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredProfile {
    base_url: String,
    api_key: String,
}

/// Get the profile file path.
pub fn profile_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "datacube").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("config.json"))
}

/// Save a profile to disk.
pub fn save_profile(profile: &Profile) -> Result<PathBuf> {
    let stored = StoredProfile {
        base_url: profile.base_url.to_string(),
        api_key: profile.api_key.expose().to_string(),
    };

    let path = profile_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write profile file")?;

    // Owner read/write only; the file holds the API key.
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    debug!(path = %path.display(), "Saved profile");
    Ok(path)
}

/// Load the profile from disk, if one has been saved.
pub fn load_profile() -> Result<Option<Profile>> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read profile file")?;
    let stored: StoredProfile = serde_json::from_str(&json).context("Invalid profile file")?;

    let base_url = BaseUrl::new(&stored.base_url).context("Invalid base URL in profile")?;
    let api_key = ApiKey::new(stored.api_key).context("Invalid API key in profile")?;

    debug!(path = %path.display(), "Loaded profile");
    Ok(Some(Profile { base_url, api_key }))
}

/// Remove the saved profile. Returns whether a file was removed.
pub fn clear_profile() -> Result<bool> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove profile file")?;
    Ok(true)
}
