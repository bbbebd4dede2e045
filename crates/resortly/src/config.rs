//! CLI configuration: thin wrapper around `resortly_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--profile, --api-url, --timeout).

use resortly_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use resortly_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// The active profile after env and CLI flag overrides.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    let mut profile = resortly_config::resolve_profile(config, &name).map_err(|e| match e {
        resortly_config::ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
            name,
            available: available_profiles(config),
        },
        other => other.into(),
    })?;

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
    Ok((name, profile))
}

/// Translate the active profile into a `ClientConfig`.
pub fn client_config(
    profile: &Profile,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    Ok(resortly_config::profile_to_client_config(profile, &config.defaults)?)
}

pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
