//! Config subcommand handlers.

use std::fmt::Write;

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;

use resortly_core::CancelRefresh;

use crate::cli::{ConfigArgs, ConfigCommand, ConfigKey, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format one profile for display, masking the password.
fn format_profile_redacted(name: &str, p: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[profiles.{name}]");
    let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
    if let Some(ref email) = p.email {
        let _ = writeln!(out, "email = \"{email}\"");
    }
    if p.password.is_some() {
        let _ = writeln!(out, "password = \"****\"");
    }
    if let Some(ref key) = p.midtrans_client_key {
        let _ = writeln!(out, "midtrans_client_key = \"{key}\"");
    }
    let _ = writeln!(out, "midtrans_production = {}", p.midtrans_production);
    if p.map_token.is_some() {
        let _ = writeln!(out, "map_token = \"****\"");
    }
    if let Some(timeout) = p.timeout {
        let _ = writeln!(out, "timeout = {timeout}");
    }
    let _ = write!(out, "cancel_refresh = \"{}\"", p.cancel_refresh);
    out
}

/// Copy of a profile with secrets masked, for structured output.
fn redacted(p: &Profile) -> Profile {
    let mask = |v: &Option<String>| v.as_ref().map(|_| "****".to_owned());
    Profile {
        password: mask(&p.password),
        map_token: mask(&p.map_token),
        ..p.clone()
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_bool(raw: &str) -> Result<bool, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "ya" | "1" => Ok(true),
        "false" | "no" | "tidak" | "0" => Ok(false),
        _ => Err(CliError::Validation {
            field: "value".into(),
            reason: format!("expected true or false, got '{raw}'"),
        }),
    }
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: ConfigKey, value: &str) -> Result<(), CliError> {
    match key {
        ConfigKey::ApiUrl => {
            url::Url::parse(value).map_err(|e| CliError::Validation {
                field: "api-url".into(),
                reason: e.to_string(),
            })?;
            value.clone_into(&mut profile.api_url);
        }
        ConfigKey::Email => profile.email = Some(value.to_owned()),
        ConfigKey::MidtransClientKey => profile.midtrans_client_key = Some(value.to_owned()),
        ConfigKey::MidtransProduction => profile.midtrans_production = parse_bool(value)?,
        ConfigKey::MapToken => profile.map_token = Some(value.to_owned()),
        ConfigKey::Timeout => {
            let secs = value.parse::<u64>().map_err(|e| CliError::Validation {
                field: "timeout".into(),
                reason: e.to_string(),
            })?;
            profile.timeout = Some(secs);
        }
        ConfigKey::CancelRefresh => {
            profile.cancel_refresh =
                value.parse::<CancelRefresh>().map_err(|_| CliError::Validation {
                    field: "cancel-refresh".into(),
                    reason: format!("expected patch-only or patch-then-refetch, got '{value}'"),
                })?;
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let (name, profile) = config::active_profile(global, &cfg)?;
            let out = output::render_single(
                &global.output,
                &redacted(&profile),
                |p| format_profile_redacted(&name, p),
                |p| p.api_url.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            let lines: Vec<String> = names
                .into_iter()
                .map(|n| {
                    if *n == active {
                        format!("* {n}")
                    } else {
                        format!("  {n}")
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(name.clone()).or_default();
            set_key(profile, key, &value)?;
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Updated profile '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            let pw = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            resortly_config::store_password(&name, &SecretString::from(pw))?;
            if !global.quiet {
                eprintln!("Password for '{name}' stored in the system keyring");
            }
            Ok(())
        }
    }
}

/// Interactive profile setup.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg: Config = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = cfg.profiles.get(&name).cloned().unwrap_or_default();

    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default(profile.api_url.clone())
        .interact_text()
        .map_err(prompt_err)?;
    set_key(&mut profile, ConfigKey::ApiUrl, &api_url)?;

    let email: String = Input::new()
        .with_prompt("Email")
        .allow_empty(true)
        .default(profile.email.clone().unwrap_or_default())
        .interact_text()
        .map_err(prompt_err)?;
    profile.email = Some(email).filter(|e| !e.is_empty());

    let client_key: String = Input::new()
        .with_prompt("Midtrans client key")
        .allow_empty(true)
        .default(profile.midtrans_client_key.clone().unwrap_or_default())
        .interact_text()
        .map_err(prompt_err)?;
    profile.midtrans_client_key = Some(client_key).filter(|k| !k.is_empty());

    let env_choice = Select::new()
        .with_prompt("Midtrans environment")
        .items(&["Sandbox", "Production"])
        .default(usize::from(profile.midtrans_production))
        .interact()
        .map_err(prompt_err)?;
    profile.midtrans_production = env_choice == 1;

    if Confirm::new()
        .with_prompt("Store a password in the system keyring now?")
        .default(false)
        .interact()
        .map_err(prompt_err)?
    {
        let pw = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
        resortly_config::store_password(&name, &SecretString::from(pw))?;
    }

    if cfg.profiles.is_empty() {
        cfg.default_profile = Some(name.clone());
    }
    cfg.profiles.insert(name.clone(), profile);
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!(
            "Profile '{name}' saved to {}",
            config::config_path().display()
        );
    }
    Ok(())
}
