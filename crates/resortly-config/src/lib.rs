//! Shared configuration for resortly consumers.
//!
//! TOML profiles with `RESORTLY_` environment overrides, password
//! resolution (env + keyring + plaintext), a file-backed session token
//! with a 7-day lifetime, and translation to `resortly_core::ClientConfig`.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use resortly_core::{CancelRefresh, ClientConfig, GatewayConfig, GatewayEnvironment, TokenStore};

const KEYRING_SERVICE: &str = "resortly";
const ENV_PREFIX: &str = "RESORTLY_";

/// How long a saved session token is honoured.
pub const SESSION_TTL_DAYS: i64 = 7;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles (e.g. `production`, `staging`).
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: `requested`, else the configured default.
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    15
}

/// One API deployment and the account used against it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Server root, without the `/api` suffix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Login email.
    pub email: Option<String>,

    /// Password (plaintext; prefer the keyring or `RESORTLY_PASSWORD`).
    pub password: Option<String>,

    /// Public Midtrans client key for the payment widget.
    pub midtrans_client_key: Option<String>,

    /// Use the production gateway instead of the sandbox.
    #[serde(default)]
    pub midtrans_production: bool,

    /// Map provider access token, passed through to consumers that draw maps.
    pub map_token: Option<String>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// What to do after a successful cancel.
    #[serde(default)]
    pub cancel_refresh: CancelRefresh,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            password: None,
            midtrans_client_key: None,
            midtrans_production: false,
            map_token: None,
            timeout: None,
            cancel_refresh: CancelRefresh::default(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8000".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "resortly", "resortly")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("resortly");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding saved sessions.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

/// Session file for a profile.
pub fn session_path(profile_name: &str) -> PathBuf {
    data_dir().join("sessions").join(format!("{profile_name}.toml"))
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the config file at the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a config file; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// The named profile with `RESORTLY_*` environment overrides applied.
///
/// An unknown name is an error, except `default`, which may be given
/// entirely through the environment.
pub fn resolve_profile(cfg: &Config, name: &str) -> Result<Profile, ConfigError> {
    let base = match cfg.profiles.get(name) {
        Some(profile) => profile.clone(),
        None if name == "default" => Profile::default(),
        None => return Err(ConfigError::UnknownProfile(name.into())),
    };
    let profile: Profile = Figment::new()
        .merge(Serialized::defaults(base))
        .merge(Env::prefixed(ENV_PREFIX).only(&[
            "api_url",
            "email",
            "midtrans_client_key",
            "midtrans_production",
            "map_token",
            "timeout",
            "cancel_refresh",
        ]))
        .extract()?;
    Ok(profile)
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolve the login password: env var, then keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var("RESORTLY_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password.expose_secret())?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a resolved profile.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let mut config = ClientConfig::new(api_url);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.cancel_refresh = profile.cancel_refresh;
    config.gateway = GatewayConfig {
        client_key: profile.midtrans_client_key.clone(),
        environment: GatewayEnvironment::from_production_flag(profile.midtrans_production),
    };
    Ok(config)
}

// ── Session persistence ─────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Keeps the session token in a TOML file next to an expiry stamp.
///
/// Tokens past their expiry are deleted on load.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The session file of a named profile.
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(session_path(profile_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> std::io::Result<Option<StoredSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        toml::from_str(&raw)
            .map(Some)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<SecretString> {
        let stored = match self.read() {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable session file ignored");
                return None;
            }
        };
        if stored.expires_at <= Utc::now() {
            debug!(path = %self.path.display(), "saved session expired");
            if let Err(e) = self.clear() {
                warn!(error = %e, "could not remove expired session file");
            }
            return None;
        }
        Some(SecretString::from(stored.token))
    }

    fn save(&self, token: &SecretString) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            token: token.expose_secret().to_owned(),
            expires_at: Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS),
        };
        let body = toml::to_string(&stored)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))?;
        let mut file = create_private(&self.path)?;
        file.write_all(body.as_bytes())
    }

    fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Open `path` for writing, readable by the owner only before any byte lands.
#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; an older file keeps its bits otherwise.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.timeout, 15);
        assert_eq!(cfg.profile_name(None), "default");
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                api_url: "https://staging.resort.example".into(),
                email: Some("tamu@example.com".into()),
                cancel_refresh: CancelRefresh::PatchOnly,
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["staging"], cfg.profiles["staging"]);
    }

    #[test]
    fn environment_overrides_profile() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    default_profile = "prod"

                    [profiles.prod]
                    api_url = "https://api.resort.example"
                    midtrans_client_key = "Mid-client-file"
                "#,
            )?;
            jail.set_env("RESORTLY_MIDTRANS_PRODUCTION", "true");
            jail.set_env("RESORTLY_TIMEOUT", "40");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            let name = cfg.profile_name(None);
            let profile = resolve_profile(&cfg, name).unwrap();
            assert_eq!(name, "prod");
            assert!(profile.midtrans_production);

            let client = profile_to_client_config(&profile, &cfg.defaults).unwrap();
            assert_eq!(client.timeout, Duration::from_secs(40));
            assert_eq!(client.gateway.environment, GatewayEnvironment::Production);
            assert_eq!(client.gateway.client_key.as_deref(), Some("Mid-client-file"));
            Ok(())
        });
    }

    #[test]
    fn default_profile_can_come_from_env_alone() {
        Jail::expect_with(|jail| {
            jail.set_env("RESORTLY_API_URL", "https://env.resort.example");
            let profile = resolve_profile(&Config::default(), "default").unwrap();
            assert_eq!(profile.api_url, "https://env.resort.example");
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let err = resolve_profile(&Config::default(), "nope").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(name) if name == "nope"));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn session_file_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("sessions").join("default.toml"));
        assert!(store.load().is_none());

        store.save(&SecretString::from("tok-9".to_owned())).unwrap();
        assert_eq!(store.load().unwrap().expose_secret(), "tok-9");

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.toml");
        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;

        let store = FileTokenStore::new(&path);
        store.save(&SecretString::from("fresh".to_owned())).unwrap();
        assert_eq!(mode(&path), 0o600);

        // A world-readable file from an earlier run is tightened on save.
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        store.save(&SecretString::from("again".to_owned())).unwrap();
        assert_eq!(mode(&path), 0o600);
        assert_eq!(store.load().unwrap().expose_secret(), "again");
    }

    #[test]
    fn expired_session_is_removed_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.toml");
        let stale = StoredSession {
            token: "old".into(),
            expires_at: Utc::now() - chrono::Duration::hours(1),
        };
        std::fs::write(&path, toml::to_string(&stale).unwrap()).unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn saved_session_expires_in_seven_days() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("s.toml"));
        store.save(&SecretString::from("t".to_owned())).unwrap();

        let stored = store.read().unwrap().unwrap();
        let left = stored.expires_at - Utc::now();
        assert!(left > chrono::Duration::days(6) && left <= chrono::Duration::days(7));
    }
}
