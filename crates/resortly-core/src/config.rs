// ── Client configuration ──
//
// Everything the stores need to talk to the API and the payment gateway.
// Loading (files, env, keyring) lives in `resortly-config`; this is the
// resolved, validated result.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use resortly_api::{RetryPolicy, TransportConfig};

/// What to do after a successful cancel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CancelRefresh {
    /// Flip the local record to cancelled and stop there.
    PatchOnly,
    /// Flip the local record, then re-fetch the list for authoritative state.
    #[default]
    PatchThenRefetch,
}

/// Payment gateway environment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn from_production_flag(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    /// Origin of the Snap app for this environment.
    pub fn app_origin(self) -> &'static str {
        match self {
            Self::Sandbox => "https://app.sandbox.midtrans.com",
            Self::Production => "https://app.midtrans.com",
        }
    }

    /// URL of the widget script.
    pub fn script_url(self) -> String {
        format!("{}/snap/snap.js", self.app_origin())
    }

    /// Hosted checkout page for a token, for consumers that cannot embed the widget.
    pub fn redirect_url(self, snap_token: &str) -> String {
        format!("{}/snap/v4/redirection/{snap_token}", self.app_origin())
    }
}

/// Payment widget settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Public client key; sent with the script, never secret.
    pub client_key: Option<String>,
    pub environment: GatewayEnvironment,
}

/// Resolved configuration for a [`Resort`](crate::Resort) instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root (`https://api.resort.example`); `/api` is appended.
    pub api_url: Url,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub gateway: GatewayConfig,
    pub cancel_refresh: CancelRefresh,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: TransportConfig::default().timeout,
            retry: RetryPolicy::default(),
            gateway: GatewayConfig::default(),
            cancel_refresh: CancelRefresh::default(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_retry(self.retry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_selects_script_host() {
        assert_eq!(
            GatewayEnvironment::Sandbox.script_url(),
            "https://app.sandbox.midtrans.com/snap/snap.js"
        );
        assert_eq!(
            GatewayEnvironment::from_production_flag(true).script_url(),
            "https://app.midtrans.com/snap/snap.js"
        );
        assert_eq!(
            GatewayEnvironment::Production.redirect_url("tok"),
            "https://app.midtrans.com/snap/v4/redirection/tok"
        );
    }

    #[test]
    fn cancel_refresh_defaults_to_refetch() {
        assert_eq!(CancelRefresh::default(), CancelRefresh::PatchThenRefetch);
        assert_eq!(CancelRefresh::PatchOnly.to_string(), "patch-only");
    }
}
