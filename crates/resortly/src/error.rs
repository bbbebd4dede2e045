//! CLI error types with miette diagnostics.
//!
//! Maps store, payment and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use resortly_config::ConfigError;
use resortly_core::{PaymentError, StoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const BUSY: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Silakan login terlebih dahulu")]
    #[diagnostic(
        code(resortly::auth_required),
        help("Run: resortly auth login --profile {profile}")
    )]
    AuthRequired { profile: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(resortly::no_credentials),
        help(
            "Store one with: resortly config set-password\n\
             Or set the RESORTLY_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(resortly::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(resortly::connection),
        help("Check that the API is reachable: resortly config show")
    )]
    Connection { message: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(resortly::not_found),
        help("Run: resortly {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Payment ──────────────────────────────────────────────────────
    #[error("Pembayaran sedang diproses")]
    #[diagnostic(code(resortly::payment_busy))]
    PaymentBusy,

    #[error("{message}")]
    #[diagnostic(
        code(resortly::payment),
        help("Retry later, or continue an open payment with: resortly pay start --resume ...")
    )]
    Payment { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(resortly::widget),
        help("Set a Midtrans client key: resortly config set midtrans-client-key <KEY>")
    )]
    Widget { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(resortly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(resortly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: resortly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(resortly::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(resortly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthRequired { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } | Self::Payment { .. } => exit_code::REJECTED,
            Self::PaymentBusy => exit_code::BUSY,
            Self::Connection { .. } | Self::Widget { .. } => exit_code::CONNECTION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── Store / payment / config → CliError ──────────────────────────────

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AuthRequired => Self::AuthRequired {
                profile: "default".into(),
            },
            StoreError::ServerRejected { message } => Self::Rejected { message },
            StoreError::Transport { message } => Self::Connection { message },
            StoreError::Invalid { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
        }
    }
}

impl From<PaymentError> for CliError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::AuthRequired => Self::AuthRequired {
                profile: "default".into(),
            },
            PaymentError::AlreadyInProgress => Self::PaymentBusy,
            PaymentError::WidgetUnavailable { .. } => Self::Widget {
                message: err.to_string(),
            },
            PaymentError::TokenUnavailable | PaymentError::TokenRequest { .. } => Self::Payment {
                message: err.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile(name) => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<resortly_core::WidgetLoadError> for CliError {
    fn from(err: resortly_core::WidgetLoadError) -> Self {
        Self::Widget {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_exit_class() {
        let auth = CliError::from(StoreError::AuthRequired);
        assert_eq!(auth.exit_code(), exit_code::AUTH);
        assert_eq!(auth.to_string(), "Silakan login terlebih dahulu");

        let rejected = CliError::from(StoreError::ServerRejected {
            message: "Stok produk tidak mencukupi".into(),
        });
        assert_eq!(rejected.exit_code(), exit_code::REJECTED);
        assert_eq!(rejected.to_string(), "Stok produk tidak mencukupi");
    }

    #[test]
    fn double_payment_is_its_own_exit_code() {
        let busy = CliError::from(PaymentError::AlreadyInProgress);
        assert_eq!(busy.exit_code(), exit_code::BUSY);
    }
}
