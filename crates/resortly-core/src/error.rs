use thiserror::Error;

use crate::payment::widget::WidgetLoadError;

/// Failure of a store operation.
///
/// The display text is the user-facing message; stores also copy it into
/// their observable `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    // ── Session ─────────────────────────────────────────────────────
    /// No token in the session, or the server revoked it.
    #[error("Silakan login terlebih dahulu")]
    AuthRequired,

    // ── Server ──────────────────────────────────────────────────────
    /// The API answered and reported failure.
    #[error("{message}")]
    ServerRejected { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Network failure, timeout, or an unreadable response.
    #[error("{message}")]
    Transport { message: String },

    // ── Input ───────────────────────────────────────────────────────
    /// Rejected locally before any request was made.
    #[error("{message}")]
    Invalid { message: String },
}

impl StoreError {
    /// Translate an API error, using `fallback` when the server gave no
    /// message of its own.
    pub fn from_api(err: &resortly_api::Error, fallback: &str) -> Self {
        use resortly_api::Error as Api;

        match err {
            Api::Authentication { .. } => Self::AuthRequired,
            Api::Rejected { message, .. } => Self::ServerRejected {
                message: message.clone().unwrap_or_else(|| fallback.to_owned()),
            },
            Api::MissingData => Self::ServerRejected {
                message: fallback.to_owned(),
            },
            Api::Io(e) => Self::Invalid {
                message: e.to_string(),
            },
            Api::Transport(_)
            | Api::InvalidUrl(_)
            | Api::Timeout { .. }
            | Api::ClientBuild(_)
            | Api::Deserialization { .. } => Self::Transport {
                message: format!("{fallback}. Silakan coba lagi nanti."),
            },
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

impl From<resortly_api::Error> for StoreError {
    fn from(err: resortly_api::Error) -> Self {
        Self::from_api(&err, "Permintaan gagal")
    }
}

/// Failure of a payment attempt, before or around the widget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Silakan login terlebih dahulu")]
    AuthRequired,

    /// Another payment is already being started from this orchestrator.
    #[error("Pembayaran sedang diproses")]
    AlreadyInProgress,

    /// The server accepted the request but issued no widget token.
    #[error("Gagal mendapatkan token pembayaran")]
    TokenUnavailable,

    /// The token request itself failed.
    #[error("{message}")]
    TokenRequest { message: String },

    /// The payment widget could not be loaded.
    #[error("Midtrans tidak tersedia: {reason}")]
    WidgetUnavailable { reason: String },
}

impl From<WidgetLoadError> for PaymentError {
    fn from(err: WidgetLoadError) -> Self {
        Self::WidgetUnavailable {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_keeps_server_message() {
        let api = resortly_api::Error::Rejected {
            status: 422,
            message: Some("Stok produk tidak mencukupi".into()),
        };
        assert_eq!(
            StoreError::from_api(&api, "Gagal menambahkan ke keranjang").to_string(),
            "Stok produk tidak mencukupi"
        );
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let api = resortly_api::Error::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(
            StoreError::from_api(&api, "Gagal mengambil data pesanan"),
            StoreError::ServerRejected {
                message: "Gagal mengambil data pesanan".into()
            }
        );
    }

    #[test]
    fn expired_token_means_login_again() {
        let api = resortly_api::Error::Authentication {
            message: "Unauthenticated.".into(),
        };
        assert!(StoreError::from_api(&api, "x").is_auth_required());
    }
}
