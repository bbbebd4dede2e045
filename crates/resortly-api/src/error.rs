use thiserror::Error;

/// Top-level error type for the `resortly-api` crate.
///
/// Covers every failure mode of the REST surface: authentication,
/// transport, server-side rejection, and payload decoding.
/// `resortly-core` maps these into the store error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API answered 401, or the login endpoint refused the credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Server ──────────────────────────────────────────────────────
    /// The API answered but reported failure, either through a non-2xx
    /// status or a `{ "status": false }` envelope on a 2xx response.
    #[error("Request rejected (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The envelope reported success but carried no `data` field.
    #[error("Response envelope is missing its data payload")]
    MissingData,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Reading a local file for upload failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if the token was rejected and the session should be
    /// treated as logged out.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Rejected { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rejected { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The message the server attached to its rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            Self::Authentication { message } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_are_transient() {
        for status in [502, 503, 504] {
            let err = Error::Rejected {
                status,
                message: None,
            };
            assert!(err.is_transient(), "HTTP {status} should be retried");
        }
        let err = Error::Rejected {
            status: 422,
            message: Some("invalid".into()),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn server_message_surfaces_rejection_text() {
        let err = Error::Rejected {
            status: 200,
            message: Some("Kamar tidak tersedia".into()),
        };
        assert_eq!(err.server_message(), Some("Kamar tidak tersedia"));
        assert_eq!(Error::MissingData.server_message(), None);
    }
}
