// Authentication endpoints
//
// Token-based login. The login and "who am I" endpoints answer with bare
// JSON (`{ token, user }` / `{ user }`) rather than the standard envelope.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// Account role as reported by the API.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Customer,
    #[serde(other)]
    Other,
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    #[serde(default)]
    pub google_id: Option<String>,
}

/// `POST /auth/login` response.
#[derive(Debug)]
pub struct LoginResponse {
    pub token: SecretString,
    pub user: AuthUser,
}

#[derive(Deserialize)]
struct RawLoginResponse {
    token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
struct MeResponse {
    user: AuthUser,
}

impl ApiClient {
    /// Exchange email + password for a bearer token.
    ///
    /// A rejected login is reported as [`Error::Authentication`] whatever
    /// HTTP status the server picked for it.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        debug!(email, "logging in");
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let raw: RawLoginResponse = self
            .post_bare("auth/login", &body, None)
            .await
            .map_err(|err| match err {
                Error::Rejected { status, message } => Error::Authentication {
                    message: message.unwrap_or_else(|| format!("login failed (HTTP {status})")),
                },
                other => other,
            })?;

        Ok(LoginResponse {
            token: SecretString::from(raw.token),
            user: raw.user,
        })
    }

    /// Resolve the user behind a token.
    pub async fn me(&self, token: &SecretString) -> Result<AuthUser, Error> {
        let resp: MeResponse = self.get_bare("auth/me", Some(token)).await?;
        Ok(resp.user)
    }

    /// Revoke the token server-side.
    pub async fn logout(&self, token: &SecretString) -> Result<(), Error> {
        self.post_unit("auth/logout", &json!({}), Some(token)).await
    }
}
