// ── Auth store ──
//
// Login, logout and "who am I". The token itself lives in the shared
// `Session`; this store only drives the endpoints that change it.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::status::StoreStatus;
use crate::error::StoreError;
use crate::session::Session;
use resortly_api::{ApiClient, AuthUser};

pub struct AuthStore {
    api: ApiClient,
    session: Arc<Session>,
    status: StoreStatus,
}

impl AuthStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            status: StoreStatus::new(),
        }
    }

    pub fn user(&self) -> Option<Arc<AuthUser>> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<Arc<AuthUser>>> {
        self.session.subscribe_user()
    }

    /// Exchange credentials for a token and start a session.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Arc<AuthUser>, StoreError> {
        let _loading = self.status.begin();
        match self.api.login(email, password).await {
            Ok(login) => {
                self.session.sign_in(login.token, login.user);
                self.session.user().ok_or(StoreError::AuthRequired)
            }
            Err(e) => {
                // A refused login is the server's verdict on the credentials,
                // not a missing session.
                let err = match e {
                    resortly_api::Error::Authentication { message } => {
                        StoreError::ServerRejected { message }
                    }
                    other => StoreError::from_api(&other, "Gagal login"),
                };
                warn!(email, error = %err, "login failed");
                self.status.set_error(err.to_string());
                Err(err)
            }
        }
    }

    /// End the session locally at once, then tell the server. A failed
    /// server call is logged only.
    pub async fn logout(&self) {
        let Some(token) = self.session.sign_out() else {
            debug!("logout without a session");
            return;
        };
        info!("signed out");
        if let Err(e) = self.api.logout(&token).await {
            warn!(error = %e, "server-side logout failed");
        }
    }

    /// Confirm the stored token with `/auth/me`. Any failure ends the
    /// session that was checked; the answer is whether that token holds.
    pub async fn check_auth(&self) -> bool {
        let Some(token) = self.session.token() else {
            return false;
        };
        let _loading = self.status.begin();
        match self.api.me(&token).await {
            Ok(user) => {
                debug!(user = %user.email, "session confirmed");
                self.session.set_user(Some(user));
                true
            }
            Err(e) => {
                // Only the token that was checked is ended; a login that
                // landed meanwhile stays.
                warn!(error = %e, "session check failed, signing out");
                self.session.expire(&token);
                false
            }
        }
    }
}
