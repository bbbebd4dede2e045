// ── Profile store ──

use std::path::Path;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, warn};

use super::status::StoreStatus;
use crate::error::StoreError;
use crate::model::{Profile, UpdatePassword, UpdateProfile};
use crate::session::Session;
use resortly_api::ApiClient;

/// The signed-in customer's account and customer record.
pub struct ProfileStore {
    api: ApiClient,
    session: Arc<Session>,
    profile: Arc<watch::Sender<Option<Arc<Profile>>>>,
    status: StoreStatus,
}

impl ProfileStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        let (profile, _) = watch::channel(None);
        let profile = Arc::new(profile);
        let cached = Arc::downgrade(&profile);
        session.on_sign_out(move || {
            if let Some(cached) = cached.upgrade() {
                cached.send_replace(None);
            }
        });
        Self {
            api,
            session,
            profile,
            status: StoreStatus::new(),
        }
    }

    pub fn profile(&self) -> Option<Arc<Profile>> {
        self.profile.borrow().clone()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Profile>>> {
        self.profile.subscribe()
    }

    pub async fn fetch_profile(&self) -> Result<Arc<Profile>, StoreError> {
        let _loading = self.status.begin();
        let token = self.token()?;
        let profile: Profile = self
            .api
            .get("profile", Some(&*token))
            .await
            .map_err(|e| self.fail(&e, "Gagal memuat profil", &token))?;
        Ok(self.store(profile))
    }

    pub async fn update_profile(&self, data: &UpdateProfile) -> Result<Arc<Profile>, StoreError> {
        let _loading = self.status.begin();
        let token = self.token()?;
        let profile: Profile = self
            .api
            .put("profile", data, Some(&*token))
            .await
            .map_err(|e| self.fail(&e, "Gagal memperbarui profil", &token))?;
        info!("profile updated");
        Ok(self.store(profile))
    }

    /// Change the password. Mismatched or short passwords are refused
    /// locally.
    pub async fn update_password(&self, data: &UpdatePassword) -> Result<(), StoreError> {
        let _loading = self.status.begin();
        let token = self.token()?;
        data.validate().map_err(|e| self.record(e))?;
        self.api
            .put_unit("profile/password", data, Some(&*token))
            .await
            .map_err(|e| self.fail(&e, "Gagal memperbarui password", &token))?;
        info!("password changed");
        Ok(())
    }

    /// Upload a new photo and point the local customer record at it.
    /// Returns the stored photo path.
    pub async fn upload_photo(&self, path: &Path) -> Result<String, StoreError> {
        let _loading = self.status.begin();
        let token = self.token()?;
        let stored = self
            .api
            .upload_profile_photo(path, &token)
            .await
            .map_err(|e| self.fail(&e, "Gagal mengupload foto", &token))?;

        self.profile.send_if_modified(|current| {
            let Some(profile) = current else {
                return false;
            };
            let mut updated = (**profile).clone();
            let Some(customer) = updated.pelanggan.as_mut() else {
                return false;
            };
            customer.foto_pelanggan = Some(stored.clone());
            *current = Some(Arc::new(updated));
            true
        });
        Ok(stored)
    }

    /// Forget the cached profile, e.g. after logout.
    pub fn reset(&self) {
        self.profile.send_replace(None);
        self.status.clear_error();
    }

    fn store(&self, profile: Profile) -> Arc<Profile> {
        let profile = Arc::new(profile);
        self.profile.send_replace(Some(Arc::clone(&profile)));
        profile
    }

    fn token(&self) -> Result<Arc<SecretString>, StoreError> {
        self.session.require_token().map_err(|e| self.record(e))
    }

    fn fail(
        &self,
        err: &resortly_api::Error,
        fallback: &str,
        token: &Arc<SecretString>,
    ) -> StoreError {
        let mapped = StoreError::from_api(err, fallback);
        if mapped.is_auth_required() {
            self.session.expire(token);
        }
        warn!(error = %err, "profile request failed");
        self.record(mapped)
    }

    fn record(&self, err: StoreError) -> StoreError {
        self.status.set_error(err.to_string());
        err
    }
}
