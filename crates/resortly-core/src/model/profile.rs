// ── Profile domain types ──

use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::entity_id::EntityId;
use crate::error::StoreError;
use resortly_api::AuthUser;

/// Customer record attached to a user (`pelanggan`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    pub nm_pelanggan: String,
    #[serde(default)]
    pub no_hp: Option<String>,
    #[serde(default)]
    pub alamat: Option<String>,
    #[serde(default)]
    pub foto_pelanggan: Option<String>,
}

/// `GET /profile` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user: AuthUser,
    #[serde(default)]
    pub pelanggan: Option<Customer>,
}

/// Request body for `PUT /profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    pub email: String,
    pub nm_pelanggan: String,
    pub no_hp: String,
    pub alamat: String,
}

/// Request body for `PUT /profile/password`.
#[derive(Debug)]
pub struct UpdatePassword {
    pub current_password: SecretString,
    pub password: SecretString,
    pub password_confirmation: SecretString,
}

const MIN_PASSWORD_LEN: usize = 8;

impl UpdatePassword {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.password.expose_secret() != self.password_confirmation.expose_secret() {
            return Err(StoreError::Invalid {
                message: "Konfirmasi password tidak cocok".into(),
            });
        }
        if self.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::Invalid {
                message: format!("Password minimal {MIN_PASSWORD_LEN} karakter"),
            });
        }
        Ok(())
    }
}

impl Serialize for UpdatePassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("UpdatePassword", 3)?;
        s.serialize_field("current_password", self.current_password.expose_secret())?;
        s.serialize_field("password", self.password.expose_secret())?;
        s.serialize_field("password_confirmation", self.password_confirmation.expose_secret())?;
        s.end()
    }
}
