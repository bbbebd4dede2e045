// Order endpoints that do not fit the plain resource verbs.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Error;

/// Answer of the checkout pre-check.
///
/// The server owns the rule (an order may only be placed during an active
/// stay); the client only relays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub eligible: bool,
    pub message: Option<String>,
}

impl ApiClient {
    /// `GET /orders/eligibility`. The envelope's `status` *is* the answer,
    /// so a `false` here is not an error.
    pub async fn order_eligibility(&self, token: &SecretString) -> Result<Eligibility, Error> {
        let envelope = self
            .get_envelope::<Value>("orders/eligibility", Some(token))
            .await?;
        Ok(Eligibility {
            eligible: envelope.is_success(),
            message: envelope.best_message(),
        })
    }
}
