// Response envelope
//
// Every endpoint answers `{ status, data?, message?, errors? }` where
// `status` is either a boolean or the strings "success" / "error".

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Error;

/// The `status` discriminator. Older endpoints send a boolean, newer ones
/// send `"success"` / `"error"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiStatus {
    Flag(bool),
    Word(String),
}

impl ApiStatus {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Flag(ok) => *ok,
            Self::Word(word) => word.eq_ignore_ascii_case("success"),
        }
    }
}

/// Raw response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Missing on a handful of list endpoints; absence counts as success.
    #[serde(default)]
    pub status: Option<ApiStatus>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    /// Laravel-style validation errors: field -> messages.
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status.as_ref().is_none_or(ApiStatus::is_success)
    }

    /// The most useful human-readable message: the explicit `message`,
    /// falling back to the first validation error.
    pub fn best_message(&self) -> Option<String> {
        self.message.clone().or_else(|| {
            self.errors
                .as_ref()
                .and_then(|errs| errs.values().flatten().next().cloned())
        })
    }

    /// Check the status flag, discarding any payload.
    pub fn ensure_success(self, http_status: u16) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Rejected {
                status: http_status,
                message: self.best_message(),
            })
        }
    }

    /// Check the status flag and unwrap `data`.
    pub fn into_data(self, http_status: u16) -> Result<T, Error> {
        self.ensure_success(http_status)?
            .data
            .ok_or(Error::MissingData)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn boolean_and_word_status_both_parse() {
        let flag: Envelope<u32> = serde_json::from_value(json!({"status": true, "data": 1})).unwrap();
        let word: Envelope<u32> =
            serde_json::from_value(json!({"status": "success", "data": 2})).unwrap();
        assert_eq!(flag.into_data(200).unwrap(), 1);
        assert_eq!(word.into_data(200).unwrap(), 2);
    }

    #[test]
    fn missing_status_counts_as_success() {
        let env: Envelope<Vec<u32>> = serde_json::from_value(json!({"data": [1, 2]})).unwrap();
        assert_eq!(env.into_data(200).unwrap(), vec![1, 2]);
    }

    #[test]
    fn failure_carries_server_message() {
        let env: Envelope<u32> = serde_json::from_value(
            json!({"status": "error", "message": "Kamar sudah dipesan"}),
        )
        .unwrap();
        match env.into_data(200) {
            Err(Error::Rejected { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message.as_deref(), Some("Kamar sudah dipesan"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn validation_errors_fill_in_missing_message() {
        let env: Envelope<u32> = serde_json::from_value(json!({
            "status": false,
            "errors": { "tanggal_check_in": ["Tanggal check-in wajib diisi"] }
        }))
        .unwrap();
        assert_eq!(
            env.best_message().as_deref(),
            Some("Tanggal check-in wajib diisi")
        );
    }

    #[test]
    fn success_without_data_is_missing_data() {
        let env: Envelope<u32> = serde_json::from_value(json!({"status": "success"})).unwrap();
        assert!(matches!(env.into_data(200), Err(Error::MissingData)));
    }
}
