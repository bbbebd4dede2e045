// Payment endpoints
//
// Token issuance for the hosted payment widget, lookup of an existing
// unconsumed token, and settlement status for a single payment.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// What is being paid for. Serialized as the API's `jenis_pembayaran`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentKind {
    /// Room booking.
    Kamar,
    /// Facility booking.
    Fasilitas,
    /// Shop order.
    Pesanan,
}

/// Settlement state of a single payment attempt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SettlementStatus {
    /// Pending.
    Menunggu,
    /// Settled.
    Selesai,
    /// Failed.
    Gagal,
    /// Refunded.
    Dikembalikan,
}

/// One-time token handed to the payment widget.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapToken(String);

impl SnapToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SnapToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are bearer-like: long enough to identify, short enough not to replay.
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SnapToken({prefix}…)")
    }
}

/// A payment attempt (`pembayaran`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub jenis_pembayaran: PaymentKind,
    #[serde(default)]
    pub payable_type: Option<String>,
    #[serde(default)]
    pub payable_id: Option<String>,
    pub jumlah: Decimal,
    pub metode_pembayaran: String,
    #[serde(default)]
    pub snap_token: Option<SnapToken>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub va_number: Option<String>,
    #[serde(default)]
    pub expiry_time: Option<String>,
    pub status: SettlementStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The gateway's view of the transaction behind a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayTransaction {
    pub order_id: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub payment_type: String,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    pub gross_amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub settlement_time: Option<String>,
}

/// `GET /payments/{id}` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusReport {
    pub payment: PaymentRecord,
    #[serde(default)]
    pub transaction: Option<GatewayTransaction>,
}

#[derive(Serialize)]
struct CreatePaymentBody<'a> {
    jenis_pembayaran: PaymentKind,
    pembayaran_id: &'a str,
    metode_pembayaran: &'a str,
}

#[derive(Serialize)]
struct ExistingPaymentQuery<'a> {
    jenis_pembayaran: PaymentKind,
    pembayaran_id: &'a str,
}

#[derive(Deserialize)]
struct TokenData {
    #[serde(default)]
    snap_token: Option<SnapToken>,
}

/// Gateway identifier sent as `metode_pembayaran` for widget payments.
pub const GATEWAY_METHOD: &str = "midtrans";

impl ApiClient {
    /// Issue a fresh widget token for a booking or order.
    ///
    /// `Ok(None)` means the server accepted the request but handed back no
    /// token; callers must not open the widget in that case.
    pub async fn create_payment_token(
        &self,
        kind: PaymentKind,
        id: &str,
        token: &SecretString,
    ) -> Result<Option<SnapToken>, Error> {
        debug!(%kind, id, "requesting new payment token");
        let body = CreatePaymentBody {
            jenis_pembayaran: kind,
            pembayaran_id: id,
            metode_pembayaran: GATEWAY_METHOD,
        };
        let data: TokenData = self.post("payments", &body, Some(token)).await?;
        Ok(data.snap_token.filter(|t| !t.as_str().is_empty()))
    }

    /// Fetch the still-unconsumed token of a payment that was already started.
    pub async fn existing_payment_token(
        &self,
        kind: PaymentKind,
        id: &str,
        token: &SecretString,
    ) -> Result<Option<SnapToken>, Error> {
        debug!(%kind, id, "looking up existing payment token");
        let query = ExistingPaymentQuery {
            jenis_pembayaran: kind,
            pembayaran_id: id,
        };
        let data: TokenData = self
            .get_query("payments/existing", &query, Some(token))
            .await?;
        Ok(data.snap_token.filter(|t| !t.as_str().is_empty()))
    }

    /// Settlement status of a single payment.
    pub async fn payment_status(
        &self,
        payment_id: &str,
        token: &SecretString,
    ) -> Result<PaymentStatusReport, Error> {
        self.get(&format!("payments/{payment_id}"), Some(token))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn payment_kind_uses_api_spelling() {
        assert_eq!(PaymentKind::Kamar.to_string(), "kamar");
        assert_eq!(PaymentKind::from_str("pesanan").unwrap(), PaymentKind::Pesanan);
        assert_eq!(
            serde_json::to_value(PaymentKind::Fasilitas).unwrap(),
            serde_json::json!("fasilitas")
        );
    }

    #[test]
    fn snap_token_debug_is_truncated() {
        let token = SnapToken::new("66e4fa55-fdac-4ef9-91b5-733b97d1b862");
        assert_eq!(format!("{token:?}"), "SnapToken(66e4fa…)");
    }

    #[test]
    fn payment_record_accepts_string_amounts() {
        let record: PaymentRecord = serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "jenis_pembayaran": "kamar",
            "jumlah": "750000.00",
            "metode_pembayaran": "midtrans",
            "status": "menunggu"
        }))
        .unwrap();
        assert_eq!(record.jumlah, Decimal::new(75_000_000, 2));
        assert_eq!(record.status, SettlementStatus::Menunggu);
    }
}
