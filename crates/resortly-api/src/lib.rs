//! Async client for the resort customer REST API.
//!
//! - **[`ApiClient`]**: base-URL handling, bearer tokens, envelope
//!   unwrapping and retry of idempotent reads. Generic verbs
//!   ([`get`](ApiClient::get), [`post`](ApiClient::post), ...) serve the
//!   plain resource endpoints; endpoints with irregular shapes get their own
//!   inherent methods (login, payment tokens, eligibility, photo upload).
//! - **[`Envelope`]**: the `{ status, data, message, errors }` wrapper.
//! - **[`TransportConfig`]** / **[`RetryPolicy`]**: explicit timeout and
//!   backoff instead of the HTTP stack's defaults.

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod orders;
pub mod payments;
pub mod profile;
pub mod transport;

pub use auth::{AuthUser, LoginResponse, Role};
pub use client::ApiClient;
pub use envelope::{ApiStatus, Envelope};
pub use error::Error;
pub use orders::Eligibility;
pub use payments::{
    GATEWAY_METHOD, GatewayTransaction, PaymentKind, PaymentRecord, PaymentStatusReport,
    SettlementStatus, SnapToken,
};
pub use transport::{RetryPolicy, TransportConfig};
