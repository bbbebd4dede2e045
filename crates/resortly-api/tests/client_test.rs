#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use resortly_api::{ApiClient, Error, PaymentKind, RetryPolicy, Role, SettlementStatus};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), &base_url);
    (server, client)
}

fn token() -> SecretString {
    SecretString::from("tok-123".to_owned())
}

#[derive(Debug, Deserialize, PartialEq)]
struct Room {
    id: String,
    no_kamar: String,
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_get_unwraps_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{ "id": "r-1", "no_kamar": "101" }]
        })))
        .mount(&server)
        .await;

    let rooms: Vec<Room> = client.get("rooms", None).await.unwrap();
    assert_eq!(
        rooms,
        vec![Room {
            id: "r-1".into(),
            no_kamar: "101".into()
        }]
    );
}

#[tokio::test]
async fn test_failed_envelope_is_rejected_with_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/room-bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "Kamar tidak tersedia pada tanggal tersebut"
        })))
        .mount(&server)
        .await;

    let result: Result<serde_json::Value, _> = client
        .post("room-bookings", &json!({"kamar_id": "r-1"}), Some(&token()))
        .await;

    match result {
        Err(err @ Error::Rejected { .. }) => {
            assert_eq!(
                err.server_message(),
                Some("Kamar tidak tersedia pada tanggal tersebut")
            );
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_surfaces_payload_message() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/room-bookings/b-1/cancel"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "error",
            "message": "Pemesanan yang sudah dibayar tidak dapat dibatalkan"
        })))
        .mount(&server)
        .await;

    let result = client
        .put_unit("room-bookings/b-1/cancel", &json!({}), Some(&token()))
        .await;

    match result {
        Err(Error::Rejected { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(
                message.as_deref(),
                Some("Pemesanan yang sudah dibayar tidak dapat dibatalkan")
            );
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/keranjang"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthenticated."
        })))
        .mount(&server)
        .await;

    let result: Result<serde_json::Value, _> = client.get("keranjang", Some(&token())).await;
    let err = result.unwrap_err();
    assert!(err.is_auth_expired(), "expected auth error, got: {err:?}");
}

#[tokio::test]
async fn test_bearer_header_is_attached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orders: Vec<serde_json::Value> = client.get("orders", Some(&token())).await.unwrap();
    assert!(orders.is_empty());
}

// ── Retry ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_retries_gateway_errors() {
    let (server, client) = setup().await;
    let client = client.with_retry(RetryPolicy {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    });

    Mock::given(method("GET"))
        .and(path("/api/facilities"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/facilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [1, 2, 3]
        })))
        .mount(&server)
        .await;

    let ids: Vec<u32> = client.get("facilities", None).await.unwrap();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_post_is_never_retried() {
    let (server, client) = setup().await;
    let client = client.with_retry(RetryPolicy {
        max_retries: 3,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    });

    Mock::given(method("POST"))
        .and(path("/api/orders/o-1/cancel"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .post_unit("orders/o-1/cancel", &json!({}), Some(&token()))
        .await;
    assert!(matches!(result, Err(Error::Rejected { status: 503, .. })));
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "tamu@example.com", "password": "rahasia"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "plain-token",
            "user": {
                "id": "u-1",
                "name": "Tamu",
                "email": "tamu@example.com",
                "role": "customer"
            }
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("rahasia".to_owned());
    let login = client.login("tamu@example.com", &password).await.unwrap();
    assert_eq!(secrecy::ExposeSecret::expose_secret(&login.token), "plain-token");
    assert_eq!(login.user.role, Role::Customer);
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Email atau password salah"
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("salah".to_owned());
    let result = client.login("tamu@example.com", &password).await;
    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Email atau password salah");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_me_reads_bare_user() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": "u-1", "name": "Tamu", "email": "t@example.com" }
        })))
        .mount(&server)
        .await;

    let user = client.me(&token()).await.unwrap();
    assert_eq!(user.id, "u-1");
}

// ── Payments ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_payment_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .and(body_json(json!({
            "jenis_pembayaran": "kamar",
            "pembayaran_id": "b-9",
            "metode_pembayaran": "midtrans"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": { "snap_token": "snap-abc" }
        })))
        .mount(&server)
        .await;

    let snap = client
        .create_payment_token(PaymentKind::Kamar, "b-9", &token())
        .await
        .unwrap();
    assert_eq!(snap.unwrap().as_str(), "snap-abc");
}

#[tokio::test]
async fn test_existing_payment_token_without_token_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payments/existing"))
        .and(query_param("jenis_pembayaran", "pesanan"))
        .and(query_param("pembayaran_id", "o-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {}
        })))
        .mount(&server)
        .await;

    let snap = client
        .existing_payment_token(PaymentKind::Pesanan, "o-3", &token())
        .await
        .unwrap();
    assert!(snap.is_none());
}

#[tokio::test]
async fn test_payment_status_report() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payments/p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "payment": {
                    "id": "p-1",
                    "jenis_pembayaran": "fasilitas",
                    "jumlah": 150000,
                    "metode_pembayaran": "midtrans",
                    "status": "selesai"
                },
                "transaction": {
                    "order_id": "FAS-001",
                    "payment_type": "bank_transfer",
                    "transaction_status": "settlement",
                    "gross_amount": "150000.00",
                    "currency": "IDR"
                }
            }
        })))
        .mount(&server)
        .await;

    let report = client.payment_status("p-1", &token()).await.unwrap();
    assert_eq!(report.payment.status, SettlementStatus::Selesai);
    assert_eq!(report.transaction.unwrap().transaction_status, "settlement");
}

// ── Orders & profile ────────────────────────────────────────────────

#[tokio::test]
async fn test_eligibility_false_is_an_answer() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/eligibility"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "Anda harus memiliki pemesanan kamar yang aktif"
        })))
        .mount(&server)
        .await;

    let answer = client.order_eligibility(&token()).await.unwrap();
    assert!(!answer.eligible);
    assert_eq!(
        answer.message.as_deref(),
        Some("Anda harus memiliki pemesanan kamar yang aktif")
    );
}

#[tokio::test]
async fn test_upload_profile_photo() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("me.png");
    std::fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/profile/photo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": { "foto_pelanggan": "pelanggan/me.png" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = client.upload_profile_photo(&photo, &token()).await.unwrap();
    assert_eq!(stored, "pelanggan/me.png");
}
