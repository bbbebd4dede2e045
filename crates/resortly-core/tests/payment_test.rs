#![allow(clippy::unwrap_used)]
// Payment orchestration against a mock API and scripted widgets.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{ScriptedWidget, ok, setup, setup_with, sign_in};
use resortly_core::{
    CancelRefresh, LoadState, NoHooks, NoticeLevel, PaymentError, PaymentHooks, PaymentKind,
    PaymentRequest, WidgetOutcome,
};

#[derive(Default)]
struct CountingHooks {
    success: AtomicUsize,
    pending: AtomicUsize,
    error: AtomicUsize,
    close: AtomicUsize,
}

impl CountingHooks {
    fn total(&self) -> usize {
        [&self.success, &self.pending, &self.error, &self.close]
            .iter()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

impl PaymentHooks for CountingHooks {
    fn on_success<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        self.success.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }

    fn on_pending<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }

    fn on_error<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        self.error.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }

    fn on_close<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        self.close.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }
}

async fn mount_token(server: &wiremock::MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(json!({ "snap_token": token }))),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn happy_path_calls_success_hook_once() {
    let (server, resort) = setup().await;
    sign_in(&resort);
    mount_token(&server, "snap-1").await;

    let payments = resort.payments();
    let mut notices = payments.subscribe_notices();
    let hooks = CountingHooks::default();

    let outcome = payments
        .pay(&PaymentRequest::new(PaymentKind::Kamar, "b-1"), &hooks)
        .await
        .unwrap();

    assert_eq!(outcome, WidgetOutcome::Success);
    assert_eq!(hooks.success.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.total(), 1);
    assert_eq!(payments.status().error(), None);
    assert!(!payments.is_busy());
    assert_eq!(payments.loader().state(), LoadState::Ready);

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Pembayaran berhasil");
}

#[tokio::test]
async fn closing_the_widget_is_not_an_error() {
    let (server, resort) =
        setup_with(CancelRefresh::default(), ScriptedWidget::new(WidgetOutcome::Closed)).await;
    sign_in(&resort);
    mount_token(&server, "snap-2").await;

    let payments = resort.payments();
    let mut notices = payments.subscribe_notices();
    let hooks = CountingHooks::default();

    let outcome = payments
        .pay(&PaymentRequest::new(PaymentKind::Pesanan, "o-1"), &hooks)
        .await
        .unwrap();

    assert_eq!(outcome, WidgetOutcome::Closed);
    assert_eq!(hooks.close.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.error.load(Ordering::SeqCst), 0);
    assert_eq!(
        notices.recv().await.unwrap().message,
        "Anda menutup popup pembayaran sebelum menyelesaikan transaksi"
    );
}

#[tokio::test]
async fn second_click_while_busy_opens_nothing() {
    let widget = ScriptedWidget::slow(WidgetOutcome::Pending, Duration::from_millis(100));
    let (server, resort) = setup_with(CancelRefresh::default(), widget.clone()).await;
    sign_in(&resort);

    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({ "snap_token": "snap-3" })))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let payments = resort.payments();
    let request = PaymentRequest::new(PaymentKind::Fasilitas, "f-1");
    let (first, second) = tokio::join!(
        payments.pay(&request, &NoHooks),
        payments.pay(&request, &NoHooks),
    );

    assert_eq!(first.unwrap(), WidgetOutcome::Pending);
    assert_eq!(second.unwrap_err(), PaymentError::AlreadyInProgress);
    assert_eq!(widget.opened(), 1);
    assert!(!payments.is_busy());
}

#[tokio::test]
async fn missing_token_never_opens_widget() {
    let widget = ScriptedWidget::new(WidgetOutcome::Success);
    let (server, resort) = setup_with(CancelRefresh::default(), widget.clone()).await;
    sign_in(&resort);

    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({}))))
        .mount(&server)
        .await;

    let payments = resort.payments();
    let mut notices = payments.subscribe_notices();
    let err = payments
        .pay(&PaymentRequest::new(PaymentKind::Kamar, "b-1"), &NoHooks)
        .await
        .unwrap_err();

    assert_eq!(err, PaymentError::TokenUnavailable);
    assert_eq!(widget.opened(), 0);
    assert_eq!(
        payments.status().error().as_deref(),
        Some("Gagal mendapatkan token pembayaran")
    );
    assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn resume_uses_existing_token() {
    let (server, resort) = setup().await;
    sign_in(&resort);

    Mock::given(method("GET"))
        .and(path("/api/payments/existing"))
        .and(query_param("jenis_pembayaran", "kamar"))
        .and(query_param("pembayaran_id", "b-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok(json!({ "snap_token": "snap-old" }))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = resort
        .payments()
        .pay(&PaymentRequest::resume(PaymentKind::Kamar, "b-1"), &NoHooks)
        .await
        .unwrap();
    assert_eq!(outcome, WidgetOutcome::Success);
}

#[tokio::test]
async fn unauthenticated_payment_sends_nothing() {
    let widget = ScriptedWidget::new(WidgetOutcome::Success);
    let (server, resort) = setup_with(CancelRefresh::default(), widget.clone()).await;

    Mock::given(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = resort
        .payments()
        .pay(&PaymentRequest::new(PaymentKind::Kamar, "b-1"), &NoHooks)
        .await
        .unwrap_err();
    assert_eq!(err, PaymentError::AuthRequired);
    assert_eq!(widget.loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn widget_load_failure_is_reported_and_retried() {
    let widget = ScriptedWidget::broken();
    let (server, resort) = setup_with(CancelRefresh::default(), widget.clone()).await;
    sign_in(&resort);

    Mock::given(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let payments = resort.payments();
    let request = PaymentRequest::new(PaymentKind::Kamar, "b-1");
    for _ in 0..2 {
        let err = payments.pay(&request, &NoHooks).await.unwrap_err();
        assert!(matches!(err, PaymentError::WidgetUnavailable { .. }));
    }

    assert_eq!(widget.loads.load(Ordering::SeqCst), 2);
    assert!(matches!(payments.loader().state(), LoadState::Failed(_)));
    assert!(
        payments
            .status()
            .error()
            .unwrap()
            .starts_with("Midtrans tidak tersedia")
    );
}

#[tokio::test]
async fn concurrent_payments_load_widget_once() {
    let widget = ScriptedWidget::new(WidgetOutcome::Success);
    let (server, resort) = setup_with(CancelRefresh::default(), widget.clone()).await;
    sign_in(&resort);
    mount_token(&server, "snap-4").await;

    let payments = resort.payments();
    let (a, b) = tokio::join!(payments.loader().ready(), payments.loader().ready());
    assert!(a.is_ok() && b.is_ok());

    payments
        .pay(&PaymentRequest::new(PaymentKind::Kamar, "b-1"), &NoHooks)
        .await
        .unwrap();
    assert_eq!(widget.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn payment_status_lookup() {
    let (server, resort) = setup().await;
    sign_in(&resort);

    Mock::given(method("GET"))
        .and(path("/api/payments/p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "payment": {
                "id": "p-1",
                "jenis_pembayaran": "pesanan",
                "jumlah": 150_000,
                "metode_pembayaran": "midtrans",
                "status": "menunggu"
            }
        }))))
        .mount(&server)
        .await;

    let report = resort.payments().payment_status("p-1").await.unwrap();
    assert_eq!(report.payment.jenis_pembayaran, PaymentKind::Pesanan);
    assert!(report.transaction.is_none());
}
