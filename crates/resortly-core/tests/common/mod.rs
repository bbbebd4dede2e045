// Shared fixtures for the store and payment suites.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

use resortly_api::{ApiClient, RetryPolicy};
use resortly_core::{
    CancelRefresh, ClientConfig, PaymentWidget, Resort, Session, SnapToken, WidgetLoadError,
    WidgetOutcome, WidgetSource,
};

pub async fn setup() -> (MockServer, Resort) {
    setup_with(CancelRefresh::default(), ScriptedWidget::new(WidgetOutcome::Success)).await
}

pub async fn setup_with(policy: CancelRefresh, widget: Arc<ScriptedWidget>) -> (MockServer, Resort) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let api = ApiClient::with_client(reqwest::Client::new(), &url).with_retry(RetryPolicy::none());
    let mut config = ClientConfig::new(url);
    config.cancel_refresh = policy;
    let resort = Resort::with_api(
        api,
        Arc::new(Session::in_memory()),
        config,
        Arc::new(ScriptedSource(widget)),
    );
    (server, resort)
}

pub fn sign_in(resort: &Resort) {
    resort
        .session()
        .set_token(SecretString::from("tok-123".to_owned()));
}

pub fn ok(data: Value) -> Value {
    json!({ "status": true, "data": data })
}

pub fn done() -> Value {
    json!({ "status": "success", "message": "OK" })
}

pub fn room_booking(id: &str, status: &str, paid: &str) -> Value {
    json!({
        "id": id,
        "kamar_id": "r-1",
        "tanggal_check_in": "2025-07-01",
        "tanggal_check_out": "2025-07-03",
        "total_harga": 900_000,
        "kode_pemesanan": format!("PK-{id}"),
        "status": status,
        "status_pembayaran": paid
    })
}

pub fn order(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "kode_pesanan": format!("PS-{id}"),
        "total_jumlah": 150_000,
        "status": status,
        "status_pembayaran": "belum_dibayar"
    })
}

pub fn cart_line(id: &str, product: &str, qty: u32, price: u32) -> Value {
    json!({
        "id": id,
        "produk_id": product,
        "jumlah": qty,
        "produk": { "id": product, "nm_produk": format!("Produk {product}"), "harga": price }
    })
}

// ── Widget doubles ──────────────────────────────────────────────────

/// Widget that answers with a fixed outcome after an optional delay and
/// counts how often it was opened.
pub struct ScriptedWidget {
    pub outcome: WidgetOutcome,
    pub delay: Duration,
    pub opened: AtomicUsize,
    pub loads: AtomicUsize,
    pub fail_load: bool,
}

impl ScriptedWidget {
    pub fn new(outcome: WidgetOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            delay: Duration::ZERO,
            opened: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
            fail_load: false,
        })
    }

    pub fn slow(outcome: WidgetOutcome, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Arc::into_inner(Self::new(outcome)).unwrap()
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            fail_load: true,
            ..Arc::into_inner(Self::new(WidgetOutcome::Success)).unwrap()
        })
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl PaymentWidget for ScriptedWidget {
    fn pay<'a>(&'a self, _token: &'a SnapToken) -> BoxFuture<'a, WidgetOutcome> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.outcome
        })
    }
}

pub struct ScriptedSource(pub Arc<ScriptedWidget>);

impl WidgetSource for ScriptedSource {
    fn load(&self) -> BoxFuture<'_, Result<Arc<dyn PaymentWidget>, WidgetLoadError>> {
        Box::pin(async move {
            self.0.loads.fetch_add(1, Ordering::SeqCst);
            if self.0.fail_load {
                return Err(WidgetLoadError::Script("HTTP 503".into()));
            }
            let widget: Arc<dyn PaymentWidget> = self.0.clone();
            Ok(widget)
        })
    }
}
