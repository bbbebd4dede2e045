// ── Payment orchestration ──
//
// Bridges a booking or order to the payment widget: claim the busy flag,
// make sure the widget is loaded, get a token, open the widget, and route
// the outcome to a notice plus the caller's hooks.

pub mod snap;
pub mod widget;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;
use strum::Display;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::GatewayEnvironment;
use crate::error::{PaymentError, StoreError};
use crate::model::EntityId;
use crate::session::Session;
use crate::store::StoreStatus;
use resortly_api::{ApiClient, PaymentKind, PaymentStatusReport, SnapToken};

pub use snap::{Checkout, CheckoutPresenter, SnapScript, SnapWidget};
pub use widget::{LoadState, PaymentWidget, WidgetLoadError, WidgetLoader, WidgetOutcome, WidgetSource};

const NOTICE_CAPACITY: usize = 16;

// ── Requests and notices ────────────────────────────────────────────

/// What to pay for, and whether to resume an already-issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub kind: PaymentKind,
    pub id: EntityId,
    /// Reuse the unconsumed token of a payment that was already started,
    /// instead of issuing a new one.
    pub use_existing: bool,
}

impl PaymentRequest {
    pub fn new(kind: PaymentKind, id: impl Into<EntityId>) -> Self {
        Self {
            kind,
            id: id.into(),
            use_existing: false,
        }
    }

    /// Continue a pending payment with its existing token.
    pub fn resume(kind: PaymentKind, id: impl Into<EntityId>) -> Self {
        Self {
            use_existing: true,
            ..Self::new(kind, id)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient message for the customer (a toast, a status line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    fn for_outcome(outcome: WidgetOutcome) -> Self {
        match outcome {
            WidgetOutcome::Success => Self::new(NoticeLevel::Success, "Pembayaran berhasil"),
            WidgetOutcome::Pending => Self::new(NoticeLevel::Info, "Pembayaran dalam proses"),
            WidgetOutcome::Error => Self::new(NoticeLevel::Error, "Pembayaran gagal"),
            WidgetOutcome::Closed => Self::new(
                NoticeLevel::Info,
                "Anda menutup popup pembayaran sebelum menyelesaikan transaksi",
            ),
        }
    }
}

/// Caller-supplied reactions to a widget outcome, typically a re-fetch of
/// the booking or order that was paid. Every method defaults to nothing.
pub trait PaymentHooks: Send + Sync {
    fn on_success<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_pending<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_error<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }

    fn on_close<'a>(&'a self, _request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }
}

/// Hooks that do nothing.
pub struct NoHooks;

impl PaymentHooks for NoHooks {}

// ── Orchestrator ────────────────────────────────────────────────────

/// Runs payment attempts against the widget, one at a time.
pub struct PaymentOrchestrator {
    api: ApiClient,
    session: Arc<Session>,
    loader: Arc<WidgetLoader>,
    environment: GatewayEnvironment,
    busy: AtomicBool,
    status: StoreStatus,
    notices: broadcast::Sender<Notice>,
}

impl PaymentOrchestrator {
    pub fn new(
        api: ApiClient,
        session: Arc<Session>,
        loader: Arc<WidgetLoader>,
        environment: GatewayEnvironment,
    ) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            api,
            session,
            loader,
            environment,
            busy: AtomicBool::new(false),
            status: StoreStatus::new(),
            notices,
        }
    }

    pub fn loader(&self) -> &WidgetLoader {
        &self.loader
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// True while a payment attempt is between its start and the widget's
    /// answer.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Hosted checkout page for a token, for consumers that cannot embed
    /// the widget.
    pub fn redirect_url(&self, token: &SnapToken) -> String {
        self.environment.redirect_url(token.as_str())
    }

    /// Pay for a booking or order through the widget.
    ///
    /// Returns how the widget session ended. `Closed` and `Error` are not
    /// failures of this call: the payment may be retried later.
    pub async fn pay(
        &self,
        request: &PaymentRequest,
        hooks: &dyn PaymentHooks,
    ) -> Result<WidgetOutcome, PaymentError> {
        let Some(token) = self.session.token() else {
            self.status.set_error(PaymentError::AuthRequired.to_string());
            return Err(PaymentError::AuthRequired);
        };
        let Some(_busy) = BusyGuard::claim(&self.busy) else {
            debug!(kind = %request.kind, id = %request.id, "payment already in progress");
            return Err(PaymentError::AlreadyInProgress);
        };
        let _loading = self.status.begin();

        let widget = match self.loader.ready().await {
            Ok(widget) => widget,
            Err(e) => {
                self.notify(NoticeLevel::Error, "Midtrans belum siap, silakan coba lagi");
                return Err(self.fail(e.into()));
            }
        };

        let id = request.id.to_string();
        let issued = if request.use_existing {
            self.api
                .existing_payment_token(request.kind, &id, &token)
                .await
        } else {
            self.api
                .create_payment_token(request.kind, &id, &token)
                .await
        };
        let snap = match issued {
            Ok(Some(snap)) => snap,
            Ok(None) => {
                self.notify(NoticeLevel::Error, "Gagal mendapatkan token pembayaran");
                return Err(self.fail(PaymentError::TokenUnavailable));
            }
            Err(e) => {
                let mapped =
                    StoreError::from_api(&e, "Terjadi kesalahan saat memproses pembayaran");
                if mapped.is_auth_required() {
                    self.session.expire(&token);
                    return Err(self.fail(PaymentError::AuthRequired));
                }
                warn!(error = %e, "payment token request failed");
                self.notify(NoticeLevel::Error, mapped.to_string());
                return Err(self.fail(PaymentError::TokenRequest {
                    message: mapped.to_string(),
                }));
            }
        };

        info!(kind = %request.kind, id = %request.id, ?snap, "opening payment widget");
        let outcome = widget.pay(&snap).await;
        info!(kind = %request.kind, id = %request.id, %outcome, "payment widget closed");

        let _ = self.notices.send(Notice::for_outcome(outcome));
        match outcome {
            WidgetOutcome::Success => hooks.on_success(request).await,
            WidgetOutcome::Pending => hooks.on_pending(request).await,
            WidgetOutcome::Error => hooks.on_error(request).await,
            WidgetOutcome::Closed => hooks.on_close(request).await,
        }
        Ok(outcome)
    }

    /// Settlement status of one payment, for a status page.
    pub async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatusReport, StoreError> {
        let _loading = self.status.begin();
        let token = self.session.require_token().map_err(|e| {
            self.status.set_error(e.to_string());
            e
        })?;
        self.api
            .payment_status(payment_id, &token)
            .await
            .map_err(|e| {
                let mapped = StoreError::from_api(&e, "Gagal mengambil status pembayaran");
                if mapped.is_auth_required() {
                    self.session.expire(&token);
                }
                self.status.set_error(mapped.to_string());
                mapped
            })
    }

    fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        // No subscribers is fine.
        let _ = self.notices.send(Notice::new(level, message));
    }

    fn fail(&self, err: PaymentError) -> PaymentError {
        self.status.set_error(err.to_string());
        err
    }
}

/// Holds the busy flag for one attempt and releases it on drop.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
