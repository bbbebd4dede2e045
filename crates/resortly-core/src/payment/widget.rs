// ── Payment widget seam ──
//
// The widget is an external component that is loaded once and then asked
// to collect a payment for a token. `WidgetLoader` makes the load
// single-flight: concurrent callers share one attempt, success is kept for
// the life of the loader, failure leaves it unloaded for the next caller.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use strum::Display;
use thiserror::Error;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use resortly_api::SnapToken;

/// How a widget session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum WidgetOutcome {
    /// The gateway settled the payment.
    Success,
    /// The customer chose a deferred method (transfer, counter payment).
    Pending,
    /// The gateway reported a failure.
    Error,
    /// The customer dismissed the widget without finishing.
    Closed,
}

/// A loaded payment widget.
pub trait PaymentWidget: Send + Sync {
    /// Open the widget for `token` and resolve when it reports back.
    fn pay<'a>(&'a self, token: &'a SnapToken) -> BoxFuture<'a, WidgetOutcome>;
}

/// Something that can produce a ready widget.
pub trait WidgetSource: Send + Sync {
    fn load(&self) -> BoxFuture<'_, Result<Arc<dyn PaymentWidget>, WidgetLoadError>>;
}

/// Why the widget could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetLoadError {
    #[error("client key belum dikonfigurasi")]
    MissingClientKey,

    #[error("script gagal dimuat: {0}")]
    Script(String),

    #[error("widget tidak tersedia setelah script dimuat")]
    Absent,
}

/// Observable load progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Ready,
    Failed(String),
}

/// Lazily loads a widget exactly once.
pub struct WidgetLoader {
    source: Arc<dyn WidgetSource>,
    widget: OnceCell<Arc<dyn PaymentWidget>>,
    state: watch::Sender<LoadState>,
}

impl WidgetLoader {
    pub fn new(source: Arc<dyn WidgetSource>) -> Self {
        let (state, _) = watch::channel(LoadState::Unloaded);
        Self {
            source,
            widget: OnceCell::new(),
            state,
        }
    }

    /// The loaded widget, loading it first if needed.
    ///
    /// Callers arriving during a load wait for it. After a failed load the
    /// next waiting caller makes a fresh attempt.
    pub async fn ready(&self) -> Result<Arc<dyn PaymentWidget>, WidgetLoadError> {
        let widget = self
            .widget
            .get_or_try_init(|| async {
                self.state.send_replace(LoadState::Loading);
                debug!("loading payment widget");
                match self.source.load().await {
                    Ok(widget) => {
                        info!("payment widget ready");
                        self.state.send_replace(LoadState::Ready);
                        Ok(widget)
                    }
                    Err(e) => {
                        warn!(error = %e, "payment widget failed to load");
                        self.state.send_replace(LoadState::Failed(e.to_string()));
                        Err(e)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(widget))
    }

    /// Load ahead of the first payment. A failure stays visible through
    /// [`state`](Self::state).
    pub async fn preload(&self) {
        let _ = self.ready().await;
    }

    pub fn is_ready(&self) -> bool {
        self.widget.initialized()
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }
}
