// ── Snap widget source ──
//
// Fetches the gateway's Snap script for the configured environment and
// hands checkouts to a `CheckoutPresenter`, which is whatever the host
// application uses to show the payment page (a browser, a webview, a
// prompt in a terminal).

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::debug;
use url::Url;

use super::widget::{PaymentWidget, WidgetLoadError, WidgetOutcome, WidgetSource};
use crate::config::{GatewayConfig, GatewayEnvironment};
use resortly_api::SnapToken;

/// One checkout handed to the presenter.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub token: SnapToken,
    /// Hosted payment page for the token.
    pub redirect_url: String,
    pub client_key: String,
}

/// Shows a checkout to the customer and reports how it ended.
pub trait CheckoutPresenter: Send + Sync {
    fn present<'a>(&'a self, checkout: &'a Checkout) -> BoxFuture<'a, WidgetOutcome>;
}

/// Loads the Snap script and produces a [`SnapWidget`].
pub struct SnapScript {
    http: reqwest::Client,
    gateway: GatewayConfig,
    script_url: Option<Url>,
    presenter: Arc<dyn CheckoutPresenter>,
}

impl SnapScript {
    pub fn new(
        http: reqwest::Client,
        gateway: GatewayConfig,
        presenter: Arc<dyn CheckoutPresenter>,
    ) -> Self {
        Self {
            http,
            gateway,
            script_url: None,
            presenter,
        }
    }

    /// Load the script from `url` instead of the environment's default.
    #[must_use]
    pub fn with_script_url(mut self, url: Url) -> Self {
        self.script_url = Some(url);
        self
    }

    fn script_url(&self) -> String {
        self.script_url
            .as_ref()
            .map_or_else(|| self.gateway.environment.script_url(), Url::to_string)
    }

    async fn fetch(&self) -> Result<Arc<dyn PaymentWidget>, WidgetLoadError> {
        let client_key = self
            .gateway
            .client_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(WidgetLoadError::MissingClientKey)?;

        let url = self.script_url();
        debug!(%url, environment = %self.gateway.environment, "fetching snap script");
        let resp = self
            .http
            .get(&url)
            .header("data-client-key", &client_key)
            .send()
            .await
            .map_err(|e| WidgetLoadError::Script(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(WidgetLoadError::Script(format!("HTTP {}", resp.status())));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| WidgetLoadError::Script(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(WidgetLoadError::Absent);
        }

        Ok(Arc::new(SnapWidget {
            environment: self.gateway.environment,
            client_key,
            presenter: Arc::clone(&self.presenter),
        }))
    }
}

impl WidgetSource for SnapScript {
    fn load(&self) -> BoxFuture<'_, Result<Arc<dyn PaymentWidget>, WidgetLoadError>> {
        Box::pin(self.fetch())
    }
}

/// A loaded Snap widget.
pub struct SnapWidget {
    environment: GatewayEnvironment,
    client_key: String,
    presenter: Arc<dyn CheckoutPresenter>,
}

impl PaymentWidget for SnapWidget {
    fn pay<'a>(&'a self, token: &'a SnapToken) -> BoxFuture<'a, WidgetOutcome> {
        Box::pin(async move {
            let checkout = Checkout {
                token: token.clone(),
                redirect_url: self.environment.redirect_url(token.as_str()),
                client_key: self.client_key.clone(),
            };
            self.presenter.present(&checkout).await
        })
    }
}
