// ── Resort facade ──
//
// One place that builds the API client and the session and hands both to
// every store. Consumers hold a `Resort` and reach the stores through it.

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::payment::{CheckoutPresenter, PaymentOrchestrator, SnapScript, WidgetLoader, WidgetSource};
use crate::session::{Session, TokenStore};
use crate::store::{
    AuthStore, BookingStore, CartStore, FacilityStore, OrderStore, ProductStore, ProfileStore,
    RoomStore,
};
use resortly_api::ApiClient;

/// Every store of one customer session.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct Resort {
    inner: Arc<ResortInner>,
}

struct ResortInner {
    config: ClientConfig,
    session: Arc<Session>,
    auth: AuthStore,
    bookings: BookingStore,
    cart: CartStore,
    orders: OrderStore,
    rooms: RoomStore,
    facilities: FacilityStore,
    products: ProductStore,
    profile: ProfileStore,
    payments: PaymentOrchestrator,
}

impl Resort {
    /// Build the client from `config`, restore any persisted token from
    /// `tokens`, and load the payment widget from `widget` when first needed.
    pub fn new(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
        widget: Arc<dyn WidgetSource>,
    ) -> Result<Self, resortly_api::Error> {
        let api = ApiClient::new(&config.api_url, &config.transport())?;
        Ok(Self::with_api(api, Arc::new(Session::new(tokens)), config, widget))
    }

    /// Like [`new`](Self::new), with the gateway's Snap script as the widget.
    pub fn with_snap(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
        presenter: Arc<dyn CheckoutPresenter>,
    ) -> Result<Self, resortly_api::Error> {
        let http = config.transport().build_client()?;
        let source = SnapScript::new(http, config.gateway.clone(), presenter);
        Self::new(config, tokens, Arc::new(source))
    }

    /// Assemble the stores around an existing client and session.
    pub fn with_api(
        api: ApiClient,
        session: Arc<Session>,
        config: ClientConfig,
        widget: Arc<dyn WidgetSource>,
    ) -> Self {
        debug!(api = %api.base_url(), "assembling stores");
        let policy = config.cancel_refresh;
        let loader = Arc::new(WidgetLoader::new(widget));
        let s = || Arc::clone(&session);

        let inner = ResortInner {
            auth: AuthStore::new(api.clone(), s()),
            bookings: BookingStore::new(api.clone(), s(), policy),
            cart: CartStore::new(api.clone(), s()),
            orders: OrderStore::new(api.clone(), s(), policy),
            rooms: RoomStore::new(api.clone(), s()),
            facilities: FacilityStore::new(api.clone(), s()),
            products: ProductStore::new(api.clone(), s()),
            profile: ProfileStore::new(api.clone(), s()),
            payments: PaymentOrchestrator::new(api, s(), loader, config.gateway.environment),
            session: s(),
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.inner.bookings
    }

    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    pub fn rooms(&self) -> &RoomStore {
        &self.inner.rooms
    }

    pub fn facilities(&self) -> &FacilityStore {
        &self.inner.facilities
    }

    pub fn products(&self) -> &ProductStore {
        &self.inner.products
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.inner.profile
    }

    pub fn payments(&self) -> &PaymentOrchestrator {
        &self.inner.payments
    }

    /// Log out and drop the cached profile.
    pub async fn logout(&self) {
        self.inner.auth.logout().await;
        self.inner.profile.reset();
    }
}
