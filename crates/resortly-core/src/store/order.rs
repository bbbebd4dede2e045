// ── Order store ──

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::cart::CartStore;
use super::resource::{CancelVerb, Cancellable, Resource, ResourceStore};
use super::status::StoreStatus;
use crate::config::CancelRefresh;
use crate::error::StoreError;
use crate::model::{Eligibility, EntityId, NewOrder, Order, OrderStatus};
use crate::session::Session;
use crate::stream::{EntityStream, SlotStream};
use resortly_api::ApiClient;

impl Resource for Order {
    const PATH: &'static str = "orders";
    const LABEL: &'static str = "pesanan";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Cancellable for Order {
    const CANCEL_VERB: CancelVerb = CancelVerb::Post;

    fn mark_cancelled(&mut self) {
        self.status = OrderStatus::Dibatalkan;
    }
}

/// Shop orders of the signed-in customer.
pub struct OrderStore {
    orders: ResourceStore<Order>,
    cancel_refresh: CancelRefresh,
}

impl OrderStore {
    pub fn new(api: ApiClient, session: Arc<Session>, cancel_refresh: CancelRefresh) -> Self {
        Self {
            orders: ResourceStore::new(api, session),
            cancel_refresh,
        }
    }

    pub fn orders(&self) -> Arc<Vec<Arc<Order>>> {
        self.orders.items()
    }

    pub fn current_order(&self) -> Option<Arc<Order>> {
        self.orders.selected()
    }

    pub fn status(&self) -> &StoreStatus {
        self.orders.status()
    }

    pub fn subscribe(&self) -> EntityStream<Order> {
        self.orders.subscribe()
    }

    pub fn subscribe_current(&self) -> SlotStream<Order> {
        self.orders.subscribe_selected()
    }

    pub async fn fetch_orders(&self) -> Result<Arc<Vec<Arc<Order>>>, StoreError> {
        self.orders.fetch_all().await
    }

    pub async fn fetch_order(&self, id: &EntityId) -> Result<Arc<Order>, StoreError> {
        self.orders.fetch_one(id).await
    }

    pub async fn cancel_order(&self, id: &EntityId) -> Result<(), StoreError> {
        self.orders.cancel(id, self.cancel_refresh).await
    }

    /// Ask the server whether the customer may place an order right now.
    ///
    /// A "no" from the server is an answer, not an error. Without a session
    /// the answer is "no" and nothing is sent.
    pub async fn check_eligibility(&self) -> Eligibility {
        let Some(token) = self.orders.session().token() else {
            return Eligibility {
                eligible: false,
                message: Some(StoreError::AuthRequired.to_string()),
            };
        };

        let _loading = self.orders.status().begin();
        match self.orders.api().order_eligibility(&token).await {
            Ok(answer) => {
                debug!(eligible = answer.eligible, "eligibility checked");
                answer
            }
            Err(e) => {
                let err =
                    self.orders
                        .fail_api(&e, "Gagal memeriksa eligibilitas pemesanan", Some(&token));
                Eligibility {
                    eligible: false,
                    message: Some(err.to_string()),
                }
            }
        }
    }

    /// Place an online order for everything in `cart`, then empty it.
    ///
    /// The new order is put at the front of the list. A failure to clear
    /// the cart afterwards is reported through the cart's own status.
    pub async fn checkout(&self, cart: &CartStore) -> Result<Arc<Order>, StoreError> {
        let body = NewOrder::from_cart(&cart.cart()).map_err(|e| self.orders.record(e))?;
        let order = {
            let _loading = self.orders.status().begin();
            let token = self
                .orders
                .session()
                .require_token()
                .map_err(|e| self.orders.record(e))?;
            let order: Order = self
                .orders
                .api()
                .post(Order::PATH, &body, Some(&*token))
                .await
                .map_err(|e| self.orders.fail_api(&e, "Gagal membuat pesanan", Some(&token)))?;
            Arc::new(order)
        };
        info!(id = %order.id, total = %order.total_jumlah, "order placed");
        self.orders.prepend(Arc::clone(&order));
        self.orders.set_selected(Some((*order).clone()));

        if let Err(e) = cart.clear_cart().await {
            warn!(error = %e, "order placed but cart could not be cleared");
        }
        Ok(order)
    }
}
