// ── Cart store ──
//
// The cart lives on the server (`/keranjang`). Every mutation is followed
// by a full re-fetch instead of a local patch; carts are small.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use tracing::debug;

use super::resource::{Resource, ResourceStore};
use super::status::StoreStatus;
use crate::error::StoreError;
use crate::model::{Cart, CartItem, EntityId, Quantity};
use crate::session::Session;
use crate::stream::EntityStream;
use resortly_api::ApiClient;

impl Resource for CartItem {
    const PATH: &'static str = "keranjang";
    const LABEL: &'static str = "keranjang";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Server-backed shopping cart of the signed-in customer.
pub struct CartStore {
    lines: ResourceStore<CartItem>,
}

impl CartStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self {
            lines: ResourceStore::new(api, session),
        }
    }

    /// Current lines, with totals computed on read.
    pub fn cart(&self) -> Cart {
        Cart::new(self.lines.items())
    }

    pub fn status(&self) -> &StoreStatus {
        self.lines.status()
    }

    pub fn subscribe(&self) -> EntityStream<CartItem> {
        self.lines.subscribe()
    }

    /// Reload the cart. Without a session this does nothing and returns
    /// the (empty) local cart.
    pub async fn fetch_cart(&self) -> Result<Cart, StoreError> {
        if !self.lines.session().is_authenticated() {
            debug!("no session, cart fetch skipped");
            return Ok(self.cart());
        }
        self.lines.fetch_all().await.map(Cart::new)
    }

    pub async fn add_to_cart(&self, product_id: &EntityId, qty: Quantity) -> Result<Cart, StoreError> {
        let token = self.guard()?;
        let body = json!({ "produk_id": product_id, "jumlah": qty });
        let result = {
            let _loading = self.lines.status().begin();
            self.lines
                .api()
                .post_unit(CartItem::PATH, &body, Some(&*token))
                .await
        };
        self.settle(result, "Gagal menambahkan ke keranjang", &token)
            .await
    }

    pub async fn update_cart_item(&self, id: &EntityId, qty: Quantity) -> Result<Cart, StoreError> {
        let token = self.guard()?;
        let path = format!("{}/{id}", CartItem::PATH);
        let result = {
            let _loading = self.lines.status().begin();
            self.lines
                .api()
                .put_unit(&path, &json!({ "jumlah": qty }), Some(&*token))
                .await
        };
        self.settle(result, "Gagal memperbarui keranjang", &token)
            .await
    }

    pub async fn remove_from_cart(&self, id: &EntityId) -> Result<Cart, StoreError> {
        let token = self.guard()?;
        let path = format!("{}/{id}", CartItem::PATH);
        let result = {
            let _loading = self.lines.status().begin();
            self.lines.api().delete_unit(&path, Some(&*token)).await
        };
        self.settle(result, "Gagal menghapus dari keranjang", &token)
            .await
    }

    /// Empty the cart server-side, then locally. No re-fetch: the answer
    /// is known.
    pub async fn clear_cart(&self) -> Result<(), StoreError> {
        let token = self.guard()?;
        let _loading = self.lines.status().begin();
        self.lines
            .api()
            .delete_unit(CartItem::PATH, Some(&*token))
            .await
            .map_err(|e| {
                self.lines
                    .fail_api(&e, "Gagal mengosongkan keranjang", Some(&token))
            })?;
        self.lines.clear_local();
        Ok(())
    }

    // Mutations fail fast without a session; nothing is sent.
    fn guard(&self) -> Result<Arc<SecretString>, StoreError> {
        self.lines
            .session()
            .require_token()
            .map_err(|e| self.lines.record(e))
    }

    async fn settle(
        &self,
        result: Result<(), resortly_api::Error>,
        fallback: &str,
        token: &Arc<SecretString>,
    ) -> Result<Cart, StoreError> {
        if let Err(e) = result {
            return Err(self.lines.fail_api(&e, fallback, Some(token)));
        }
        self.fetch_cart().await
    }
}
