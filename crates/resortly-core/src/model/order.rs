// ── Order domain types ──

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::booking::PaymentSummary;
use super::cart::Cart;
use super::catalog::Product;
use super::entity_id::EntityId;
use super::status::{OrderStatus, Payable, PaymentStatus};
use crate::error::StoreError;

/// How the order was placed (`jenis_pesanan`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderChannel {
    #[default]
    Online,
    Offline,
}

/// A line of a placed order (`item_pesanan`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub produk_id: EntityId,
    pub jumlah: u32,
    pub harga_satuan: Decimal,
    pub subtotal: Decimal,
    #[serde(default)]
    pub produk: Option<Product>,
}

/// A shop order (`pesanan`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub kode_pesanan: Option<String>,
    #[serde(default)]
    pub jenis_pesanan: OrderChannel,
    pub total_jumlah: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub catatan: Option<String>,
    #[serde(default)]
    pub metode_pembayaran: Option<String>,
    #[serde(default)]
    pub status_pembayaran: PaymentStatus,
    #[serde(default)]
    pub item_pesanan: Vec<OrderItem>,
    #[serde(default)]
    pub pembayaran: Vec<PaymentSummary>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Payable for Order {
    type Status = OrderStatus;

    fn lifecycle(&self) -> OrderStatus {
        self.status
    }

    fn payment_status(&self) -> PaymentStatus {
        self.status_pembayaran
    }
}

/// Line of a checkout request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub produk_id: EntityId,
    pub jumlah: u32,
    pub harga_satuan: Decimal,
    pub subtotal: Decimal,
}

/// Request body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub jenis_pesanan: OrderChannel,
    pub items: Vec<NewOrderItem>,
    pub total_jumlah: Decimal,
}

impl NewOrder {
    /// Build an online order from the cart's current lines.
    pub fn from_cart(cart: &Cart) -> Result<Self, StoreError> {
        if cart.is_empty() {
            return Err(StoreError::Invalid {
                message: "Keranjang belanja kosong".into(),
            });
        }
        let items = cart
            .items()
            .iter()
            .map(|line| NewOrderItem {
                produk_id: line.produk_id.clone(),
                jumlah: line.jumlah.get(),
                harga_satuan: line.unit_price(),
                subtotal: line.subtotal(),
            })
            .collect();
        Ok(Self {
            jenis_pesanan: OrderChannel::Online,
            items,
            total_jumlah: cart.total_amount(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::CartItem;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn checkout_body_mirrors_cart() {
        let line: CartItem = serde_json::from_value(json!({
            "id": "c-1",
            "produk_id": "p-1",
            "jumlah": 2,
            "produk": { "id": "p-1", "nm_produk": "Sarung", "harga": 75000 }
        }))
        .unwrap();
        let cart = Cart::new(Arc::new(vec![Arc::new(line)]));

        let order = NewOrder::from_cart(&cart).unwrap();
        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(body["jenis_pesanan"], json!("online"));
        assert_eq!(body["items"][0]["jumlah"], json!(2));
        assert_eq!(order.total_jumlah, Decimal::from(150_000));
        assert_eq!(order.items[0].subtotal, Decimal::from(150_000));
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        assert!(NewOrder::from_cart(&Cart::default()).is_err());
    }
}
