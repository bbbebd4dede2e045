// ── Cart domain types ──
//
// The cart lives server-side; these types mirror it. Totals are never
// stored, only computed from the current items.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::entity_id::EntityId;
use crate::error::StoreError;

/// A line quantity. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Self = Self(NonZeroU32::MIN);

    pub fn new(n: u32) -> Result<Self, StoreError> {
        NonZeroU32::new(n).map(Self).ok_or_else(|| StoreError::Invalid {
            message: "Jumlah minimal 1".into(),
        })
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Quantity {
    type Error = StoreError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cart line (`keranjang`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: EntityId,
    pub produk_id: EntityId,
    pub jumlah: Quantity,
    #[serde(default)]
    pub produk: Option<Product>,
}

impl CartItem {
    /// Unit price taken from the embedded product; zero when it is missing.
    pub fn unit_price(&self) -> Decimal {
        self.produk.as_ref().map_or(Decimal::ZERO, |p| p.harga)
    }

    pub fn subtotal(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.jumlah.get())
    }
}

/// A read-only view over the cart's current lines.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Arc<Vec<Arc<CartItem>>>,
}

impl Cart {
    pub fn new(items: Arc<Vec<Arc<CartItem>>>) -> Self {
        Self { items }
    }

    /// `Σ(price × quantity)`, computed on every call.
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|item| item.subtotal()).sum()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.jumlah.get()).sum()
    }

    pub fn items(&self) -> &[Arc<CartItem>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str, price: i64, qty: u32) -> Arc<CartItem> {
        Arc::new(
            serde_json::from_value(json!({
                "id": id,
                "produk_id": format!("p-{id}"),
                "jumlah": qty,
                "produk": { "id": format!("p-{id}"), "nm_produk": "Kopi", "harga": price }
            }))
            .unwrap(),
        )
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(Quantity::new(0).is_err());
        assert!(serde_json::from_value::<Quantity>(json!(0)).is_err());
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let cart = Cart::new(Arc::new(vec![item("a", 25_000, 2), item("b", 10_000, 3)]));
        assert_eq!(cart.total_amount(), Decimal::from(80_000));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn line_without_product_counts_as_free() {
        let bare: CartItem =
            serde_json::from_value(json!({"id": "x", "produk_id": "p", "jumlah": 4})).unwrap();
        assert_eq!(bare.subtotal(), Decimal::ZERO);
    }
}
