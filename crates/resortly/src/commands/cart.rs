//! Cart command handlers.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use resortly_core::{Cart, CartItem, Quantity};

use crate::cli::{CartArgs, CartCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, rupiah};

use super::{Ctx, util};

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Produk")]
    product: String,
    #[tabled(rename = "Harga")]
    price: String,
    #[tabled(rename = "Jumlah")]
    qty: u32,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

impl From<&Arc<CartItem>> for CartRow {
    fn from(line: &Arc<CartItem>) -> Self {
        Self {
            id: line.id.to_string(),
            product: line
                .produk
                .as_ref()
                .map_or_else(|| line.produk_id.to_string(), |p| p.nm_produk.clone()),
            price: rupiah(line.unit_price()),
            qty: line.jumlah.get(),
            subtotal: rupiah(line.subtotal()),
        }
    }
}

/// Serializable cart with its derived totals.
#[derive(Serialize)]
struct CartView<'a> {
    items: &'a [Arc<CartItem>],
    item_count: u32,
    total_amount: Decimal,
}

fn print_cart(cart: &Cart, global: &GlobalOpts) {
    let view = CartView {
        items: cart.items(),
        item_count: cart.item_count(),
        total_amount: cart.total_amount(),
    };
    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            let rows: Vec<CartRow> = v.items.iter().map(CartRow::from).collect();
            if rows.is_empty() {
                return "Keranjang belanja kosong".into();
            }
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            format!(
                "{table}\n{} barang, total {}",
                v.item_count,
                rupiah(v.total_amount)
            )
        },
        |v| {
            v.items
                .iter()
                .map(|line| line.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
}

fn quantity(qty: u32) -> Result<Quantity, CliError> {
    Quantity::new(qty).map_err(|e| CliError::Validation {
        field: "qty".into(),
        reason: e.to_string(),
    })
}

/// Cart lines are addressed by line ID; fail early for IDs not in the cart.
fn require_line(cart: &Cart, id: &str) -> Result<(), CliError> {
    let wanted = util::entity_id(id);
    if cart.items().iter().any(|line| line.id == wanted) {
        Ok(())
    } else {
        Err(CliError::NotFound {
            resource_type: "cart line".into(),
            identifier: id.into(),
            list_command: "cart show".into(),
        })
    }
}

pub async fn handle(ctx: &Ctx, args: CartArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ctx.resort.cart();
    match args.command {
        CartCommand::Show => {
            // fetch_cart is a silent no-op without a session.
            if !ctx.resort.session().is_authenticated() {
                return Err(resortly_core::StoreError::AuthRequired.into());
            }
            let cart = store.fetch_cart().await?;
            print_cart(&cart, global);
            Ok(())
        }

        CartCommand::Add { product, qty } => {
            let qty = quantity(qty)?;
            let cart = store.add_to_cart(&util::entity_id(&product), qty).await?;
            util::done("Produk ditambahkan ke keranjang", global);
            print_cart(&cart, global);
            Ok(())
        }

        CartCommand::Update { id, qty } => {
            let qty = quantity(qty)?;
            require_line(&store.fetch_cart().await?, &id)?;
            let cart = store.update_cart_item(&util::entity_id(&id), qty).await?;
            print_cart(&cart, global);
            Ok(())
        }

        CartCommand::Remove { id } => {
            require_line(&store.fetch_cart().await?, &id)?;
            let cart = store.remove_from_cart(&util::entity_id(&id)).await?;
            util::done("Produk dihapus dari keranjang", global);
            print_cart(&cart, global);
            Ok(())
        }

        CartCommand::Clear => {
            if !util::confirm("Kosongkan keranjang?", global)? {
                return Ok(());
            }
            store.clear_cart().await?;
            util::done("Keranjang dikosongkan", global);
            Ok(())
        }
    }
}
