//! Order command handlers.

use std::sync::Arc;

use tabled::Tabled;

use resortly_core::Order;

use crate::cli::{GlobalOpts, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output::{self, Tone, paint, rupiah};

use super::{Ctx, util};

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kode")]
    code: String,
    #[tabled(rename = "Barang")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Pembayaran")]
    payment: String,
    #[tabled(rename = "Dibuat")]
    created: String,
}

impl OrderRow {
    fn new(o: &Arc<Order>, color: bool) -> Self {
        Self {
            id: o.id.to_string(),
            code: o.kode_pesanan.clone().unwrap_or_default(),
            items: o.item_pesanan.len(),
            total: rupiah(o.total_jumlah),
            status: paint(&o.status.to_string(), util::lifecycle_tone(o.status), color),
            payment: paint(
                &o.status_pembayaran.to_string(),
                util::payment_tone(o.status_pembayaran),
                color,
            ),
            created: o.created_at.clone().unwrap_or_default(),
        }
    }
}

fn detail(o: &Arc<Order>) -> String {
    let mut lines = vec![
        format!("ID:         {}", o.id),
        format!("Kode:       {}", util::or_dash(o.kode_pesanan.as_deref())),
        format!("Jenis:      {}", o.jenis_pesanan),
        format!("Total:      {}", rupiah(o.total_jumlah)),
        format!("Status:     {}", o.status),
        format!("Pembayaran: {}", o.status_pembayaran),
        format!("Aksi:       {}", util::actions(o.as_ref())),
    ];
    if let Some(ref note) = o.catatan {
        lines.push(format!("Catatan:    {note}"));
    }
    for item in &o.item_pesanan {
        let name = item
            .produk
            .as_ref()
            .map_or_else(|| item.produk_id.to_string(), |p| p.nm_produk.clone());
        lines.push(format!(
            "  - {name}: {} x {} = {}",
            rupiah(item.harga_satuan),
            item.jumlah,
            rupiah(item.subtotal)
        ));
    }
    lines.join("\n")
}

pub async fn handle(ctx: &Ctx, args: OrdersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ctx.resort.orders();
    match args.command {
        OrdersCommand::List => {
            let bar = util::spinner("Memuat pesanan", global);
            let list = store.fetch_orders().await;
            util::finish(bar);
            let color = ctx.color;
            let out = output::render_list(
                &global.output,
                &list?,
                |o| OrderRow::new(o, color),
                |o| o.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Show { id } => {
            let order = store.fetch_order(&util::entity_id(&id)).await?;
            let out =
                output::render_single(&global.output, &order, detail, |o| o.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Cancel { id } => {
            util::ensure_cancellable(&*store.fetch_order(&util::entity_id(&id)).await?)?;
            if !util::confirm(&format!("Batalkan pesanan {id}?"), global)? {
                return Ok(());
            }
            store.cancel_order(&util::entity_id(&id)).await?;
            util::done("Pesanan dibatalkan", global);
            Ok(())
        }

        OrdersCommand::Checkout => {
            let eligibility = store.check_eligibility().await;
            if !eligibility.eligible {
                return Err(CliError::Rejected {
                    message: eligibility
                        .message
                        .unwrap_or_else(|| "Anda belum dapat membuat pesanan".into()),
                });
            }

            let cart = ctx.resort.cart();
            cart.fetch_cart().await?;
            let order = store.checkout(cart).await?;
            util::done(
                &format!("Pesanan dibuat, total {}", rupiah(order.total_jumlah)),
                global,
            );
            let out =
                output::render_single(&global.output, &order, detail, |o| o.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Eligibility => {
            let answer = store.check_eligibility().await;
            let out = output::render_single(
                &global.output,
                &answer,
                |a| {
                    let verdict = if a.eligible {
                        paint("Boleh memesan", Tone::Good, ctx.color)
                    } else {
                        paint("Belum boleh memesan", Tone::Bad, ctx.color)
                    };
                    match a.message {
                        Some(ref m) => format!("{verdict}: {m}"),
                        None => verdict,
                    }
                },
                |a| a.eligible.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
