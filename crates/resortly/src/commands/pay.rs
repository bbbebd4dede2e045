//! Payment command handlers: open the checkout, show settlement status.

use futures_util::future::BoxFuture;
use tracing::warn;

use resortly_core::{PaymentHooks, PaymentKind, PaymentRequest, Resort, WidgetOutcome};

use crate::cli::{GlobalOpts, OutputFormat, PayArgs, PayCommand, PayTarget};
use crate::error::CliError;
use crate::output::{self, rupiah};

use super::{Ctx, util};

/// Reload the paid record so its new payment status is what gets shown.
struct RefreshHooks<'r> {
    resort: &'r Resort,
}

impl RefreshHooks<'_> {
    async fn reload(&self, request: &PaymentRequest) {
        let result = match request.kind {
            PaymentKind::Kamar => self
                .resort
                .bookings()
                .get_room_booking(&request.id)
                .await
                .map(drop),
            PaymentKind::Fasilitas => self
                .resort
                .bookings()
                .get_facility_booking(&request.id)
                .await
                .map(drop),
            PaymentKind::Pesanan => self.resort.orders().fetch_order(&request.id).await.map(drop),
        };
        if let Err(e) = result {
            warn!(id = %request.id, error = %e, "reload after payment failed");
        }
    }
}

impl PaymentHooks for RefreshHooks<'_> {
    fn on_success<'a>(&'a self, request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        Box::pin(self.reload(request))
    }

    fn on_pending<'a>(&'a self, request: &'a PaymentRequest) -> BoxFuture<'a, ()> {
        Box::pin(self.reload(request))
    }
}

/// Load the record behind `request` and refuse if it can no longer be paid.
async fn check_payable(resort: &Resort, request: &PaymentRequest) -> Result<(), CliError> {
    match request.kind {
        PaymentKind::Kamar => {
            util::ensure_payable(&*resort.bookings().get_room_booking(&request.id).await?)
        }
        PaymentKind::Fasilitas => {
            util::ensure_payable(&*resort.bookings().get_facility_booking(&request.id).await?)
        }
        PaymentKind::Pesanan => {
            util::ensure_payable(&*resort.orders().fetch_order(&request.id).await?)
        }
    }
}

fn kind(target: PayTarget) -> PaymentKind {
    match target {
        PayTarget::Room => PaymentKind::Kamar,
        PayTarget::Facility => PaymentKind::Fasilitas,
        PayTarget::Order => PaymentKind::Pesanan,
    }
}

pub async fn handle(ctx: &Ctx, args: PayArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let payments = ctx.resort.payments();
    match args.command {
        PayCommand::Start { target, id, resume } => {
            let request = if resume {
                PaymentRequest::resume(kind(target), util::entity_id(&id))
            } else {
                PaymentRequest::new(kind(target), util::entity_id(&id))
            };
            check_payable(&ctx.resort, &request).await?;

            let mut notices = payments.subscribe_notices();
            let hooks = RefreshHooks {
                resort: &ctx.resort,
            };
            let outcome = payments.pay(&request, &hooks).await;

            while let Ok(notice) = notices.try_recv() {
                output::print_notice(&notice, ctx.color, global.quiet);
            }

            let outcome = outcome?;
            let out = output::render_single(
                &global.output,
                &outcome.to_string(),
                Clone::clone,
                Clone::clone,
            );
            if !matches!(global.output, OutputFormat::Table) {
                output::print_output(&out, global.quiet);
            }
            if outcome == WidgetOutcome::Error {
                return Err(CliError::Payment {
                    message: "Pembayaran gagal".into(),
                });
            }
            Ok(())
        }

        PayCommand::Status { id } => {
            let report = payments.payment_status(&id).await?;
            let out = output::render_single(
                &global.output,
                &report,
                |r| {
                    let mut lines = vec![
                        format!("ID:       {}", r.payment.id),
                        format!("Jenis:    {}", r.payment.jenis_pembayaran),
                        format!("Jumlah:   {}", rupiah(r.payment.jumlah)),
                        format!("Metode:   {}", r.payment.metode_pembayaran),
                        format!("Status:   {}", r.payment.status),
                    ];
                    if let Some(ref va) = r.payment.va_number {
                        lines.push(format!("VA:       {va}"));
                    }
                    if let Some(ref t) = r.transaction {
                        lines.push(format!("Gateway:  {} ({})", t.transaction_status, t.payment_type));
                        lines.push(format!("Order:    {}", t.order_id));
                    }
                    lines.join("\n")
                },
                |r| r.payment.status.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
