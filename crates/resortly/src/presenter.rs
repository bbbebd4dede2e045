//! Terminal checkout: print the hosted payment page and ask how it went.

use std::io::IsTerminal;

use futures_util::future::BoxFuture;
use tracing::warn;

use resortly_core::{Checkout, CheckoutPresenter, WidgetOutcome};

use crate::output::{Tone, paint};

const CHOICES: [(&str, WidgetOutcome); 4] = [
    ("Pembayaran selesai", WidgetOutcome::Success),
    ("Masih menunggu (transfer / VA)", WidgetOutcome::Pending),
    ("Pembayaran gagal", WidgetOutcome::Error),
    ("Halaman ditutup tanpa membayar", WidgetOutcome::Closed),
];

pub struct TerminalPresenter {
    color: bool,
}

impl TerminalPresenter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl CheckoutPresenter for TerminalPresenter {
    fn present<'a>(&'a self, checkout: &'a Checkout) -> BoxFuture<'a, WidgetOutcome> {
        Box::pin(async move {
            eprintln!(
                "Buka halaman pembayaran:\n  {}",
                paint(&checkout.redirect_url, Tone::Good, self.color)
            );

            // Without a terminal nobody can answer; the payment continues in
            // the browser and settles on the server.
            if !std::io::stdin().is_terminal() {
                return WidgetOutcome::Pending;
            }

            let picked = tokio::task::spawn_blocking(|| {
                let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
                dialoguer::Select::new()
                    .with_prompt("Status pembayaran")
                    .items(&labels)
                    .default(0)
                    .interact_opt()
            })
            .await;

            match picked {
                Ok(Ok(Some(index))) => CHOICES
                    .get(index)
                    .map_or(WidgetOutcome::Closed, |(_, outcome)| *outcome),
                Ok(Ok(None)) => WidgetOutcome::Closed,
                Ok(Err(e)) => {
                    warn!(error = %e, "checkout prompt failed");
                    WidgetOutcome::Closed
                }
                Err(e) => {
                    warn!(error = %e, "checkout prompt task failed");
                    WidgetOutcome::Closed
                }
            }
        })
    }
}
