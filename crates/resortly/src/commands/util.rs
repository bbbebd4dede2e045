//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use indicatif::{ProgressBar, ProgressStyle};

use resortly_core::{EntityId, Lifecycle, Payable, PaymentStatus};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::Tone;

pub fn entity_id(raw: &str) -> EntityId {
    EntityId::from(raw)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// A spinner on stderr while a request is in flight, for interactive table output.
pub fn spinner(message: &str, global: &GlobalOpts) -> Option<ProgressBar> {
    let interactive = matches!(global.output, OutputFormat::Table)
        && !global.quiet
        && std::io::stderr().is_terminal();
    if !interactive {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

pub fn finish(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

/// Print a one-line confirmation on stderr unless `--quiet`.
pub fn done(message: &str, global: &GlobalOpts) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

pub fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, CliError> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected HH:MM ({e})"),
    })
}

pub fn payment_tone(status: PaymentStatus) -> Tone {
    match status {
        PaymentStatus::Dibayar => Tone::Good,
        PaymentStatus::BelumDibayar => Tone::Pending,
        PaymentStatus::Dikembalikan => Tone::Plain,
    }
}

/// Tone of a lifecycle state: cancelled is bad, the terminal state good.
pub fn lifecycle_tone<S: Lifecycle>(status: S) -> Tone {
    if status == S::CANCELLED {
        Tone::Bad
    } else if status.is_terminal() {
        Tone::Good
    } else {
        Tone::Plain
    }
}

/// The actions a record currently allows, for detail views.
pub fn actions<P: Payable>(record: &P) -> String {
    let mut actions = Vec::new();
    if record.is_payable() {
        actions.push("bayar");
    }
    if record.is_cancellable() {
        actions.push("batalkan");
    }
    if actions.is_empty() {
        "-".into()
    } else {
        actions.join(", ")
    }
}

/// Refuse to start a payment the record no longer allows.
pub fn ensure_payable<P>(record: &P) -> Result<(), CliError>
where
    P: Payable,
    P::Status: std::fmt::Display,
{
    if record.is_payable() {
        return Ok(());
    }
    Err(CliError::Validation {
        field: "status".into(),
        reason: format!(
            "tidak dapat dibayar (status {}, pembayaran {})",
            record.lifecycle(),
            record.payment_status()
        ),
    })
}

/// Refuse to cancel a record past its first state or already paid.
pub fn ensure_cancellable<P>(record: &P) -> Result<(), CliError>
where
    P: Payable,
    P::Status: std::fmt::Display,
{
    if record.is_cancellable() {
        return Ok(());
    }
    Err(CliError::Validation {
        field: "status".into(),
        reason: format!(
            "tidak dapat dibatalkan (status {}, pembayaran {})",
            record.lifecycle(),
            record.payment_status()
        ),
    })
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
