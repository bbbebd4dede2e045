// ── Lifecycle and payment status ──
//
// Status values mirror the API's snake_case strings. The server enforces
// every transition; these types only let consumers gate actions the same
// way (show "Pay" / "Cancel" buttons, refuse obviously invalid requests).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ── Payment status ──────────────────────────────────────────────────

/// `status_pembayaran` of a booking or order.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    BelumDibayar,
    Dibayar,
    Dikembalikan,
}

impl PaymentStatus {
    /// Payment status only ever moves forward: unpaid to paid, paid to refunded.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::BelumDibayar, Self::Dibayar) | (Self::Dibayar, Self::Dikembalikan)
        )
    }

    pub fn is_unpaid(self) -> bool {
        self == Self::BelumDibayar
    }
}

// ── Lifecycle ───────────────────────────────────────────────────────

/// A booking or order lifecycle: a forward path plus a cancelled state.
pub trait Lifecycle: Copy + Eq + Send + Sync + 'static {
    /// First state of every new record.
    const INITIAL: Self;
    /// The cancelled state, reachable only from pre-terminal states.
    const CANCELLED: Self;

    /// Position on the forward path; `None` for the cancelled state.
    fn rank(self) -> Option<u8>;

    /// Last state of the forward path.
    fn is_terminal(self) -> bool;

    /// States in which a payment may still be started.
    fn is_early(self) -> bool;

    /// Monotonic forward moves, plus cancellation from any pre-terminal state.
    fn can_transition_to(self, next: Self) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            (Some(_), None) => !self.is_terminal(),
            (None, _) => false,
        }
    }
}

/// Room booking lifecycle: `menunggu → dikonfirmasi → check_in → check_out`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomBookingStatus {
    #[default]
    Menunggu,
    Dikonfirmasi,
    CheckIn,
    CheckOut,
    Dibatalkan,
}

impl Lifecycle for RoomBookingStatus {
    const INITIAL: Self = Self::Menunggu;
    const CANCELLED: Self = Self::Dibatalkan;

    fn rank(self) -> Option<u8> {
        match self {
            Self::Menunggu => Some(0),
            Self::Dikonfirmasi => Some(1),
            Self::CheckIn => Some(2),
            Self::CheckOut => Some(3),
            Self::Dibatalkan => None,
        }
    }

    fn is_terminal(self) -> bool {
        self == Self::CheckOut
    }

    fn is_early(self) -> bool {
        matches!(self, Self::Menunggu | Self::Dikonfirmasi)
    }
}

/// Facility booking lifecycle: `menunggu → dikonfirmasi → digunakan`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FacilityBookingStatus {
    #[default]
    Menunggu,
    Dikonfirmasi,
    Digunakan,
    Dibatalkan,
}

impl Lifecycle for FacilityBookingStatus {
    const INITIAL: Self = Self::Menunggu;
    const CANCELLED: Self = Self::Dibatalkan;

    fn rank(self) -> Option<u8> {
        match self {
            Self::Menunggu => Some(0),
            Self::Dikonfirmasi => Some(1),
            Self::Digunakan => Some(2),
            Self::Dibatalkan => None,
        }
    }

    fn is_terminal(self) -> bool {
        self == Self::Digunakan
    }

    fn is_early(self) -> bool {
        matches!(self, Self::Menunggu | Self::Dikonfirmasi)
    }
}

/// Shop order lifecycle: `menunggu → diproses → selesai`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Menunggu,
    Diproses,
    Selesai,
    Dibatalkan,
}

impl Lifecycle for OrderStatus {
    const INITIAL: Self = Self::Menunggu;
    const CANCELLED: Self = Self::Dibatalkan;

    fn rank(self) -> Option<u8> {
        match self {
            Self::Menunggu => Some(0),
            Self::Diproses => Some(1),
            Self::Selesai => Some(2),
            Self::Dibatalkan => None,
        }
    }

    fn is_terminal(self) -> bool {
        self == Self::Selesai
    }

    // Orders have no confirmation step.
    fn is_early(self) -> bool {
        self == Self::Menunggu
    }
}

// ── Payable records ─────────────────────────────────────────────────

/// A record carrying a lifecycle status and a payment status.
pub trait Payable {
    type Status: Lifecycle;

    fn lifecycle(&self) -> Self::Status;
    fn payment_status(&self) -> PaymentStatus;

    /// Unpaid and still in an early lifecycle state.
    fn is_payable(&self) -> bool {
        self.payment_status().is_unpaid() && self.lifecycle().is_early()
    }

    /// Unpaid and still in the first lifecycle state.
    fn is_cancellable(&self) -> bool {
        self.payment_status().is_unpaid() && self.lifecycle() == Self::Status::INITIAL
    }

    fn is_cancelled(&self) -> bool {
        self.lifecycle() == Self::Status::CANCELLED
    }
}
