//! Client-side booking and payment layer for the resort API.
//!
//! This crate owns the domain model, the reactive stores and the payment
//! handshake that sit between `resortly-api` and a consumer (the CLI, or
//! any UI):
//!
//! - **[`Resort`]**: facade that builds one [`Session`] and hands it to
//!   every store. Cheaply cloneable.
//!
//! - **Stores** ([`store`]): booking, cart, order, room, facility,
//!   product, profile and auth. Most are thin wrappers over the generic
//!   [`ResourceStore<T>`], which keeps an ordered list and a selected item
//!   in `tokio::sync::watch` channels and guards both with request
//!   generations so a slow, superseded response never overwrites newer
//!   state.
//!
//! - **[`EntityStream<T>`]** / **[`SlotStream<T>`]**: subscription handles
//!   with `current()` / `changed()` for re-rendering on change.
//!
//! - **Payments** ([`payment`]): [`PaymentOrchestrator`] claims a busy
//!   flag, loads the widget once through [`WidgetLoader`], requests a token
//!   and routes the widget's outcome to a [`Notice`] and the caller's
//!   [`PaymentHooks`].
//!
//! - **Domain model** ([`model`]): bookings, orders, cart lines and catalog
//!   types, with lifecycle rules on [`Payable`].

pub mod config;
pub mod error;
pub mod model;
pub mod payment;
pub mod resort;
pub mod session;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{CancelRefresh, ClientConfig, GatewayConfig, GatewayEnvironment};
pub use error::{PaymentError, StoreError};
pub use payment::{
    Checkout, CheckoutPresenter, LoadState, NoHooks, Notice, NoticeLevel, PaymentHooks,
    PaymentOrchestrator, PaymentRequest, PaymentWidget, SnapScript, WidgetLoadError,
    WidgetLoader, WidgetOutcome, WidgetSource,
};
pub use resort::Resort;
pub use session::{MemoryTokenStore, Session, TokenStore};
pub use store::{
    AuthStore, BookingStore, CartStore, FacilityStore, OrderStore, ProductStore, ProfileStore,
    ResourceStore, RoomStore, StoreStatus,
};
pub use stream::{EntityStream, SlotStream};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AuthUser, Cart, CartItem, Eligibility, EntityId, Facility, FacilityBooking,
    FacilityBookingStatus, Lifecycle, NewFacilityBooking, NewOrder, NewRoomBooking, Order,
    OrderStatus, Payable, PaymentKind, PaymentStatus, Product, ProductCategory, Profile,
    Quantity, Role, Room, RoomBooking, RoomBookingStatus, RoomType, SnapToken, UpdatePassword,
    UpdateProfile,
};
