// ── Reactive store layer ──
//
// Each store owns one slice of server-mirrored state, publishes it through
// `watch` channels, and exposes async operations that mutate the server
// and then the local mirror.

pub mod auth;
pub mod booking;
pub mod cart;
pub mod catalog;
pub(crate) mod collection;
pub mod order;
pub mod profile;
pub mod resource;
pub(crate) mod slot;
pub mod status;

pub use auth::AuthStore;
pub use booking::BookingStore;
pub use cart::CartStore;
pub use catalog::{FacilityStore, ProductStore, RoomStore};
pub use collection::{Snapshot, Ticket};
pub use order::OrderStore;
pub use profile::ProfileStore;
pub use resource::{CancelVerb, Cancellable, Resource, ResourceStore};
pub use slot::SlotState;
pub use status::{LoadingGuard, StoreStatus};
