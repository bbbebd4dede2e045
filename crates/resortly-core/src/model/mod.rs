// ── Domain model ──

pub mod booking;
pub mod cart;
pub mod catalog;
pub mod entity_id;
pub mod order;
pub mod profile;
pub mod status;

pub use booking::{FacilityBooking, NewFacilityBooking, NewRoomBooking, PaymentSummary, RoomBooking};
pub use cart::{Cart, CartItem, Quantity};
pub use catalog::{Facility, Image, Product, ProductCategory, Room, RoomType};
pub use entity_id::EntityId;
pub use order::{NewOrder, NewOrderItem, Order, OrderChannel, OrderItem};
pub use profile::{Customer, Profile, UpdatePassword, UpdateProfile};
pub use status::{
    FacilityBookingStatus, Lifecycle, OrderStatus, Payable, PaymentStatus, RoomBookingStatus,
};

// Payment wire types are owned by the API crate.
pub use resortly_api::{
    AuthUser, Eligibility, GatewayTransaction, PaymentKind, PaymentRecord, PaymentStatusReport,
    Role, SettlementStatus, SnapToken,
};
