// ── Booking store ──
//
// Room and facility bookings of the signed-in customer. Two resource
// stores share one loading/error status, matching a single "bookings"
// screen state.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::resource::{CancelVerb, Cancellable, Resource, ResourceStore};
use super::status::StoreStatus;
use crate::config::CancelRefresh;
use crate::error::StoreError;
use crate::model::{
    EntityId, FacilityBooking, FacilityBookingStatus, NewFacilityBooking, NewRoomBooking,
    RoomBooking, RoomBookingStatus,
};
use crate::session::Session;
use crate::stream::{EntityStream, SlotStream};
use resortly_api::ApiClient;

impl Resource for RoomBooking {
    const PATH: &'static str = "room-bookings";
    const LABEL: &'static str = "pemesanan kamar";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Cancellable for RoomBooking {
    const CANCEL_VERB: CancelVerb = CancelVerb::Put;

    fn mark_cancelled(&mut self) {
        self.status = RoomBookingStatus::Dibatalkan;
    }
}

impl Resource for FacilityBooking {
    const PATH: &'static str = "facility-bookings";
    const LABEL: &'static str = "pemesanan fasilitas";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Cancellable for FacilityBooking {
    const CANCEL_VERB: CancelVerb = CancelVerb::Put;

    fn mark_cancelled(&mut self) {
        self.status = FacilityBookingStatus::Dibatalkan;
    }
}

/// Room and facility bookings, each with a list and a "current" booking.
pub struct BookingStore {
    rooms: ResourceStore<RoomBooking>,
    facilities: ResourceStore<FacilityBooking>,
    status: Arc<StoreStatus>,
    cancel_refresh: CancelRefresh,
}

impl BookingStore {
    pub fn new(api: ApiClient, session: Arc<Session>, cancel_refresh: CancelRefresh) -> Self {
        let status = Arc::new(StoreStatus::new());
        Self {
            rooms: ResourceStore::with_status(api.clone(), Arc::clone(&session), Arc::clone(&status)),
            facilities: ResourceStore::with_status(api, session, Arc::clone(&status)),
            status,
            cancel_refresh,
        }
    }

    // ── State ───────────────────────────────────────────────────────

    pub fn room_bookings(&self) -> Arc<Vec<Arc<RoomBooking>>> {
        self.rooms.items()
    }

    pub fn facility_bookings(&self) -> Arc<Vec<Arc<FacilityBooking>>> {
        self.facilities.items()
    }

    pub fn current_room_booking(&self) -> Option<Arc<RoomBooking>> {
        self.rooms.selected()
    }

    pub fn current_facility_booking(&self) -> Option<Arc<FacilityBooking>> {
        self.facilities.selected()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subscribe_room_bookings(&self) -> EntityStream<RoomBooking> {
        self.rooms.subscribe()
    }

    pub fn subscribe_facility_bookings(&self) -> EntityStream<FacilityBooking> {
        self.facilities.subscribe()
    }

    pub fn subscribe_current_room_booking(&self) -> SlotStream<RoomBooking> {
        self.rooms.subscribe_selected()
    }

    pub fn subscribe_current_facility_booking(&self) -> SlotStream<FacilityBooking> {
        self.facilities.subscribe_selected()
    }

    // ── Room bookings ───────────────────────────────────────────────

    pub async fn fetch_room_bookings(&self) -> Result<Arc<Vec<Arc<RoomBooking>>>, StoreError> {
        self.rooms.fetch_all().await
    }

    /// Load one room booking as the current one. The current booking is
    /// empty while the request runs.
    pub async fn get_room_booking(&self, id: &EntityId) -> Result<Arc<RoomBooking>, StoreError> {
        self.rooms.fetch_one(id).await
    }

    pub async fn create_room_booking(
        &self,
        data: &NewRoomBooking,
    ) -> Result<Arc<RoomBooking>, StoreError> {
        let booking = self.rooms.create(data).await?;
        self.rooms.set_selected(Some((*booking).clone()));
        Ok(booking)
    }

    pub async fn cancel_room_booking(&self, id: &EntityId) -> Result<(), StoreError> {
        self.rooms.cancel(id, self.cancel_refresh).await
    }

    /// Settle a room booking through a non-widget method (e.g. `"transfer"`).
    pub async fn pay_room_booking(
        &self,
        id: &EntityId,
        method: &str,
    ) -> Result<Arc<RoomBooking>, StoreError> {
        pay_direct(&self.rooms, id, method).await
    }

    pub fn set_current_room_booking(&self, booking: Option<RoomBooking>) {
        self.rooms.set_selected(booking);
    }

    // ── Facility bookings ───────────────────────────────────────────

    pub async fn fetch_facility_bookings(
        &self,
    ) -> Result<Arc<Vec<Arc<FacilityBooking>>>, StoreError> {
        self.facilities.fetch_all().await
    }

    pub async fn get_facility_booking(
        &self,
        id: &EntityId,
    ) -> Result<Arc<FacilityBooking>, StoreError> {
        self.facilities.fetch_one(id).await
    }

    /// Validate locally, then create. Invalid input never reaches the server.
    pub async fn create_facility_booking(
        &self,
        data: &NewFacilityBooking,
    ) -> Result<Arc<FacilityBooking>, StoreError> {
        if let Err(e) = data.validate() {
            self.status.set_error(e.to_string());
            return Err(e);
        }
        let booking = self.facilities.create(data).await?;
        self.facilities.set_selected(Some((*booking).clone()));
        Ok(booking)
    }

    pub async fn cancel_facility_booking(&self, id: &EntityId) -> Result<(), StoreError> {
        self.facilities.cancel(id, self.cancel_refresh).await
    }

    pub async fn pay_facility_booking(
        &self,
        id: &EntityId,
        method: &str,
    ) -> Result<Arc<FacilityBooking>, StoreError> {
        pay_direct(&self.facilities, id, method).await
    }

    pub fn set_current_facility_booking(&self, booking: Option<FacilityBooking>) {
        self.facilities.set_selected(booking);
    }
}

/// `POST {path}/{id}/payment`, then reload the booking and the list, in
/// that order, so both views show the new payment status.
async fn pay_direct<T: Resource>(
    store: &ResourceStore<T>,
    id: &EntityId,
    method: &str,
) -> Result<Arc<T>, StoreError> {
    {
        let _loading = store.status().begin();
        let token = store.session().require_token().map_err(|e| store.record(e))?;
        let path = format!("{}/{id}/payment", T::PATH);
        store
            .api()
            .post_unit(&path, &json!({ "metode_pembayaran": method }), Some(&*token))
            .await
            .map_err(|e| store.fail_api(&e, "Gagal memproses pembayaran", Some(&token)))?;
        info!(resource = T::PATH, %id, method, "direct payment submitted");
    }
    let record = store.fetch_one(id).await?;
    store.fetch_all().await?;
    Ok(record)
}
