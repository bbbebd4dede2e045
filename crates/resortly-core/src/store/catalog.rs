// ── Catalog stores ──
//
// Public, read-only mirrors of rooms, facilities and products. No token
// is sent; a session is still held so 401s from misconfigured servers are
// handled the same way as elsewhere.

use std::sync::Arc;

use super::resource::{Resource, ResourceStore};
use super::status::StoreStatus;
use crate::error::StoreError;
use crate::model::{EntityId, Facility, Product, ProductCategory, Room, RoomType};
use crate::session::Session;
use crate::stream::{EntityStream, SlotStream};
use resortly_api::ApiClient;

impl Resource for Room {
    const PATH: &'static str = "rooms";
    const LABEL: &'static str = "kamar";
    const PUBLIC: bool = true;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Resource for RoomType {
    const PATH: &'static str = "rooms/types";
    const LABEL: &'static str = "tipe kamar";
    const PUBLIC: bool = true;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Resource for Facility {
    const PATH: &'static str = "facilities";
    const LABEL: &'static str = "fasilitas";
    const PUBLIC: bool = true;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Resource for Product {
    const PATH: &'static str = "products";
    const LABEL: &'static str = "produk";
    const PUBLIC: bool = true;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Resource for ProductCategory {
    const PATH: &'static str = "products/categories";
    const LABEL: &'static str = "kategori produk";
    const PUBLIC: bool = true;

    fn id(&self) -> &EntityId {
        &self.id
    }
}

// ── Rooms ───────────────────────────────────────────────────────────

/// Rooms and room types.
pub struct RoomStore {
    rooms: ResourceStore<Room>,
    types: ResourceStore<RoomType>,
    status: Arc<StoreStatus>,
}

impl RoomStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        let status = Arc::new(StoreStatus::new());
        Self {
            rooms: ResourceStore::with_status(api.clone(), Arc::clone(&session), Arc::clone(&status)),
            types: ResourceStore::with_status(api, session, Arc::clone(&status)),
            status,
        }
    }

    pub fn rooms(&self) -> Arc<Vec<Arc<Room>>> {
        self.rooms.items()
    }

    pub fn room_types(&self) -> Arc<Vec<Arc<RoomType>>> {
        self.types.items()
    }

    pub fn selected_room(&self) -> Option<Arc<Room>> {
        self.rooms.selected()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subscribe(&self) -> EntityStream<Room> {
        self.rooms.subscribe()
    }

    pub fn subscribe_selected(&self) -> SlotStream<Room> {
        self.rooms.subscribe_selected()
    }

    pub async fn fetch_rooms(&self) -> Result<Arc<Vec<Arc<Room>>>, StoreError> {
        self.rooms.fetch_all().await
    }

    pub async fn fetch_room_types(&self) -> Result<Arc<Vec<Arc<RoomType>>>, StoreError> {
        self.types.fetch_all().await
    }

    pub async fn get_room(&self, id: &EntityId) -> Result<Arc<Room>, StoreError> {
        self.rooms.fetch_one(id).await
    }
}

// ── Facilities ──────────────────────────────────────────────────────

pub struct FacilityStore {
    facilities: ResourceStore<Facility>,
}

impl FacilityStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self {
            facilities: ResourceStore::new(api, session),
        }
    }

    pub fn facilities(&self) -> Arc<Vec<Arc<Facility>>> {
        self.facilities.items()
    }

    pub fn selected_facility(&self) -> Option<Arc<Facility>> {
        self.facilities.selected()
    }

    pub fn status(&self) -> &StoreStatus {
        self.facilities.status()
    }

    pub fn subscribe(&self) -> EntityStream<Facility> {
        self.facilities.subscribe()
    }

    pub fn subscribe_selected(&self) -> SlotStream<Facility> {
        self.facilities.subscribe_selected()
    }

    pub async fn fetch_facilities(&self) -> Result<Arc<Vec<Arc<Facility>>>, StoreError> {
        self.facilities.fetch_all().await
    }

    pub async fn get_facility(&self, id: &EntityId) -> Result<Arc<Facility>, StoreError> {
        self.facilities.fetch_one(id).await
    }
}

// ── Products ────────────────────────────────────────────────────────

/// Shop products and their categories.
pub struct ProductStore {
    products: ResourceStore<Product>,
    categories: ResourceStore<ProductCategory>,
    status: Arc<StoreStatus>,
}

impl ProductStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        let status = Arc::new(StoreStatus::new());
        Self {
            products: ResourceStore::with_status(
                api.clone(),
                Arc::clone(&session),
                Arc::clone(&status),
            ),
            categories: ResourceStore::with_status(api, session, Arc::clone(&status)),
            status,
        }
    }

    pub fn products(&self) -> Arc<Vec<Arc<Product>>> {
        self.products.items()
    }

    pub fn categories(&self) -> Arc<Vec<Arc<ProductCategory>>> {
        self.categories.items()
    }

    /// Products of one category, from the current list.
    pub fn in_category(&self, category: &EntityId) -> Vec<Arc<Product>> {
        self.products
            .items()
            .iter()
            .filter(|p| p.kategori_produk_id.as_ref() == Some(category))
            .cloned()
            .collect()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn subscribe(&self) -> EntityStream<Product> {
        self.products.subscribe()
    }

    pub async fn fetch_products(&self) -> Result<Arc<Vec<Arc<Product>>>, StoreError> {
        self.products.fetch_all().await
    }

    pub async fn fetch_categories(&self) -> Result<Arc<Vec<Arc<ProductCategory>>>, StoreError> {
        self.categories.fetch_all().await
    }

    pub async fn get_product(&self, id: &EntityId) -> Result<Arc<Product>, StoreError> {
        self.products.fetch_one(id).await
    }
}
