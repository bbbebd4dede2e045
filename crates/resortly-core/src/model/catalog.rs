// ── Catalog types ──
//
// Rooms, facilities and shop products. Read-only mirrors of public
// endpoints; nothing here is mutated client-side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// An image attached to a room or facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: EntityId,
    pub jalur_gambar: String,
    #[serde(default)]
    pub gambar_utama: bool,
}

/// Room category with its nightly rate (`jenis_kamar`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: EntityId,
    pub nm_jenis_kamar: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub kapasitas: u32,
    pub harga_per_malam: Decimal,
}

/// A bookable room (`kamar`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub jenis_kamar_id: EntityId,
    pub no_kamar: String,
    #[serde(default)]
    pub tersedia: bool,
    #[serde(default)]
    pub lantai: Option<String>,
    #[serde(default)]
    pub catatan: Option<String>,
    #[serde(default, alias = "roomType")]
    pub jenis_kamar: Option<RoomType>,
    #[serde(default, alias = "images")]
    pub gambar_kamar: Vec<Image>,
}

impl Room {
    /// Nightly rate, when the room type was embedded in the response.
    pub fn nightly_rate(&self) -> Option<Decimal> {
        self.jenis_kamar.as_ref().map(|t| t.harga_per_malam)
    }

    pub fn main_image(&self) -> Option<&Image> {
        self.gambar_kamar
            .iter()
            .find(|img| img.gambar_utama)
            .or_else(|| self.gambar_kamar.first())
    }
}

/// A bookable facility (`fasilitas`): pool, spa, meeting room, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: EntityId,
    pub nm_fasilitas: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    pub harga: Decimal,
    #[serde(default)]
    pub kapasitas: Option<u32>,
    #[serde(default)]
    pub jam_buka: Option<String>,
    #[serde(default)]
    pub jam_tutup: Option<String>,
    #[serde(default)]
    pub tersedia: bool,
    #[serde(default)]
    pub gambar_fasilitas: Vec<Image>,
}

/// Shop product category (`kategori_produk`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: EntityId,
    pub nm_kategori_produk: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
}

/// Shop product (`produk`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    #[serde(default)]
    pub kategori_produk_id: Option<EntityId>,
    pub nm_produk: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
    pub harga: Decimal,
    #[serde(default)]
    pub jumlah_stok: u32,
    #[serde(default)]
    pub jalur_gambar: Option<String>,
    #[serde(default)]
    pub tersedia: bool,
    #[serde(default)]
    pub kategori_produk: Option<ProductCategory>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.tersedia && self.jumlah_stok > 0
    }
}
