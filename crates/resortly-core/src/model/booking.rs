// ── Booking domain types ──

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use super::catalog::{Facility, Room};
use super::entity_id::EntityId;
use super::status::{FacilityBookingStatus, Payable, PaymentStatus, RoomBookingStatus};
use crate::error::StoreError;
use resortly_api::SettlementStatus;

/// Payment attempt embedded in a booking or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub id: EntityId,
    pub jumlah: Decimal,
    #[serde(default)]
    pub metode_pembayaran: Option<String>,
    pub status: SettlementStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Room booking ────────────────────────────────────────────────────

/// A room stay (`pemesanan_kamar`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomBooking {
    pub id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    pub kamar_id: EntityId,
    pub tanggal_check_in: String,
    pub tanggal_check_out: String,
    pub total_harga: Decimal,
    #[serde(default)]
    pub kode_pemesanan: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub status: RoomBookingStatus,
    #[serde(default)]
    pub catatan: Option<String>,
    #[serde(default)]
    pub metode_pembayaran: Option<String>,
    #[serde(default)]
    pub status_pembayaran: PaymentStatus,
    #[serde(default)]
    pub kamar: Option<Room>,
    #[serde(default)]
    pub pembayaran: Vec<PaymentSummary>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Payable for RoomBooking {
    type Status = RoomBookingStatus;

    fn lifecycle(&self) -> RoomBookingStatus {
        self.status
    }

    fn payment_status(&self) -> PaymentStatus {
        self.status_pembayaran
    }
}

/// Request body for `POST /room-bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoomBooking {
    pub kamar_id: EntityId,
    pub tanggal_check_in: NaiveDate,
    pub tanggal_check_out: NaiveDate,
    pub total_harga: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
}

impl NewRoomBooking {
    /// Price a stay at `nightly_rate` per night. Check-out must follow check-in.
    pub fn priced(
        kamar_id: EntityId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        nightly_rate: Decimal,
    ) -> Result<Self, StoreError> {
        let nights = (check_out - check_in).num_days();
        if nights < 1 {
            return Err(StoreError::Invalid {
                message: "Tanggal check-out harus setelah tanggal check-in".into(),
            });
        }
        Ok(Self {
            kamar_id,
            tanggal_check_in: check_in,
            tanggal_check_out: check_out,
            total_harga: nightly_rate * Decimal::from(nights),
            catatan: None,
        })
    }

    pub fn nights(&self) -> i64 {
        (self.tanggal_check_out - self.tanggal_check_in).num_days()
    }
}

// ── Facility booking ────────────────────────────────────────────────

/// A time-boxed facility reservation (`pemesanan_fasilitas`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityBooking {
    pub id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    pub fasilitas_id: EntityId,
    pub tanggal_pemesanan: String,
    pub waktu_mulai: String,
    pub waktu_selesai: String,
    pub jumlah_orang: u32,
    pub total_harga: Decimal,
    #[serde(default)]
    pub kode_pemesanan: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub status: FacilityBookingStatus,
    #[serde(default)]
    pub catatan: Option<String>,
    #[serde(default)]
    pub metode_pembayaran: Option<String>,
    #[serde(default)]
    pub status_pembayaran: PaymentStatus,
    #[serde(default)]
    pub fasilitas: Option<Facility>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Payable for FacilityBooking {
    type Status = FacilityBookingStatus;

    fn lifecycle(&self) -> FacilityBookingStatus {
        self.status
    }

    fn payment_status(&self) -> PaymentStatus {
        self.status_pembayaran
    }
}

/// Request body for `POST /facility-bookings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFacilityBooking {
    pub fasilitas_id: EntityId,
    pub tanggal_pemesanan: NaiveDate,
    #[serde(serialize_with = "hh_mm")]
    pub waktu_mulai: NaiveTime,
    #[serde(serialize_with = "hh_mm")]
    pub waktu_selesai: NaiveTime,
    pub jumlah_orang: u32,
    pub total_harga: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catatan: Option<String>,
}

impl NewFacilityBooking {
    /// Validate the time window and party size.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.waktu_selesai <= self.waktu_mulai {
            return Err(StoreError::Invalid {
                message: "Waktu selesai harus setelah waktu mulai".into(),
            });
        }
        if self.jumlah_orang == 0 {
            return Err(StoreError::Invalid {
                message: "Jumlah orang minimal 1".into(),
            });
        }
        Ok(())
    }
}

fn hh_mm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stay_is_priced_per_night() {
        let booking = NewRoomBooking::priced(
            EntityId::from("r-1"),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
            Decimal::from(450_000),
        )
        .unwrap();
        assert_eq!(booking.nights(), 3);
        assert_eq!(booking.total_harga, Decimal::from(1_350_000));
    }

    #[test]
    fn same_day_checkout_is_rejected() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let err = NewRoomBooking::priced(EntityId::from("r-1"), day, day, Decimal::ONE).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { .. }));
    }

    #[test]
    fn facility_times_serialize_as_hours_and_minutes() {
        let booking = NewFacilityBooking {
            fasilitas_id: EntityId::from("f-1"),
            tanggal_pemesanan: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
            waktu_mulai: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            waktu_selesai: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            jumlah_orang: 4,
            total_harga: Decimal::from(200_000),
            catatan: None,
        };
        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["waktu_mulai"], json!("09:00"));
        assert_eq!(value["waktu_selesai"], json!("11:30"));
        assert_eq!(value["tanggal_pemesanan"], json!("2025-07-02"));
        assert!(value.get("catatan").is_none());
    }

    #[test]
    fn booking_parses_minimal_payload() {
        let booking: RoomBooking = serde_json::from_value(json!({
            "id": "b-1",
            "kamar_id": "r-1",
            "tanggal_check_in": "2025-07-01",
            "tanggal_check_out": "2025-07-03",
            "total_harga": "900000.00",
            "status": "dikonfirmasi",
            "status_pembayaran": "belum_dibayar"
        }))
        .unwrap();
        assert!(booking.is_payable());
        assert!(!booking.is_cancellable());
    }
}
