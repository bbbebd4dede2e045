//! Booking command handlers: rooms and facilities.

use std::sync::Arc;

use tabled::Tabled;

use resortly_core::{FacilityBooking, NewFacilityBooking, NewRoomBooking, RoomBooking};

use crate::cli::{BookingKind, BookingsArgs, BookingsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, paint, rupiah};

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomBookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kode")]
    code: String,
    #[tabled(rename = "Kamar")]
    room: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Check-out")]
    check_out: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Pembayaran")]
    payment: String,
}

impl RoomBookingRow {
    fn new(b: &Arc<RoomBooking>, color: bool) -> Self {
        Self {
            id: b.id.to_string(),
            code: b.kode_pemesanan.clone().unwrap_or_default(),
            room: b
                .kamar
                .as_ref()
                .map_or_else(|| b.kamar_id.short(), |k| k.no_kamar.clone()),
            check_in: b.tanggal_check_in.clone(),
            check_out: b.tanggal_check_out.clone(),
            total: rupiah(b.total_harga),
            status: paint(&b.status.to_string(), util::lifecycle_tone(b.status), color),
            payment: paint(
                &b.status_pembayaran.to_string(),
                util::payment_tone(b.status_pembayaran),
                color,
            ),
        }
    }
}

#[derive(Tabled)]
struct FacilityBookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kode")]
    code: String,
    #[tabled(rename = "Fasilitas")]
    facility: String,
    #[tabled(rename = "Tanggal")]
    date: String,
    #[tabled(rename = "Jam")]
    window: String,
    #[tabled(rename = "Orang")]
    people: u32,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Pembayaran")]
    payment: String,
}

impl FacilityBookingRow {
    fn new(b: &Arc<FacilityBooking>, color: bool) -> Self {
        Self {
            id: b.id.to_string(),
            code: b.kode_pemesanan.clone().unwrap_or_default(),
            facility: b
                .fasilitas
                .as_ref()
                .map_or_else(|| b.fasilitas_id.short(), |f| f.nm_fasilitas.clone()),
            date: b.tanggal_pemesanan.clone(),
            window: format!("{}-{}", b.waktu_mulai, b.waktu_selesai),
            people: b.jumlah_orang,
            total: rupiah(b.total_harga),
            status: paint(&b.status.to_string(), util::lifecycle_tone(b.status), color),
            payment: paint(
                &b.status_pembayaran.to_string(),
                util::payment_tone(b.status_pembayaran),
                color,
            ),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn room_detail(b: &Arc<RoomBooking>) -> String {
    let mut lines = vec![
        format!("ID:         {}", b.id),
        format!("Kode:       {}", util::or_dash(b.kode_pemesanan.as_deref())),
        format!("Kamar:      {}", b.kamar_id),
        format!("Check-in:   {}", b.tanggal_check_in),
        format!("Check-out:  {}", b.tanggal_check_out),
        format!("Total:      {}", rupiah(b.total_harga)),
        format!("Status:     {}", b.status),
        format!("Pembayaran: {}", b.status_pembayaran),
        format!("Metode:     {}", util::or_dash(b.metode_pembayaran.as_deref())),
        format!("Aksi:       {}", util::actions(b.as_ref())),
    ];
    if let Some(ref note) = b.catatan {
        lines.push(format!("Catatan:    {note}"));
    }
    for p in &b.pembayaran {
        lines.push(format!(
            "Bayar:      {} {} ({})",
            p.id,
            rupiah(p.jumlah),
            p.status
        ));
    }
    lines.join("\n")
}

fn facility_detail(b: &Arc<FacilityBooking>) -> String {
    let mut lines = vec![
        format!("ID:         {}", b.id),
        format!("Kode:       {}", util::or_dash(b.kode_pemesanan.as_deref())),
        format!("Fasilitas:  {}", b.fasilitas_id),
        format!("Tanggal:    {}", b.tanggal_pemesanan),
        format!("Jam:        {}-{}", b.waktu_mulai, b.waktu_selesai),
        format!("Orang:      {}", b.jumlah_orang),
        format!("Total:      {}", rupiah(b.total_harga)),
        format!("Status:     {}", b.status),
        format!("Pembayaran: {}", b.status_pembayaran),
        format!("Aksi:       {}", util::actions(b.as_ref())),
    ];
    if let Some(ref note) = b.catatan {
        lines.push(format!("Catatan:    {note}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(ctx: &Ctx, args: BookingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ctx.resort.bookings();
    let color = ctx.color;
    match args.command {
        BookingsCommand::List { kind } => {
            let bar = util::spinner("Memuat pemesanan", global);
            let out = match kind {
                BookingKind::Room => {
                    let list = store.fetch_room_bookings().await;
                    util::finish(bar);
                    output::render_list(
                        &global.output,
                        &list?,
                        |b| RoomBookingRow::new(b, color),
                        |b| b.id.to_string(),
                    )
                }
                BookingKind::Facility => {
                    let list = store.fetch_facility_bookings().await;
                    util::finish(bar);
                    output::render_list(
                        &global.output,
                        &list?,
                        |b| FacilityBookingRow::new(b, color),
                        |b| b.id.to_string(),
                    )
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Show { kind, id } => {
            let id = util::entity_id(&id);
            let out = match kind {
                BookingKind::Room => {
                    let booking = store.get_room_booking(&id).await?;
                    output::render_single(&global.output, &booking, room_detail, |b| {
                        b.id.to_string()
                    })
                }
                BookingKind::Facility => {
                    let booking = store.get_facility_booking(&id).await?;
                    output::render_single(&global.output, &booking, facility_detail, |b| {
                        b.id.to_string()
                    })
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::BookRoom {
            room,
            check_in,
            check_out,
            note,
        } => {
            let check_in = util::parse_date("check-in", &check_in)?;
            let check_out = util::parse_date("check-out", &check_out)?;
            let room_id = util::entity_id(&room);

            // The stay is priced from the room type's nightly rate.
            let room = ctx.resort.rooms().get_room(&room_id).await?;
            let rate = room.nightly_rate().ok_or_else(|| CliError::Validation {
                field: "room".into(),
                reason: "the room has no nightly rate".into(),
            })?;
            let mut body = NewRoomBooking::priced(room_id, check_in, check_out, rate)?;
            body.catatan = note;

            let booking = store.create_room_booking(&body).await?;
            util::done(
                &format!(
                    "Kamar dipesan untuk {} malam, total {}",
                    body.nights(),
                    rupiah(booking.total_harga)
                ),
                global,
            );
            let out = output::render_single(&global.output, &booking, room_detail, |b| {
                b.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::BookFacility {
            facility,
            date,
            start,
            end,
            people,
            note,
        } => {
            let facility_id = util::entity_id(&facility);
            let facility = ctx.resort.facilities().get_facility(&facility_id).await?;
            let body = NewFacilityBooking {
                fasilitas_id: facility_id,
                tanggal_pemesanan: util::parse_date("date", &date)?,
                waktu_mulai: util::parse_time("start", &start)?,
                waktu_selesai: util::parse_time("end", &end)?,
                jumlah_orang: people,
                total_harga: facility.harga,
                catatan: note,
            };

            let booking = store.create_facility_booking(&body).await?;
            util::done("Fasilitas dipesan", global);
            let out = output::render_single(&global.output, &booking, facility_detail, |b| {
                b.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Cancel { kind, id } => {
            let entity = util::entity_id(&id);
            match kind {
                BookingKind::Room => {
                    util::ensure_cancellable(&*store.get_room_booking(&entity).await?)?;
                }
                BookingKind::Facility => {
                    util::ensure_cancellable(&*store.get_facility_booking(&entity).await?)?;
                }
            }
            if !util::confirm(&format!("Batalkan pemesanan {id}?"), global)? {
                return Ok(());
            }
            match kind {
                BookingKind::Room => store.cancel_room_booking(&entity).await?,
                BookingKind::Facility => store.cancel_facility_booking(&entity).await?,
            }
            util::done("Pemesanan dibatalkan", global);
            Ok(())
        }

        BookingsCommand::Settle { kind, id, method } => {
            let id = util::entity_id(&id);
            let out = match kind {
                BookingKind::Room => {
                    util::ensure_payable(&*store.get_room_booking(&id).await?)?;
                    let booking = store.pay_room_booking(&id, &method).await?;
                    output::render_single(&global.output, &booking, room_detail, |b| {
                        b.id.to_string()
                    })
                }
                BookingKind::Facility => {
                    util::ensure_payable(&*store.get_facility_booking(&id).await?)?;
                    let booking = store.pay_facility_booking(&id, &method).await?;
                    output::render_single(&global.output, &booking, facility_detail, |b| {
                        b.id.to_string()
                    })
                }
            };
            util::done("Pembayaran dicatat", global);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
