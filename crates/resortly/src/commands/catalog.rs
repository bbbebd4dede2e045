//! Room, facility and product browsing. No login needed.

use std::sync::Arc;

use tabled::Tabled;

use resortly_core::{Facility, Product, ProductCategory, Room, RoomType};

use crate::cli::{
    FacilitiesArgs, FacilitiesCommand, GlobalOpts, ProductsArgs, ProductsCommand, RoomsArgs,
    RoomsCommand,
};
use crate::error::CliError;
use crate::output::{self, rupiah};

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "No")]
    number: String,
    #[tabled(rename = "Tipe")]
    kind: String,
    #[tabled(rename = "Lantai")]
    floor: String,
    #[tabled(rename = "Per malam")]
    rate: String,
    #[tabled(rename = "Tersedia")]
    available: String,
}

impl From<&Arc<Room>> for RoomRow {
    fn from(r: &Arc<Room>) -> Self {
        Self {
            id: r.id.to_string(),
            number: r.no_kamar.clone(),
            kind: r
                .jenis_kamar
                .as_ref()
                .map(|t| t.nm_jenis_kamar.clone())
                .unwrap_or_default(),
            floor: r.lantai.clone().unwrap_or_default(),
            rate: r.nightly_rate().map(rupiah).unwrap_or_default(),
            available: yes_no(r.tersedia),
        }
    }
}

#[derive(Tabled)]
struct RoomTypeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tipe")]
    name: String,
    #[tabled(rename = "Kapasitas")]
    capacity: u32,
    #[tabled(rename = "Per malam")]
    rate: String,
}

impl From<&Arc<RoomType>> for RoomTypeRow {
    fn from(t: &Arc<RoomType>) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.nm_jenis_kamar.clone(),
            capacity: t.kapasitas,
            rate: rupiah(t.harga_per_malam),
        }
    }
}

#[derive(Tabled)]
struct FacilityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Fasilitas")]
    name: String,
    #[tabled(rename = "Harga")]
    price: String,
    #[tabled(rename = "Jam")]
    hours: String,
    #[tabled(rename = "Tersedia")]
    available: String,
}

impl From<&Arc<Facility>> for FacilityRow {
    fn from(f: &Arc<Facility>) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.nm_fasilitas.clone(),
            price: rupiah(f.harga),
            hours: hours(f),
            available: yes_no(f.tersedia),
        }
    }
}

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Produk")]
    name: String,
    #[tabled(rename = "Kategori")]
    category: String,
    #[tabled(rename = "Harga")]
    price: String,
    #[tabled(rename = "Stok")]
    stock: u32,
}

impl From<&Arc<Product>> for ProductRow {
    fn from(p: &Arc<Product>) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.nm_produk.clone(),
            category: p
                .kategori_produk
                .as_ref()
                .map(|c| c.nm_kategori_produk.clone())
                .unwrap_or_default(),
            price: rupiah(p.harga),
            stock: p.jumlah_stok,
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Kategori")]
    name: String,
    #[tabled(rename = "Deskripsi")]
    description: String,
}

impl From<&Arc<ProductCategory>> for CategoryRow {
    fn from(c: &Arc<ProductCategory>) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.nm_kategori_produk.clone(),
            description: c.deskripsi.clone().unwrap_or_default(),
        }
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "ya" } else { "tidak" }.into()
}

fn hours(f: &Facility) -> String {
    match (&f.jam_buka, &f.jam_tutup) {
        (Some(open), Some(close)) => format!("{open}-{close}"),
        _ => String::new(),
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn room_detail(r: &Arc<Room>) -> String {
    let mut lines = vec![
        format!("ID:        {}", r.id),
        format!("Kamar:     {}", r.no_kamar),
        format!("Lantai:    {}", util::or_dash(r.lantai.as_deref())),
        format!("Tersedia:  {}", yes_no(r.tersedia)),
    ];
    if let Some(ref t) = r.jenis_kamar {
        lines.push(format!("Tipe:      {}", t.nm_jenis_kamar));
        lines.push(format!("Kapasitas: {} orang", t.kapasitas));
        lines.push(format!("Per malam: {}", rupiah(t.harga_per_malam)));
        if let Some(ref d) = t.deskripsi {
            lines.push(format!("Deskripsi: {d}"));
        }
    }
    if let Some(img) = r.main_image() {
        lines.push(format!("Foto:      {}", img.jalur_gambar));
    }
    lines.join("\n")
}

fn facility_detail(f: &Arc<Facility>) -> String {
    let mut lines = vec![
        format!("ID:        {}", f.id),
        format!("Fasilitas: {}", f.nm_fasilitas),
        format!("Harga:     {}", rupiah(f.harga)),
        format!("Jam:       {}", hours(f)),
        format!("Tersedia:  {}", yes_no(f.tersedia)),
    ];
    if let Some(cap) = f.kapasitas {
        lines.push(format!("Kapasitas: {cap} orang"));
    }
    if let Some(ref d) = f.deskripsi {
        lines.push(format!("Deskripsi: {d}"));
    }
    lines.join("\n")
}

fn product_detail(p: &Arc<Product>) -> String {
    let mut lines = vec![
        format!("ID:        {}", p.id),
        format!("Produk:    {}", p.nm_produk),
        format!("Harga:     {}", rupiah(p.harga)),
        format!("Stok:      {}", p.jumlah_stok),
        format!("Bisa beli: {}", yes_no(p.in_stock())),
    ];
    if let Some(ref c) = p.kategori_produk {
        lines.push(format!("Kategori:  {}", c.nm_kategori_produk));
    }
    if let Some(ref d) = p.deskripsi {
        lines.push(format!("Deskripsi: {d}"));
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn rooms(ctx: &Ctx, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ctx.resort.rooms();
    match args.command {
        RoomsCommand::List { available } => {
            let bar = util::spinner("Memuat kamar", global);
            let rooms = store.fetch_rooms().await;
            util::finish(bar);
            let rooms: Vec<Arc<Room>> = rooms?
                .iter()
                .filter(|r| !available || r.tersedia)
                .cloned()
                .collect();
            let out = output::render_list(&global.output, &rooms, |x| RoomRow::from(x), |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Types => {
            let types = store.fetch_room_types().await?;
            let out = output::render_list(&global.output, &types, |x| RoomTypeRow::from(x), |t| {
                t.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Show { id } => {
            let room = store.get_room(&util::entity_id(&id)).await?;
            let out = output::render_single(&global.output, &room, room_detail, |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

pub async fn facilities(
    ctx: &Ctx,
    args: FacilitiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = ctx.resort.facilities();
    match args.command {
        FacilitiesCommand::List => {
            let bar = util::spinner("Memuat fasilitas", global);
            let list = store.fetch_facilities().await;
            util::finish(bar);
            let list = list?;
            let out = output::render_list(&global.output, &list, |x| FacilityRow::from(x), |f| {
                f.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FacilitiesCommand::Show { id } => {
            let facility = store.get_facility(&util::entity_id(&id)).await?;
            let out = output::render_single(&global.output, &facility, facility_detail, |f| {
                f.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

pub async fn products(ctx: &Ctx, args: ProductsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ctx.resort.products();
    match args.command {
        ProductsCommand::List { category } => {
            let bar = util::spinner("Memuat produk", global);
            let fetched = store.fetch_products().await;
            util::finish(bar);
            let list: Vec<Arc<Product>> = match category {
                Some(ref c) => {
                    fetched?;
                    store.in_category(&util::entity_id(c))
                }
                None => fetched?.iter().cloned().collect(),
            };
            let out = output::render_list(&global.output, &list, |x| ProductRow::from(x), |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Categories => {
            let list = store.fetch_categories().await?;
            let out = output::render_list(&global.output, &list, |x| CategoryRow::from(x), |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Show { id } => {
            let product = store.get_product(&util::entity_id(&id)).await?;
            let out = output::render_single(&global.output, &product, product_detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
