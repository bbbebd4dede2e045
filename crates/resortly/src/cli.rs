//! Clap derive structures for the `resortly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Kept free of crate-internal imports so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// resortly -- book rooms and facilities, shop, and pay from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "resortly",
    version,
    about = "Book resort rooms and facilities, order from the shop, and pay",
    long_about = "Command-line client for the resort customer API.\n\n\
        Browse rooms, facilities and products, manage bookings, the cart and\n\
        orders, and pay through the Midtrans checkout page.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "RESORTLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API server root (overrides profile)
    #[arg(long, env = "RESORTLY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RESORTLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "RESORTLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in, log out, and show the signed-in account
    Auth(AuthArgs),

    /// Browse rooms and room types
    #[command(alias = "kamar")]
    Rooms(RoomsArgs),

    /// Browse facilities
    #[command(alias = "fasilitas")]
    Facilities(FacilitiesArgs),

    /// Browse shop products
    #[command(alias = "produk")]
    Products(ProductsArgs),

    /// Manage the shopping cart
    #[command(alias = "keranjang")]
    Cart(CartArgs),

    /// Manage room and facility bookings
    #[command(alias = "b")]
    Bookings(BookingsArgs),

    /// Manage shop orders
    #[command(alias = "pesanan")]
    Orders(OrdersArgs),

    /// Pay for a booking or order through Midtrans
    Pay(PayArgs),

    /// View and edit the customer profile
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Types ─────────────────────────────────────────────────────

/// Which booking table a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BookingKind {
    /// Room stays
    Room,
    /// Facility reservations
    Facility,
}

/// What a payment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayTarget {
    /// A room booking
    Room,
    /// A facility booking
    Facility,
    /// A shop order
    Order,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and keep the session for 7 days
    Login {
        /// Account email (defaults to the profile's email)
        #[arg(long, env = "RESORTLY_EMAIL")]
        email: Option<String>,

        /// Store the password in the system keyring after a successful login
        #[arg(long)]
        remember: bool,
    },

    /// End the session
    Logout,

    /// Show the signed-in account
    Whoami,
}

// ── Catalog ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List rooms
    #[command(alias = "ls")]
    List {
        /// Only rooms currently available
        #[arg(long)]
        available: bool,
    },

    /// List room types and nightly rates
    Types,

    /// Show one room
    Show {
        /// Room ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct FacilitiesArgs {
    #[command(subcommand)]
    pub command: FacilitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FacilitiesCommand {
    /// List facilities
    #[command(alias = "ls")]
    List,

    /// Show one facility
    Show {
        /// Facility ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        /// Only products of this category ID
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// List product categories
    Categories,

    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

// ── Cart ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart and its total
    Show,

    /// Add a product to the cart
    Add {
        /// Product ID
        product: String,

        /// Quantity
        #[arg(long, short = 'n', default_value = "1")]
        qty: u32,
    },

    /// Change the quantity of a cart line
    Update {
        /// Cart line ID
        id: String,

        /// New quantity
        qty: u32,
    },

    /// Remove a cart line
    #[command(alias = "rm")]
    Remove {
        /// Cart line ID
        id: String,
    },

    /// Empty the cart
    Clear,
}

// ── Bookings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List bookings
    #[command(alias = "ls")]
    List {
        /// Booking type
        #[arg(long, short = 'k', value_enum, default_value = "room")]
        kind: BookingKind,
    },

    /// Show one booking
    Show {
        /// Booking type
        #[arg(value_enum)]
        kind: BookingKind,

        /// Booking ID
        id: String,
    },

    /// Book a room for a stay
    BookRoom {
        /// Room ID
        #[arg(long)]
        room: String,

        /// Check-in date (YYYY-MM-DD)
        #[arg(long)]
        check_in: String,

        /// Check-out date (YYYY-MM-DD)
        #[arg(long)]
        check_out: String,

        /// Note for the front desk
        #[arg(long)]
        note: Option<String>,
    },

    /// Reserve a facility for a time window
    BookFacility {
        /// Facility ID
        #[arg(long)]
        facility: String,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(long)]
        start: String,

        /// End time (HH:MM)
        #[arg(long)]
        end: String,

        /// Number of people
        #[arg(long, default_value = "1")]
        people: u32,

        /// Note for the staff
        #[arg(long)]
        note: Option<String>,
    },

    /// Cancel an unpaid booking
    Cancel {
        /// Booking type
        #[arg(value_enum)]
        kind: BookingKind,

        /// Booking ID
        id: String,
    },

    /// Record a payment made outside the checkout page (e.g. bank transfer)
    Settle {
        /// Booking type
        #[arg(value_enum)]
        kind: BookingKind,

        /// Booking ID
        id: String,

        /// Payment method name sent to the server
        #[arg(long, default_value = "transfer")]
        method: String,
    },
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders
    #[command(alias = "ls")]
    List,

    /// Show one order with its items
    Show {
        /// Order ID
        id: String,
    },

    /// Cancel an unpaid order
    Cancel {
        /// Order ID
        id: String,
    },

    /// Turn the cart into an order
    Checkout,

    /// Check whether the account may place shop orders
    Eligibility,
}

// ── Pay ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PayArgs {
    #[command(subcommand)]
    pub command: PayCommand,
}

#[derive(Debug, Subcommand)]
pub enum PayCommand {
    /// Open the checkout page for a booking or order
    Start {
        /// What to pay for
        #[arg(value_enum)]
        target: PayTarget,

        /// Booking or order ID
        id: String,

        /// Continue a payment that was already started
        #[arg(long)]
        resume: bool,
    },

    /// Show the settlement status of a payment
    Status {
        /// Payment ID
        id: String,
    },
}

// ── Profile ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the profile
    Show,

    /// Update profile fields; omitted fields keep their current value
    Update {
        /// Account display name
        #[arg(long)]
        name: Option<String>,

        /// Account email
        #[arg(long)]
        email: Option<String>,

        /// Customer name on bookings
        #[arg(long)]
        customer_name: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Address
        #[arg(long)]
        address: Option<String>,
    },

    /// Change the password (prompts for the values)
    Password,

    /// Upload a profile photo
    Photo {
        /// Image file
        path: PathBuf,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup of a profile
    Init,

    /// Show the resolved configuration of the active profile
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Set one key of the active profile
    Set {
        /// Key name
        #[arg(value_enum)]
        key: ConfigKey,

        /// New value
        value: String,
    },

    /// Store the login password in the system keyring
    SetPassword,
}

/// Editable profile keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    ApiUrl,
    Email,
    MidtransClientKey,
    MidtransProduction,
    MapToken,
    Timeout,
    CancelRefresh,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
