//! Command dispatch: bridges CLI args -> store calls -> output formatting.

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod config_cmd;
pub mod orders;
pub mod pay;
pub mod profile;
pub mod util;

use resortly_core::Resort;

use crate::cli::{Command, GlobalOpts};
use crate::config::Profile;
use crate::error::CliError;

/// Everything a handler needs besides its own arguments.
pub struct Ctx {
    pub resort: Resort,
    pub profile_name: String,
    pub profile: Profile,
    pub color: bool,
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx, global: &GlobalOpts) -> Result<(), CliError> {
    let result = match cmd {
        Command::Auth(args) => auth::handle(ctx, args, global).await,
        Command::Rooms(args) => catalog::rooms(ctx, args, global).await,
        Command::Facilities(args) => catalog::facilities(ctx, args, global).await,
        Command::Products(args) => catalog::products(ctx, args, global).await,
        Command::Cart(args) => cart::handle(ctx, args, global).await,
        Command::Bookings(args) => bookings::handle(ctx, args, global).await,
        Command::Orders(args) => orders::handle(ctx, args, global).await,
        Command::Pay(args) => pay::handle(ctx, args, global).await,
        Command::Profile(args) => profile::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    };

    // Point the login hint at the profile actually in use.
    result.map_err(|e| match e {
        CliError::AuthRequired { .. } => CliError::AuthRequired {
            profile: ctx.profile_name.clone(),
        },
        other => other,
    })
}
