mod cli;
mod commands;
mod config;
mod error;
mod output;
mod presenter;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use resortly_config::FileTokenStore;
use resortly_core::Resort;

use crate::cli::{Cli, Command};
use crate::commands::Ctx;
use crate::error::CliError;
use crate::presenter::TerminalPresenter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need an API session
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "resortly", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let ctx = connect(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &ctx, &cli.global).await
        }
    }
}

/// Build a `Resort` from the config file, profile, and CLI overrides.
fn connect(global: &cli::GlobalOpts) -> Result<Ctx, CliError> {
    let cfg = config::load_config_or_default();
    let (profile_name, profile) = config::active_profile(global, &cfg)?;
    let client_config = config::client_config(&profile, &cfg)?;

    let tokens = Arc::new(FileTokenStore::for_profile(&profile_name));
    let color = output::should_color(&global.color);
    let presenter = Arc::new(TerminalPresenter::new(color));
    let resort = Resort::with_snap(client_config, tokens, presenter).map_err(|e| {
        CliError::Connection {
            message: e.to_string(),
        }
    })?;

    Ok(Ctx {
        resort,
        profile_name,
        profile,
        color,
    })
}
