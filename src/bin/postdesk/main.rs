//! postdesk: session-gated admin console for marketplace listings.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;
mod shell;


use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli, credentials_from_cli, optional_credentials};
use handlers::{health, posts};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    if let Some(Commands::Posts(args)) = &cli.command {
        posts::preflight(&args.action)?;
    }
    let ctx = build_ctx_from_cli(&cli)?;

    match &cli.command {
        None | Some(Commands::Shell) => shell::run(&ctx, optional_credentials(&cli)?).await?,
        Some(Commands::Posts(args)) => {
            let credentials = credentials_from_cli(&cli)?;
            posts::handle(&ctx, &credentials, &args.action).await?;
        }
        Some(Commands::Health) => health::handle(&ctx).await?,
    }

    Ok(())
}
