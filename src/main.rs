mod abort;
mod api;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod output;
mod store;
mod types;
mod validation;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands};
use client::UsersClient;
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let verbose = std::env::args().any(|arg| arg == "--verbose" || arg == "-v");
    init_tracing(verbose);

    if let Err(e) = run().await {
        if e.is_cancelled() {
            eprintln!("Cancelled");
            std::process::exit(130);
        }

        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "users=debug" } else { "users=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global output format
    output::set_format(cli.output_format());
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't talk to the API
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "users", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run()?;
        }
        command => {
            let config = Config::load()?;
            let base_url = config.resolve_base_url(cli.base_url.as_deref());
            let client = UsersClient::new(&base_url, config.timeout()?)?;
            debug!(url = %client.base_url(), "using users API");

            match command {
                Commands::List => commands::list::run(client).await?,
                Commands::Delete { id } => commands::delete::run(client, id).await?,
                Commands::Create(args) => commands::create::run(client, args).await?,
                Commands::Shell => commands::shell::run(client).await?,
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
