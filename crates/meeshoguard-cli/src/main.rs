//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use meeshoguard_cli::{Cli, CliError, Commands, handlers, resolve_settings};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = cli.config.as_deref();
    match command {
        Commands::Simulate(args) => {
            let settings = resolve_settings(config, &args.overrides)?;
            handlers::simulate::execute(settings, &args).await?;
        }
        Commands::Settings { overrides } => {
            let settings = resolve_settings(config, &overrides)?;
            handlers::settings::execute(&settings)?;
        }
    }

    Ok(())
}
