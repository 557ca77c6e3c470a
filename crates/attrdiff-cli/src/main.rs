//! `attrdiff`: attribute-tree accuracy comparison from the command line.
mod cli;
mod cmd;
mod error;
mod format;
mod io;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_tracing(cli: &Cli) {
    let default_directives = if cli.verbose {
        "attrdiff=debug,attrdiff_core=debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = cmd::dispatch(&cli) {
        tracing::debug!(code = err.exit_code(), "command failed");
        eprintln!("{}", err.message());
        std::process::exit(err.exit_code());
    }
}
