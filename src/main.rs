use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

mod cli;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::ServerError;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ServerError::AddrInUse { port }) => {
            logger::log_port_in_use(port);
            ExitCode::FAILURE
        }
        Err(e) => {
            logger::log_start_failed(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> error::Result<()> {
    let cfg = config::Config::load(&cli.overrides())?;
    let state = Arc::new(config::AppState::new(cfg)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(server::run(state))
}
