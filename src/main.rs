use anyhow::Result;
use clap::Parser;

use filmsig::cli::{Cli, Command};
use filmsig::commands;
use filmsig::error::EngineError;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	let result = match &cli.command {
		Command::Key { command } => commands::key::run(&cli, command).await,
		Command::Send { key, to, amount, msig } => {
			commands::transfer::run(&cli, key, to, amount, msig.as_deref()).await
		}
		Command::Miner { command } => commands::miner::run(&cli, command).await,
		Command::Msig { command } => commands::msig::run(&cli, command).await,
		Command::Config { command } => commands::config::run(&cli, command),
	};

	if let Some(err) = result.as_ref().err().and_then(|e| e.downcast_ref::<EngineError>()) {
		if err.was_submitted() {
			eprintln!("note: the message reached the pool; its nonce and fee are spent");
		}
	}
	result
}

/// RUST_LOG wins; otherwise -v / -vv raise the default level.
fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
		.format_timestamp(None)
		.init();
}
