pub mod config;
pub mod key;
pub mod miner;
pub mod msig;
pub mod transfer;

use std::path::PathBuf;

use anyhow::Result;

use crate::address;
use crate::cli::Cli;
use crate::config::Config;
use crate::engine::{Engine, Outcome, Route};
use crate::progress::{LogProgress, Progress, TermProgress};
use crate::rpc::LotusClient;

/// Config path from the CLI flag, or the default location.
pub fn config_path(cli: &Cli) -> Result<PathBuf> {
	match &cli.config {
		Some(path) => Ok(path.clone()),
		None => Config::default_path(),
	}
}

/// Load config and apply CLI overrides.
pub fn load_config(cli: &Cli) -> Result<Config> {
	let mut config = Config::load(&config_path(cli)?)?;
	if let Some(endpoint) = &cli.endpoint {
		config.endpoint = endpoint.clone();
	}
	if let Some(network) = cli.network {
		config.network = network.into();
	}
	Ok(config)
}

/// Build the engine for this invocation. Does not contact the node.
pub fn build_engine(cli: &Cli) -> Result<Engine> {
	let config = load_config(cli)?;
	address::set_network(config.network);
	let settings = config.settings()?;
	let gateway = LotusClient::new(&config.endpoint, &config.api_token)?;
	log::debug!("using node {}", gateway.endpoint());
	Ok(Engine::new(Box::new(gateway), settings))
}

pub fn progress(cli: &Cli) -> Box<dyn Progress> {
	if cli.quiet {
		Box::new(LogProgress)
	} else {
		Box::new(TermProgress::new())
	}
}

pub fn route(msig: Option<&str>) -> Result<Route> {
	Ok(Route::from_option(msig)?)
}

pub fn print_outcome(outcome: &Outcome) {
	match outcome {
		Outcome::Executed { cid, ret } => {
			println!("Message:  {cid}");
			if !ret.is_empty() {
				println!("Return:   {ret:?}");
			}
		}
		Outcome::Proposed(p) => {
			println!("Proposed: {}", p.msig);
			println!("Txn ID:   {}", p.txn_id);
		}
	}
}
