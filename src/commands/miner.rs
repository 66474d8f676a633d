use anyhow::Result;

use crate::cli::{Cli, MinerCommand};
use crate::commands::{build_engine, print_outcome, progress, route};

pub async fn run(cli: &Cli, cmd: &MinerCommand) -> Result<()> {
	let engine = build_engine(cli)?;
	let progress = progress(cli);
	let progress = progress.as_ref();

	let outcome = match cmd {
		MinerCommand::ProposeOwner { key, miner, new_owner, msig } => {
			let route = route(msig.as_deref())?;
			engine
				.propose_change_owner(&key.key, miner, new_owner, &route, progress)
				.await?
		}
		MinerCommand::ConfirmOwner { key, miner, msig } => {
			let route = route(msig.as_deref())?;
			engine
				.confirm_change_owner(&key.key, miner, &route, progress)
				.await?
		}
		MinerCommand::Withdraw { key, miner, amount, msig } => {
			let route = route(msig.as_deref())?;
			engine
				.withdraw(&key.key, miner, amount, &route, progress)
				.await?
		}
		MinerCommand::ChangeWorker {
			key,
			miner,
			new_worker,
			controls,
			msig,
		} => {
			let route = route(msig.as_deref())?;
			engine
				.propose_change_worker(&key.key, miner, new_worker, controls, &route, progress)
				.await?
		}
		MinerCommand::ConfirmWorker { key, miner, msig } => {
			let route = route(msig.as_deref())?;
			engine
				.confirm_change_worker(&key.key, miner, &route, progress)
				.await?
		}
	};
	print_outcome(&outcome);

	engine.close();
	Ok(())
}
