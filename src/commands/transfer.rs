use anyhow::Result;

use crate::cli::{Cli, KeyArg};
use crate::commands::{build_engine, print_outcome, progress, route};

pub async fn run(cli: &Cli, key: &KeyArg, to: &str, amount: &str, msig: Option<&str>) -> Result<()> {
	let engine = build_engine(cli)?;
	let route = route(msig)?;
	let progress = progress(cli);

	let outcome = engine
		.send(&key.key, to, amount, &route, progress.as_ref())
		.await?;
	print_outcome(&outcome);

	engine.close();
	Ok(())
}
