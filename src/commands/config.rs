use anyhow::Result;

use crate::cli::{Cli, ConfigCommand};
use crate::commands::{config_path, load_config};
use crate::config::Config;

pub fn run(cli: &Cli, cmd: &ConfigCommand) -> Result<()> {
	let path = config_path(cli)?;

	match cmd {
		ConfigCommand::Init { force } => {
			if path.exists() && !force {
				anyhow::bail!("{} already exists, pass --force to overwrite", path.display());
			}
			Config::default().save(&path)?;
			println!("Wrote {}", path.display());
		}
		ConfigCommand::Show => {
			let config = load_config(cli)?;
			println!("# {}", path.display());
			print!("{}", config.redacted()?);
		}
	}
	Ok(())
}
