use anyhow::Result;

use crate::cli::{Cli, KeyCommand};
use crate::commands::build_engine;

pub async fn run(cli: &Cli, cmd: &KeyCommand) -> Result<()> {
	let engine = build_engine(cli)?;

	match cmd {
		KeyCommand::New { key_type } => {
			let generated = engine.generate_key(key_type.as_str())?;
			println!("Address: {}", generated.address);
			println!("Key:     {}", generated.record);
		}
		KeyCommand::Address { key } => {
			println!("{}", engine.address_of(&key.key)?);
		}
		KeyCommand::Encrypt { key } => {
			let encrypted = engine.encrypt_key(&key.key)?;
			println!("Address: {}", encrypted.address);
			println!("Key:     {}", encrypted.record);
		}
		KeyCommand::Decrypt { key } => {
			let decrypted = engine.decrypt_key(&key.key)?;
			println!("Address: {}", decrypted.address);
			println!("Key:     {}", decrypted.record);
		}
		KeyCommand::Sign { key, message } => {
			println!("{}", engine.sign_raw(&key.key, message)?);
		}
	}

	engine.close();
	Ok(())
}
