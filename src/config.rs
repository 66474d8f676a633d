use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::address::Network;
use crate::engine::Settings;
use crate::token::TokenAmount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Lotus JSON-RPC endpoint.
	pub endpoint: String,
	pub api_token: String,
	/// Base64 of the 32-byte key used by `key encrypt` / `key decrypt`.
	/// Empty disables them.
	pub aes_key: String,
	/// Max fee per message, in FIL.
	pub max_fee: String,
	/// Gas fee cap, in attoFIL.
	pub gas_fee_cap: String,
	pub confidence: u64,
	pub network: Network,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			endpoint: "http://127.0.0.1:1234/rpc/v0".into(),
			api_token: String::new(),
			aes_key: String::new(),
			max_fee: "0.07".into(),
			gas_fee_cap: "1000000000".into(),
			confidence: 5,
			network: Network::Mainnet,
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.filmsig/).
	pub fn dir() -> anyhow::Result<PathBuf> {
		dirs::home_dir()
			.map(|home| home.join(".filmsig"))
			.ok_or_else(|| anyhow!("could not determine home directory"))
	}

	/// Default path to the config file.
	pub fn default_path() -> anyhow::Result<PathBuf> {
		Ok(Self::dir()?.join("config.toml"))
	}

	/// Load config from `path`, falling back to defaults if no file exists.
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		if path.exists() {
			let content = std::fs::read_to_string(path)
				.with_context(|| format!("reading {}", path.display()))?;
			toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
		} else {
			log::debug!("{} not found, using defaults", path.display());
			Ok(Self::default())
		}
	}

	/// Persist to `path`, creating the directory if needed.
	pub fn save(&self, path: &Path) -> anyhow::Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, toml::to_string_pretty(self)?)?;
		Ok(())
	}

	/// Validate the string fields into engine settings.
	pub fn settings(&self) -> anyhow::Result<Settings> {
		let max_fee = TokenAmount::parse_fil(&self.max_fee).context("invalid max_fee")?;
		let gas_fee_cap = TokenAmount::parse_atto(&self.gas_fee_cap).context("invalid gas_fee_cap")?;
		Ok(Settings {
			max_fee,
			gas_fee_cap,
			confidence: self.confidence,
			aes_key: self.aes_key()?,
		})
	}

	fn aes_key(&self) -> anyhow::Result<Option<[u8; 32]>> {
		let encoded = self.aes_key.trim();
		if encoded.is_empty() {
			return Ok(None);
		}
		let raw = STANDARD.decode(encoded).context("aes_key is not valid base64")?;
		match <[u8; 32]>::try_from(raw.as_slice()) {
			Ok(key) => Ok(Some(key)),
			Err(_) => bail!("aes_key must decode to 32 bytes, got {}", raw.len()),
		}
	}

	/// The config as TOML with the API token masked.
	pub fn redacted(&self) -> anyhow::Result<String> {
		let mut shown = self.clone();
		if !shown.api_token.is_empty() {
			shown.api_token = "********".into();
		}
		if !shown.aes_key.is_empty() {
			shown.aes_key = "********".into();
		}
		Ok(toml::to_string_pretty(&shown)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sensible() {
		let c = Config::default();
		assert_eq!(c.endpoint, "http://127.0.0.1:1234/rpc/v0");
		assert_eq!(c.confidence, 5);
		assert_eq!(c.network, Network::Mainnet);

		let s = c.settings().unwrap();
		assert_eq!(s.max_fee, TokenAmount::from_atto(70_000_000_000_000_000u64));
		assert_eq!(s.gas_fee_cap, TokenAmount::from_atto(1_000_000_000u64));
		assert!(s.aes_key.is_none());
	}

	#[test]
	fn toml_roundtrip() {
		let mut c = Config::default();
		c.api_token = "Bearer abc".into();
		c.network = Network::Testnet;

		let serialized = toml::to_string_pretty(&c).unwrap();
		let parsed: Config = toml::from_str(&serialized).unwrap();
		assert_eq!(parsed, c);
	}

	#[test]
	fn missing_fields_take_defaults() {
		let c: Config = toml::from_str("confidence = 1\n").unwrap();
		assert_eq!(c.confidence, 1);
		assert_eq!(c.max_fee, "0.07");
	}

	#[test]
	fn aes_key_must_be_32_bytes() {
		let mut c = Config::default();
		c.aes_key = STANDARD.encode([7u8; 32]);
		assert_eq!(c.settings().unwrap().aes_key, Some([7u8; 32]));

		c.aes_key = STANDARD.encode([7u8; 16]);
		assert!(c.settings().is_err());

		c.aes_key = "%%%".into();
		assert!(c.settings().is_err());
	}

	#[test]
	fn redacted_hides_secrets() {
		let mut c = Config::default();
		c.api_token = "secret-token".into();
		let shown = c.redacted().unwrap();
		assert!(!shown.contains("secret-token"));
		assert!(shown.contains("********"));
	}

	#[test]
	fn load_missing_file_gives_defaults() {
		let path = std::env::temp_dir().join("filmsig-does-not-exist").join("config.toml");
		assert_eq!(Config::load(&path).unwrap(), Config::default());
	}
}
