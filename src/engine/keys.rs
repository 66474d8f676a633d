use super::{required, Account, Engine};
use crate::address::Address;
use crate::crypto::KeyCodec;
use crate::error::EngineError;
use crate::keyinfo::{KeyInfo, KeyType};
use crate::signer;

/// A hex key record together with the address it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
	pub address: Address,
	pub record: String,
}

impl Engine {
	fn codec(&self) -> Result<&KeyCodec, EngineError> {
		self.codec.as_ref().ok_or(EngineError::KeyCodecDisabled)
	}

	/// Create a fresh random key of the given type.
	pub fn generate_key(&self, key_type: &str) -> Result<KeyRecord, EngineError> {
		let _gate = self.acquire()?;
		let key_type: KeyType = required("key type", key_type)?
			.parse()
			.map_err(|e: String| EngineError::invalid("key type", key_type, e))?;

		let signer = signer::for_key_type(key_type);
		let key = KeyInfo {
			key_type,
			private_key: signer.generate_key()?,
		};
		let address = signer.to_address(&key.private_key)?;
		log::info!("generated {} key for {address}", key_type.as_str());
		Ok(KeyRecord {
			address,
			record: key.to_hex()?,
		})
	}

	/// Encrypt a raw key record. The address is derived from the raw key
	/// so the operator can tell which account the result belongs to.
	pub fn encrypt_key(&self, key: &str) -> Result<KeyRecord, EngineError> {
		let _gate = self.acquire()?;
		let codec = self.codec()?;
		let account = Account::open(key)?;
		let encrypted = codec.encrypt(&account.key)?;
		Ok(KeyRecord {
			address: account.address,
			record: encrypted.to_hex()?,
		})
	}

	/// Inverse of [`Engine::encrypt_key`]; the address is derived from the
	/// recovered raw key.
	pub fn decrypt_key(&self, key: &str) -> Result<KeyRecord, EngineError> {
		let _gate = self.acquire()?;
		let codec = self.codec()?;
		let encrypted = KeyInfo::from_hex(required("key", key)?)?;
		let raw = codec.decrypt(&encrypted)?;
		let address = signer::for_key_type(raw.key_type).to_address(&raw.private_key)?;
		Ok(KeyRecord {
			address,
			record: raw.to_hex()?,
		})
	}

	/// Sign arbitrary hex-encoded bytes. The result is hex of the
	/// signature type byte followed by the signature.
	pub fn sign_raw(&self, key: &str, msg_hex: &str) -> Result<String, EngineError> {
		let _gate = self.acquire()?;
		let msg = hex::decode(msg_hex.trim().trim_start_matches("0x"))
			.map_err(|e| EngineError::invalid("message", msg_hex, e))?;
		let account = Account::open(key)?;

		let sig = account.signer.sign(&account.key.private_key, &msg)?;
		let mut out = Vec::with_capacity(sig.len() + 1);
		out.push(account.signer.sig_type() as u8);
		out.extend_from_slice(&sig);
		Ok(hex::encode(out))
	}

	/// The address a key record controls.
	pub fn address_of(&self, key: &str) -> Result<Address, EngineError> {
		let _gate = self.acquire()?;
		Ok(Account::open(key)?.address)
	}
}
