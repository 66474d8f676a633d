use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding::base64_bytes;
use crate::error::KeyError;

/// Signature scheme of a private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
	Bls,
	Secp256k1,
}

impl KeyType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Bls => "bls",
			Self::Secp256k1 => "secp256k1",
		}
	}
}

impl FromStr for KeyType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"bls" => Ok(Self::Bls),
			"secp256k1" | "secp" => Ok(Self::Secp256k1),
			other => Err(format!("key type {other:?} is not supported")),
		}
	}
}

/// A private key record as exported by Lotus: hex of
/// `{"Type":"bls","PrivateKey":"<base64>"}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
	#[serde(rename = "Type")]
	pub key_type: KeyType,

	#[serde(rename = "PrivateKey", with = "base64_bytes")]
	pub private_key: Vec<u8>,
}

impl KeyInfo {
	pub fn from_hex(record: &str) -> Result<Self, KeyError> {
		let raw = hex::decode(record.trim())?;
		Ok(serde_json::from_slice(&raw)?)
	}

	pub fn to_hex(&self) -> Result<String, KeyError> {
		Ok(hex::encode(serde_json::to_vec(self)?))
	}
}

// Never print key material.
impl fmt::Debug for KeyInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyInfo")
			.field("key_type", &self.key_type)
			.field("private_key", &format_args!("<{} bytes>", self.private_key.len()))
			.finish()
	}
}
