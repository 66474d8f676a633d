//! Filecoin addresses.
//!
//! An address is a protocol byte plus a payload:
//!
//! | protocol | payload |
//! |---|---|
//! | 0 ID | uvarint actor id |
//! | 1 secp256k1 | blake2b-160 of the uncompressed public key |
//! | 2 actor | blake2b-160 of the actor's creation data |
//! | 3 BLS | 48-byte compressed public key |
//!
//! The string form is `<network><protocol><body>`, where the body is the
//! decimal id for ID addresses and otherwise the lowercase unpadded base32
//! of `payload || checksum`.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use data_encoding::BASE32_NOPAD;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::crypto;
use crate::error::AddressError;

pub const PAYLOAD_HASH_LEN: usize = 20;
pub const BLS_PUB_LEN: usize = 48;
pub const SECP_PUB_LEN: usize = 65;
const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	Mainnet,
	Testnet,
}

impl Network {
	fn prefix(self) -> char {
		match self {
			Self::Mainnet => 'f',
			Self::Testnet => 't',
		}
	}
}

static NETWORK: AtomicU8 = AtomicU8::new(0);

/// Choose the prefix addresses are printed with. Parsing accepts both.
pub fn set_network(network: Network) {
	NETWORK.store(network as u8, Ordering::Relaxed);
}

pub fn current_network() -> Network {
	match NETWORK.load(Ordering::Relaxed) {
		0 => Network::Mainnet,
		_ => Network::Testnet,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
	Id = 0,
	Secp256k1 = 1,
	Actor = 2,
	Bls = 3,
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum Payload {
	Id(u64),
	Secp256k1([u8; PAYLOAD_HASH_LEN]),
	Actor([u8; PAYLOAD_HASH_LEN]),
	Bls([u8; BLS_PUB_LEN]),
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address(Payload);

impl Address {
	pub const fn new_id(id: u64) -> Self {
		Self(Payload::Id(id))
	}

	/// Address of a secp256k1 key, from its 65-byte uncompressed public key.
	pub fn new_secp256k1(pubkey: &[u8]) -> Result<Self, AddressError> {
		if pubkey.len() != SECP_PUB_LEN {
			return Err(AddressError::InvalidPayload(format!(
				"secp256k1 public key must be {SECP_PUB_LEN} bytes, got {}",
				pubkey.len()
			)));
		}
		Ok(Self(Payload::Secp256k1(crypto::blake2b_160(pubkey))))
	}

	pub fn new_actor(data: &[u8]) -> Self {
		Self(Payload::Actor(crypto::blake2b_160(data)))
	}

	pub fn new_bls(pubkey: &[u8]) -> Result<Self, AddressError> {
		let key: [u8; BLS_PUB_LEN] = pubkey.try_into().map_err(|_| {
			AddressError::InvalidPayload(format!(
				"bls public key must be {BLS_PUB_LEN} bytes, got {}",
				pubkey.len()
			))
		})?;
		Ok(Self(Payload::Bls(key)))
	}

	pub fn protocol(&self) -> Protocol {
		match self.0 {
			Payload::Id(_) => Protocol::Id,
			Payload::Secp256k1(_) => Protocol::Secp256k1,
			Payload::Actor(_) => Protocol::Actor,
			Payload::Bls(_) => Protocol::Bls,
		}
	}

	/// The actor id, for ID addresses.
	pub fn id(&self) -> Option<u64> {
		match self.0 {
			Payload::Id(id) => Some(id),
			_ => None,
		}
	}

	pub fn is_id(&self) -> bool {
		self.id().is_some()
	}

	pub fn payload_bytes(&self) -> Vec<u8> {
		match &self.0 {
			Payload::Id(id) => {
				let mut buf = unsigned_varint::encode::u64_buffer();
				unsigned_varint::encode::u64(*id, &mut buf).to_vec()
			}
			Payload::Secp256k1(h) | Payload::Actor(h) => h.to_vec(),
			Payload::Bls(k) => k.to_vec(),
		}
	}

	/// Byte form: protocol byte followed by the payload.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = vec![self.protocol() as u8];
		out.extend(self.payload_bytes());
		out
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
		let (&proto, payload) = bytes
			.split_first()
			.ok_or_else(|| AddressError::InvalidPayload("empty address bytes".into()))?;
		match proto {
			0 => {
				let (id, rest) = unsigned_varint::decode::u64(payload)
					.map_err(|e| AddressError::InvalidPayload(e.to_string()))?;
				if !rest.is_empty() {
					return Err(AddressError::InvalidPayload(
						"trailing bytes after actor id".into(),
					));
				}
				Ok(Self::new_id(id))
			}
			1 => Ok(Self(Payload::Secp256k1(hash_payload(payload)?))),
			2 => Ok(Self(Payload::Actor(hash_payload(payload)?))),
			3 => Self::new_bls(payload),
			other => Err(AddressError::UnknownProtocol(other)),
		}
	}

	fn checksum(&self) -> [u8; CHECKSUM_LEN] {
		crypto::checksum(&self.to_bytes())
	}
}

fn hash_payload(payload: &[u8]) -> Result<[u8; PAYLOAD_HASH_LEN], AddressError> {
	payload.try_into().map_err(|_| {
		AddressError::InvalidPayload(format!(
			"payload must be {PAYLOAD_HASH_LEN} bytes, got {}",
			payload.len()
		))
	})
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let prefix = current_network().prefix();
		let proto = self.protocol() as u8;
		match &self.0 {
			Payload::Id(id) => write!(f, "{prefix}{proto}{id}"),
			_ => {
				let mut body = self.payload_bytes();
				body.extend_from_slice(&self.checksum());
				let encoded = BASE32_NOPAD.encode(&body).to_ascii_lowercase();
				write!(f, "{prefix}{proto}{encoded}")
			}
		}
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

impl FromStr for Address {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.len() < 3 {
			return Err(AddressError::TooShort(s.to_owned()));
		}
		if !s.is_ascii() {
			return Err(AddressError::InvalidPayload(format!("non-ascii address {s:?}")));
		}
		if !s.starts_with(['f', 't']) {
			return Err(AddressError::UnknownNetwork(s.to_owned()));
		}

		let proto = s.as_bytes()[1];
		let body = &s[2..];
		match proto {
			b'0' => {
				if body.len() > 20 || !body.bytes().all(|b| b.is_ascii_digit()) {
					return Err(AddressError::InvalidPayload(format!("bad actor id {body:?}")));
				}
				let id = body
					.parse()
					.map_err(|_| AddressError::InvalidPayload(format!("bad actor id {body:?}")))?;
				Ok(Self::new_id(id))
			}
			b'1' | b'2' | b'3' => {
				let raw = BASE32_NOPAD
					.decode(body.to_ascii_uppercase().as_bytes())
					.map_err(|e| AddressError::InvalidPayload(e.to_string()))?;
				if raw.len() < CHECKSUM_LEN {
					return Err(AddressError::TooShort(s.to_owned()));
				}
				let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);

				let mut bytes = vec![proto - b'0'];
				bytes.extend_from_slice(payload);
				let addr = Self::from_bytes(&bytes)?;
				if addr.checksum() != checksum {
					return Err(AddressError::Checksum);
				}
				Ok(addr)
			}
			other => Err(AddressError::UnknownProtocol(other.wrapping_sub(b'0'))),
		}
	}
}

// -- Serde: strings for JSON, byte strings for CBOR --

impl Serialize for Address {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		if s.is_human_readable() {
			s.collect_str(self)
		} else {
			s.serialize_bytes(&self.to_bytes())
		}
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		if d.is_human_readable() {
			d.deserialize_str(AddressVisitor)
		} else {
			d.deserialize_bytes(AddressVisitor)
		}
	}
}

struct AddressVisitor;

impl<'de> Visitor<'de> for AddressVisitor {
	type Value = Address;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a filecoin address")
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Address, E> {
		v.parse().map_err(E::custom)
	}

	fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Address, E> {
		Address::from_bytes(v).map_err(E::custom)
	}
}
