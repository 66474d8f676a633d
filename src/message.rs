use cid::Cid;
use multihash::{Code, MultihashDigest};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::encoding::{base64_bytes, to_cbor};
use crate::error::{CodecError, GatewayError};
use crate::signer::Signer;
use crate::token::TokenAmount;

/// Multicodec of DAG-CBOR blocks.
pub const DAG_CBOR: u64 = 0x71;

pub type MethodNum = u64;

/// A message before signing. Nonce and gas fields start zeroed and are
/// filled in by the push pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnsignedMessage {
	#[serde(default)]
	pub version: u64,
	pub to: Address,
	pub from: Address,
	pub nonce: u64,
	pub value: TokenAmount,
	pub gas_limit: i64,
	pub gas_fee_cap: TokenAmount,
	pub gas_premium: TokenAmount,
	pub method: MethodNum,
	#[serde(with = "base64_bytes", default)]
	pub params: Vec<u8>,
}

impl UnsignedMessage {
	pub fn new(from: Address, to: Address, value: TokenAmount, method: MethodNum, params: Vec<u8>) -> Self {
		Self {
			version: 0,
			to,
			from,
			nonce: 0,
			value,
			gas_limit: 0,
			gas_fee_cap: TokenAmount::zero(),
			gas_premium: TokenAmount::zero(),
			method,
			params,
		}
	}

	/// The canonical CBOR tuple the message CID is computed over.
	pub fn to_cbor(&self) -> Result<Vec<u8>, CodecError> {
		to_cbor(&(
			self.version,
			&self.to,
			&self.from,
			self.nonce,
			&self.value,
			self.gas_limit,
			&self.gas_fee_cap,
			&self.gas_premium,
			self.method,
			serde_bytes::Bytes::new(&self.params),
		))
	}

	/// Content identifier: CIDv1, DAG-CBOR, blake2b-256.
	pub fn cid(&self) -> Result<Cid, CodecError> {
		let bytes = self.to_cbor()?;
		Ok(Cid::new_v1(DAG_CBOR, Code::Blake2b256.digest(&bytes)))
	}

	/// Sign the CID bytes of this message.
	pub fn sign(self, private_key: &[u8], signer: &dyn Signer) -> Result<SignedMessage, GatewayError> {
		let cid = self.cid()?;
		let data = signer.sign(private_key, &cid.to_bytes())?;
		Ok(SignedMessage {
			message: self,
			signature: Signature {
				sig_type: signer.sig_type(),
				data,
			},
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigType {
	Secp256k1 = 1,
	Bls = 2,
}

impl Serialize for SigType {
	fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		s.serialize_u8(*self as u8)
	}
}

impl<'de> Deserialize<'de> for SigType {
	fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		match u8::deserialize(d)? {
			1 => Ok(Self::Secp256k1),
			2 => Ok(Self::Bls),
			other => Err(serde::de::Error::custom(format!("unknown signature type {other}"))),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Signature {
	#[serde(rename = "Type")]
	pub sig_type: SigType,
	#[serde(with = "base64_bytes")]
	pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedMessage {
	pub message: UnsignedMessage,
	pub signature: Signature,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::keyinfo::KeyType;
	use crate::signer;

	fn draft(nonce: u64) -> UnsignedMessage {
		let mut m = UnsignedMessage::new(
			Address::new_id(100),
			Address::new_id(200),
			TokenAmount::from_whole(1),
			0,
			Vec::new(),
		);
		m.nonce = nonce;
		m
	}

	#[test]
	fn cid_is_dag_cbor_blake2b() {
		let cid = draft(0).cid().unwrap();
		assert_eq!(cid.version(), cid::Version::V1);
		assert_eq!(cid.codec(), DAG_CBOR);
		assert_eq!(cid.hash().code(), 0xb220);
		assert_eq!(cid.hash().size(), 32);
	}

	#[test]
	fn cid_depends_on_every_field() {
		assert_eq!(draft(1).cid().unwrap(), draft(1).cid().unwrap());
		assert_ne!(draft(1).cid().unwrap(), draft(2).cid().unwrap());
	}

	#[test]
	fn cbor_is_a_ten_element_array() {
		let bytes = draft(0).to_cbor().unwrap();
		assert_eq!(bytes[0], 0x8a);
	}

	#[test]
	fn json_uses_lotus_field_names() {
		let json = serde_json::to_value(draft(3)).unwrap();
		assert_eq!(json["To"], "f0200");
		assert_eq!(json["From"], "f0100");
		assert_eq!(json["Nonce"], 3);
		assert_eq!(json["Value"], "1000000000000000000");
		assert_eq!(json["GasFeeCap"], "0");
		assert!(json["Params"].is_null());

		let back: UnsignedMessage = serde_json::from_value(json).unwrap();
		assert_eq!(back, draft(3));
	}

	#[test]
	fn signed_message_carries_scheme_tag() {
		let signer = signer::for_key_type(KeyType::Secp256k1);
		let signed = draft(0).sign(&[1u8; 32], signer.as_ref()).unwrap();
		assert_eq!(signed.signature.sig_type, SigType::Secp256k1);
		assert_eq!(signed.signature.data.len(), 65);

		let json = serde_json::to_value(&signed).unwrap();
		assert_eq!(json["Signature"]["Type"], 1);
	}
}
