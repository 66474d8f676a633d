use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Encode a value with the node's binary parameter encoding (DAG-CBOR).
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
	serde_ipld_dagcbor::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
	serde_ipld_dagcbor::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Opaque bytes carried inside actor parameters. Encodes as a CBOR byte
/// string and prints as hex.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBytes(#[serde(with = "serde_bytes")] pub Vec<u8>);

impl RawBytes {
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for RawBytes {
	fn from(v: Vec<u8>) -> Self {
		Self(v)
	}
}

impl fmt::Debug for RawBytes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// Lotus JSON carries byte fields as base64, with `null` for empty.
pub mod base64_bytes {
	use base64::engine::general_purpose::STANDARD;
	use base64::Engine as _;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
		if bytes.is_empty() {
			s.serialize_none()
		} else {
			s.serialize_str(&STANDARD.encode(bytes))
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
		match Option::<String>::deserialize(d)? {
			Some(s) => STANDARD.decode(s).map_err(serde::de::Error::custom),
			None => Ok(Vec::new()),
		}
	}
}

// -- Structural decoding --

/// Schema-less view of a CBOR document, used to display parameters whose
/// concrete layout is not worth a dedicated type (proofs, deal batches).
#[derive(Clone, PartialEq)]
pub enum CborValue {
	Null,
	Bool(bool),
	Int(i64),
	Uint(u64),
	Float(f64),
	Text(String),
	Bytes(RawBytes),
	Array(Vec<CborValue>),
	Map(Vec<(CborValue, CborValue)>),
}

impl fmt::Debug for CborValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Uint(u) => write!(f, "{u}"),
			Self::Float(x) => write!(f, "{x}"),
			Self::Text(s) => write!(f, "{s:?}"),
			Self::Bytes(b) => write!(f, "{b:?}"),
			Self::Array(items) => f.debug_list().entries(items).finish(),
			Self::Map(entries) => f
				.debug_map()
				.entries(entries.iter().map(|(k, v)| (k, v)))
				.finish(),
		}
	}
}

impl<'de> Deserialize<'de> for CborValue {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		d.deserialize_any(CborValueVisitor)
	}
}

struct CborValueVisitor;

impl<'de> Visitor<'de> for CborValueVisitor {
	type Value = CborValue;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any CBOR value")
	}

	fn visit_bool<E: de::Error>(self, v: bool) -> Result<CborValue, E> {
		Ok(CborValue::Bool(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<CborValue, E> {
		Ok(CborValue::Int(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<CborValue, E> {
		Ok(CborValue::Uint(v))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<CborValue, E> {
		Ok(CborValue::Float(v))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<CborValue, E> {
		Ok(CborValue::Text(v.to_owned()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<CborValue, E> {
		Ok(CborValue::Text(v))
	}

	fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<CborValue, E> {
		Ok(CborValue::Bytes(RawBytes(v.to_vec())))
	}

	fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<CborValue, E> {
		Ok(CborValue::Bytes(RawBytes(v)))
	}

	fn visit_none<E: de::Error>(self) -> Result<CborValue, E> {
		Ok(CborValue::Null)
	}

	fn visit_unit<E: de::Error>(self) -> Result<CborValue, E> {
		Ok(CborValue::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<CborValue, D::Error> {
		CborValue::deserialize(d)
	}

	// CIDs (tag 42) arrive as a newtype wrapping their bytes.
	fn visit_newtype_struct<D: Deserializer<'de>>(self, d: D) -> Result<CborValue, D::Error> {
		CborValue::deserialize(d)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<CborValue, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element()? {
			items.push(item);
		}
		Ok(CborValue::Array(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CborValue, A::Error> {
		let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
		while let Some(entry) = map.next_entry()? {
			entries.push(entry);
		}
		Ok(CborValue::Map(entries))
	}
}
