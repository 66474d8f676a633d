//! Error types, one enum per layer.
//!
//! - [`AddressError`] / [`TokenError`] - parsing of user-supplied values
//! - [`CodecError`] - DAG-CBOR and CID encoding
//! - [`KeyError`] - key records and the key codec
//! - [`SignerError`] - signature schemes
//! - [`GatewayError`] - remote calls against the node
//! - [`RegistryError`] - humanizing pending proposal parameters
//! - [`EngineError`] - everything an engine operation can return

use cid::Cid;

use crate::token::TokenAmount;

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
	#[error("address {0:?} is too short")]
	TooShort(String),

	#[error("unknown network prefix in {0:?}")]
	UnknownNetwork(String),

	#[error("unknown address protocol {0}")]
	UnknownProtocol(u8),

	#[error("invalid address payload: {0}")]
	InvalidPayload(String),

	#[error("address checksum mismatch")]
	Checksum,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
	#[error("amount is empty")]
	Empty,

	#[error("invalid amount {0:?}")]
	Malformed(String),

	#[error("amount {0:?} has more than 18 decimal places")]
	TooPrecise(String),

	#[error("amount {0:?} is negative")]
	Negative(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
	#[error("cbor encoding failed: {0}")]
	Encode(String),

	#[error("cbor decoding failed: {0}")]
	Decode(String),

	#[error("invalid multihash: {0}")]
	Multihash(String),
}

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
	#[error("key record is not valid hex: {0}")]
	Hex(#[from] hex::FromHexError),

	#[error("key record is not a valid key info: {0}")]
	Json(#[from] serde_json::Error),

	#[error("invalid private key size {0}, should be 32")]
	Size(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
	#[error("{scheme} signature invalid private key")]
	InvalidKey { scheme: &'static str },

	#[error("{scheme} signing error: {reason}")]
	Signing { scheme: &'static str, reason: String },

	#[error("{scheme} key generation failed")]
	KeyGen { scheme: &'static str },
}

/// Failures talking to the node. Every variant names the RPC method
/// (or message) involved so it can be shown to the operator verbatim.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
	#[error("invalid endpoint {endpoint:?}: {reason}")]
	Endpoint { endpoint: String, reason: String },

	#[error("{method} transport error: {source}")]
	Transport {
		method: &'static str,
		#[source]
		source: reqwest::Error,
	},

	#[error("{method} error {code}: {message}")]
	Remote {
		method: &'static str,
		code: i64,
		message: String,
	},

	#[error("{method} returned an unexpected response: {reason}")]
	Response { method: &'static str, reason: String },

	#[error("message {cid} executed, exit code {code}")]
	ExitCode { cid: Cid, code: i64 },

	#[error("signing message failed: {0}")]
	Sign(#[from] SignerError),

	#[error("encoding message failed: {0}")]
	Encode(#[from] CodecError),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	#[error("unknown actor code {0}")]
	UnknownActor(Cid),

	#[error("unknown method {method} for actor {code}")]
	UnknownMethod { code: Cid, method: u64 },

	#[error("malformed parameters for {actor}.{method}: {reason}")]
	Malformed {
		actor: &'static str,
		method: &'static str,
		reason: String,
	},
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("invalid {field} {value:?}: {reason}")]
	InvalidInput {
		field: &'static str,
		value: String,
		reason: String,
	},

	#[error("sender balance {balance} is less than {required}")]
	InsufficientFunds {
		balance: TokenAmount,
		required: TokenAmount,
	},

	#[error("available balance {available} is less than withdraw amount {requested}")]
	InsufficientMinerBalance {
		available: TokenAmount,
		requested: TokenAmount,
	},

	#[error(transparent)]
	Gateway(#[from] GatewayError),

	/// The message reached the pool, so its nonce and fee are spent, but
	/// it was not seen executing successfully.
	#[error("message {cid} was submitted but not confirmed successful: {source}")]
	Unconfirmed {
		cid: Cid,
		#[source]
		source: GatewayError,
	},

	#[error("transaction was executed during propose, exit code: {code}")]
	AppliedDuringPropose { code: i64 },

	/// The message executed but its return value could not be read. For
	/// create-multisig the wallet exists; look it up by message CID.
	#[error("message {cid} executed but its {what} could not be decoded: {source}")]
	ReturnUndecodable {
		cid: Cid,
		what: &'static str,
		#[source]
		source: CodecError,
	},

	#[error("failed to encode {what}: {source}")]
	Encode {
		what: &'static str,
		#[source]
		source: CodecError,
	},

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Key(#[from] KeyError),

	#[error(transparent)]
	Signer(#[from] SignerError),

	#[error("no aes key configured, key encryption is disabled")]
	KeyCodecDisabled,

	#[error("another operation is already in progress")]
	Busy,
}

impl EngineError {
	pub fn invalid(field: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
		Self::InvalidInput {
			field,
			value: value.into(),
			reason: reason.to_string(),
		}
	}

	/// True when the failure happened after the message entered the pool.
	pub fn was_submitted(&self) -> bool {
		matches!(
			self,
			Self::Unconfirmed { .. }
				| Self::AppliedDuringPropose { .. }
				| Self::ReturnUndecodable { .. }
		)
	}
}
