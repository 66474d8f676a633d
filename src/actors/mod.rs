//! Built-in actors: their code identifiers, method numbers and parameter
//! layouts. Parameter structs encode as CBOR tuples, field order matters.

pub mod builtin;
pub mod init;
pub mod miner;
pub mod multisig;

use cid::Cid;
use multihash::Multihash;

use crate::error::CodecError;
use crate::message::MethodNum;

/// Actors version whose code identifiers new wallets are created with.
pub const ACTORS_VERSION: u32 = 6;

/// Multicodec `raw`, used by identity-hashed actor code CIDs.
const RAW: u64 = 0x55;
const IDENTITY: u64 = 0x00;

/// Method 0 on every actor: plain value transfer, no parameters.
pub const METHOD_SEND: MethodNum = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
	System,
	Init,
	Cron,
	Account,
	Reward,
	PaymentChannel,
	StorageMarket,
	StoragePower,
	StorageMiner,
	Multisig,
	VerifiedRegistry,
}

impl ActorKind {
	pub const ALL: [ActorKind; 11] = [
		Self::System,
		Self::Init,
		Self::Cron,
		Self::Account,
		Self::Reward,
		Self::PaymentChannel,
		Self::StorageMarket,
		Self::StoragePower,
		Self::StorageMiner,
		Self::Multisig,
		Self::VerifiedRegistry,
	];

	pub fn name(&self) -> &'static str {
		match self {
			Self::System => "system",
			Self::Init => "init",
			Self::Cron => "cron",
			Self::Account => "account",
			Self::Reward => "reward",
			Self::PaymentChannel => "paymentchannel",
			Self::StorageMarket => "storagemarket",
			Self::StoragePower => "storagepower",
			Self::StorageMiner => "storageminer",
			Self::Multisig => "multisig",
			Self::VerifiedRegistry => "verifiedregistry",
		}
	}

	/// Code CID for this actor at [`ACTORS_VERSION`]: the identity hash
	/// of `fil/<version>/<name>`.
	pub fn code(&self) -> Result<Cid, CodecError> {
		let tag = format!("fil/{ACTORS_VERSION}/{}", self.name());
		let mh = Multihash::wrap(IDENTITY, tag.as_bytes())
			.map_err(|e| CodecError::Multihash(e.to_string()))?;
		Ok(Cid::new_v1(RAW, mh))
	}

	/// Recognize an identity-hashed code CID of any actors version. Bundle
	/// manifest codes (actors v8 on) are not recognized.
	pub fn from_code(code: &Cid) -> Option<Self> {
		if code.codec() != RAW || code.hash().code() != IDENTITY {
			return None;
		}
		let tag = std::str::from_utf8(code.hash().digest()).ok()?;
		let mut parts = tag.splitn(3, '/');
		if parts.next()? != "fil" {
			return None;
		}
		parts.next()?.parse::<u32>().ok()?;
		let name = parts.next()?;
		Self::ALL.into_iter().find(|k| k.name() == name)
	}
}
