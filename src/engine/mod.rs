//! The transaction engine: turns operator input into signed messages,
//! pushes them through the node and waits for their receipts.
//!
//! Every operation either runs directly from the signer's account or is
//! wrapped in a multisig Propose, depending on the [`Route`] it is given.

mod keys;
mod miner;
mod multisig;

pub use keys::KeyRecord;
pub use multisig::{Approval, CreatedMultisig, ProposalView};

use std::fmt;

use cid::Cid;
use tokio::sync::{Mutex, MutexGuard};

use crate::actors::multisig::ProposeReturn;
use crate::address::Address;
use crate::crypto::KeyCodec;
use crate::encoding::{from_cbor, RawBytes};
use crate::error::EngineError;
use crate::keyinfo::KeyInfo;
use crate::progress::Progress;
use crate::registry::{registry, MethodRegistry};
use crate::rpc::ChainGateway;
use crate::signer::{self, Signer};
use crate::token::TokenAmount;
use crate::tx_builder::Call;

/// Steps of the push pipeline, counted for progress reporting.
const PUSH_STEPS: usize = 6;

/// Values every operation is parameterized by.
#[derive(Debug, Clone)]
pub struct Settings {
	/// Upper bound on the fee of a single message.
	pub max_fee: TokenAmount,
	pub gas_fee_cap: TokenAmount,
	/// Blocks to wait on top of a message before trusting its receipt.
	pub confidence: u64,
	/// Enables the key codec when present.
	pub aes_key: Option<[u8; 32]>,
}

/// Who sends the message: the signer's own account, or a multisig
/// wallet the signer proposes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
	Direct,
	ViaMultisig(Address),
}

impl Route {
	pub fn from_option(msig: Option<&str>) -> Result<Self, EngineError> {
		match msig {
			None => Ok(Self::Direct),
			Some(s) => Ok(Self::ViaMultisig(parse_address("msig", s)?)),
		}
	}
}

/// Handle to a pending multisig transaction, needed to approve or cancel it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
	pub msig: Address,
	pub txn_id: i64,
}

impl fmt::Display for Proposal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} txn {}", self.msig, self.txn_id)
	}
}

#[derive(Debug)]
pub enum Outcome {
	/// Sent directly and confirmed.
	Executed { cid: Cid, ret: RawBytes },
	/// Proposed to a multisig; waiting for other signers.
	Proposed(Proposal),
}

/// The key an operation signs with, with its scheme and address.
pub(crate) struct Account {
	key: KeyInfo,
	signer: Box<dyn Signer>,
	address: Address,
}

impl Account {
	pub(crate) fn open(record: &str) -> Result<Self, EngineError> {
		let record = required("key", record)?;
		let key = KeyInfo::from_hex(record)?;
		let signer = signer::for_key_type(key.key_type);
		let address = signer.to_address(&key.private_key)?;
		Ok(Self { key, signer, address })
	}
}

pub struct Engine {
	gateway: Box<dyn ChainGateway>,
	settings: Settings,
	codec: Option<KeyCodec>,
	registry: &'static MethodRegistry,
	gate: Mutex<()>,
}

impl Engine {
	pub fn new(gateway: Box<dyn ChainGateway>, settings: Settings) -> Self {
		let codec = settings.aes_key.as_ref().map(KeyCodec::new);
		Self {
			gateway,
			settings,
			codec,
			registry: registry(),
			gate: Mutex::new(()),
		}
	}

	/// Release the node connection.
	pub fn close(self) {
		log::debug!("closing engine");
		drop(self.gateway);
	}

	/// One operation at a time; a second caller is turned away, not queued.
	fn acquire(&self) -> Result<MutexGuard<'_, ()>, EngineError> {
		self.gate.try_lock().map_err(|_| EngineError::Busy)
	}

	// -- Pipeline --

	/// Balance check, nonce, gas estimate, sign and submit, then wait.
	/// `start` counts lookups already reported before this pipeline.
	async fn push(
		&self,
		account: &Account,
		call: Call,
		start: usize,
		progress: &dyn Progress,
	) -> Result<(Cid, Vec<u8>), EngineError> {
		let total = (start + PUSH_STEPS) as f64;
		let step = |k: usize| progress.report((start + k) as f64 / total);
		let mut msg = call.into_message(account.address.clone());

		step(1);
		let balance = self.gateway.get_balance(&msg.from).await?;
		let required = &self.settings.max_fee + &msg.value;
		if balance < required {
			return Err(EngineError::InsufficientFunds { balance, required });
		}

		step(2);
		msg.nonce = self.gateway.get_nonce(&msg.from).await?;

		step(3);
		msg.gas_fee_cap = self.settings.gas_fee_cap.clone();
		let msg = self.gateway.estimate_gas(&self.settings.max_fee, msg).await?;
		log::debug!(
			"message to {} method {} nonce {} gas limit {}",
			msg.to,
			msg.method,
			msg.nonce,
			msg.gas_limit
		);

		step(4);
		let cid = self
			.gateway
			.submit(&account.key.private_key, msg, account.signer.as_ref())
			.await?;
		log::info!("submitted {cid}, waiting for {} confirmations", self.settings.confidence);

		step(5);
		let ret = self
			.gateway
			.wait_for_receipt(&cid, self.settings.confidence)
			.await
			.map_err(|source| EngineError::Unconfirmed { cid, source })?;

		step(6);
		Ok((cid, ret))
	}

	/// Send `call` from the account, or propose it to the route's wallet.
	async fn execute(
		&self,
		account: &Account,
		route: &Route,
		call: Call,
		start: usize,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		match route {
			Route::Direct => {
				let (cid, ret) = self.push(account, call, start, progress).await?;
				Ok(Outcome::Executed {
					cid,
					ret: RawBytes(ret),
				})
			}
			Route::ViaMultisig(msig) => self
				.propose(account, msig, call, start, progress)
				.await
				.map(Outcome::Proposed),
		}
	}

	async fn propose(
		&self,
		account: &Account,
		msig: &Address,
		call: Call,
		start: usize,
		progress: &dyn Progress,
	) -> Result<Proposal, EngineError> {
		let (cid, ret) = self.push(account, call.propose(msig)?, start, progress).await?;
		let ret: ProposeReturn = from_cbor(&ret).map_err(|source| EngineError::ReturnUndecodable {
			cid,
			what: "propose return",
			source,
		})?;
		if ret.applied {
			log::warn!("proposal {cid} executed immediately with exit code {}", ret.code);
			return Err(EngineError::AppliedDuringPropose { code: ret.code });
		}
		log::info!("proposed txn {} on {msig}", ret.txn_id);
		Ok(Proposal {
			msig: msig.clone(),
			txn_id: ret.txn_id,
		})
	}

	/// Resolve every non-ID address, reporting each lookup as a step.
	/// Returns the resolved addresses and the number of lookups made.
	async fn resolve_ids(
		&self,
		addrs: Vec<Address>,
		progress: &dyn Progress,
	) -> Result<(Vec<Address>, usize), EngineError> {
		let lookups = addrs.iter().filter(|a| !a.is_id()).count();
		let total = (lookups + PUSH_STEPS) as f64;

		let mut done = 0;
		let mut resolved = Vec::with_capacity(addrs.len());
		for addr in addrs {
			if addr.is_id() {
				resolved.push(addr);
				continue;
			}
			done += 1;
			progress.report(done as f64 / total);
			let id = self.gateway.resolve_to_id(&addr).await?;
			log::debug!("resolved {addr} to {id}");
			resolved.push(id);
		}
		Ok((resolved, lookups))
	}

	// -- Operations --

	/// Transfer `amount` FIL to `to`.
	pub async fn send(
		&self,
		key: &str,
		to: &str,
		amount: &str,
		route: &Route,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		let _gate = self.acquire()?;
		let account = Account::open(key)?;
		let to = parse_address("to", to)?;
		let amount = parse_amount("amount", amount)?;
		self.execute(&account, route, crate::tx_builder::send(to, amount), 0, progress)
			.await
	}
}

// -- Input parsing --

pub(crate) fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, EngineError> {
	let value = value.trim();
	if value.is_empty() {
		return Err(EngineError::invalid(field, value, "must not be empty"));
	}
	Ok(value)
}

pub(crate) fn parse_address(field: &'static str, value: &str) -> Result<Address, EngineError> {
	let value = required(field, value)?;
	value.parse().map_err(|e| EngineError::invalid(field, value, e))
}

pub(crate) fn parse_amount(field: &'static str, value: &str) -> Result<TokenAmount, EngineError> {
	let value = required(field, value)?;
	TokenAmount::parse_fil(value).map_err(|e| EngineError::invalid(field, value, e))
}

pub(crate) fn parse_number<T>(field: &'static str, value: &str) -> Result<T, EngineError>
where
	T: std::str::FromStr,
	T::Err: fmt::Display,
{
	let value = required(field, value)?;
	value.parse().map_err(|e: T::Err| EngineError::invalid(field, value, e))
}
