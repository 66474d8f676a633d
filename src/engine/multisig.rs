use cid::Cid;
use serde::Serialize;

use super::{parse_address, parse_amount, parse_number, required, Account, Engine, Proposal};
use crate::actors::init::ExecReturn;
use crate::actors::multisig::ApproveReturn;
use crate::address::Address;
use crate::encoding::{from_cbor, RawBytes};
use crate::error::EngineError;
use crate::progress::Progress;
use crate::token::TokenAmount;
use crate::tx_builder::{self, Call};

/// A newly created multisig wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedMultisig {
	pub id_address: Address,
	pub robust_address: Address,
}

/// Result of an approval. `applied` is set when this approval met the
/// threshold and the transaction ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
	pub cid: Cid,
	pub applied: bool,
	pub code: i64,
	pub ret: RawBytes,
}

/// A pending transaction with its parameters decoded for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalView {
	pub id: i64,
	pub to: Address,
	pub value: String,
	pub method: &'static str,
	pub params: String,
	pub approved: Vec<Address>,
}

impl Engine {
	/// Deploy a multisig wallet through the init actor.
	///
	/// Inputs are checked before anything is sent: the signer list must
	/// be non-empty and the threshold must not exceed it.
	pub async fn create_multisig(
		&self,
		key: &str,
		signers: &[String],
		threshold: &str,
		unlock_duration: &str,
		initial_balance: &str,
		progress: &dyn Progress,
	) -> Result<CreatedMultisig, EngineError> {
		let _gate = self.acquire()?;
		let threshold: u64 = parse_number("threshold", threshold)?;
		let unlock_duration: i64 = parse_number("unlock duration", unlock_duration)?;
		let initial = if initial_balance.trim().is_empty() {
			TokenAmount::zero()
		} else {
			parse_amount("initial balance", initial_balance)?
		};

		if signers.is_empty() {
			return Err(EngineError::invalid("signers", "", "at least one signer is required"));
		}
		if threshold > signers.len() as u64 {
			return Err(EngineError::invalid(
				"threshold",
				threshold.to_string(),
				format!("greater than the number of signers ({})", signers.len()),
			));
		}
		let signers = signers
			.iter()
			.map(|s| parse_address("signer", s))
			.collect::<Result<Vec<_>, _>>()?;
		let account = Account::open(key)?;

		let call = tx_builder::create_multisig(signers, threshold, unlock_duration, initial)?;
		let (cid, ret) = self.push(&account, call, 0, progress).await?;
		let ret: ExecReturn = from_cbor(&ret).map_err(|source| EngineError::ReturnUndecodable {
			cid,
			what: "exec return",
			source,
		})?;
		log::info!("created multisig {} ({})", ret.id_address, ret.robust_address);
		Ok(CreatedMultisig {
			id_address: ret.id_address,
			robust_address: ret.robust_address,
		})
	}

	pub async fn propose_add_signer(
		&self,
		key: &str,
		msig: &str,
		signer: &str,
		increase: bool,
		progress: &dyn Progress,
	) -> Result<Proposal, EngineError> {
		let _gate = self.acquire()?;
		let msig = parse_address("msig", msig)?;
		let account = Account::open(key)?;
		let signer = parse_address("signer", signer)?;
		let call = tx_builder::add_signer(&msig, signer, increase)?;
		self.propose(&account, &msig, call, 0, progress).await
	}

	pub async fn propose_remove_signer(
		&self,
		key: &str,
		msig: &str,
		signer: &str,
		decrease: bool,
		progress: &dyn Progress,
	) -> Result<Proposal, EngineError> {
		let _gate = self.acquire()?;
		let msig = parse_address("msig", msig)?;
		let account = Account::open(key)?;
		let signer = parse_address("signer", signer)?;
		let call = tx_builder::remove_signer(&msig, signer, decrease)?;
		self.propose(&account, &msig, call, 0, progress).await
	}

	pub async fn propose_swap_signer(
		&self,
		key: &str,
		msig: &str,
		old: &str,
		new: &str,
		progress: &dyn Progress,
	) -> Result<Proposal, EngineError> {
		let _gate = self.acquire()?;
		let msig = parse_address("msig", msig)?;
		let account = Account::open(key)?;
		let old = parse_address("old signer", old)?;
		let new = parse_address("new signer", new)?;
		let call = tx_builder::swap_signer(&msig, old, new)?;
		self.propose(&account, &msig, call, 0, progress).await
	}

	pub async fn propose_change_threshold(
		&self,
		key: &str,
		msig: &str,
		threshold: &str,
		progress: &dyn Progress,
	) -> Result<Proposal, EngineError> {
		let _gate = self.acquire()?;
		let msig = parse_address("msig", msig)?;
		let account = Account::open(key)?;
		let threshold = parse_number("threshold", threshold)?;
		let call = tx_builder::change_threshold(&msig, threshold)?;
		self.propose(&account, &msig, call, 0, progress).await
	}

	/// Lock `amount` of the wallet's balance, vesting linearly over
	/// `duration` epochs from `start`.
	pub async fn propose_lock_balance(
		&self,
		key: &str,
		msig: &str,
		start: &str,
		duration: &str,
		amount: &str,
		progress: &dyn Progress,
	) -> Result<Proposal, EngineError> {
		let _gate = self.acquire()?;
		required("msig", msig)?;
		required("start epoch", start)?;
		required("unlock duration", duration)?;
		required("amount", amount)?;

		let msig = parse_address("msig", msig)?;
		let start = parse_number("start epoch", start)?;
		let duration = parse_number("unlock duration", duration)?;
		let amount = parse_amount("amount", amount)?;
		let account = Account::open(key)?;
		let call = tx_builder::lock_balance(&msig, start, duration, amount)?;
		self.propose(&account, &msig, call, 0, progress).await
	}

	/// Approve a pending transaction. Meeting the threshold executes it;
	/// that is reported in the result, not as an error.
	pub async fn approve(
		&self,
		key: &str,
		msig: &str,
		txn_id: &str,
		progress: &dyn Progress,
	) -> Result<Approval, EngineError> {
		let _gate = self.acquire()?;
		let (account, call) = txn_call(key, msig, txn_id, true)?;
		let (cid, ret) = self.push(&account, call, 0, progress).await?;
		let ret: ApproveReturn = from_cbor(&ret).map_err(|source| EngineError::ReturnUndecodable {
			cid,
			what: "approve return",
			source,
		})?;
		if ret.applied {
			log::info!("approval {cid} executed the transaction, exit code {}", ret.code);
		}
		Ok(Approval {
			cid,
			applied: ret.applied,
			code: ret.code,
			ret: ret.ret,
		})
	}

	/// Withdraw a pending transaction. Only its proposer may cancel.
	pub async fn cancel(
		&self,
		key: &str,
		msig: &str,
		txn_id: &str,
		progress: &dyn Progress,
	) -> Result<Cid, EngineError> {
		let _gate = self.acquire()?;
		let (account, call) = txn_call(key, msig, txn_id, false)?;
		let (cid, _) = self.push(&account, call, 0, progress).await?;
		Ok(cid)
	}

	/// List the wallet's pending transactions with decoded parameters.
	/// Fails on the first transaction whose method is not registered.
	pub async fn pending_proposals(
		&self,
		msig: &str,
		progress: &dyn Progress,
	) -> Result<Vec<ProposalView>, EngineError> {
		let _gate = self.acquire()?;
		let msig = parse_address("msig", msig)?;

		let pending = self.gateway.pending_multisig(&msig).await?;
		if pending.is_empty() {
			progress.report(1.0);
			return Ok(Vec::new());
		}
		progress.report(0.5);

		let base = 0.5 / pending.len() as f64;
		let mut views = Vec::with_capacity(pending.len());
		for (i, txn) in pending.into_iter().enumerate() {
			let code = self.gateway.actor_code(&txn.to).await?;
			let meta = self.registry.lookup(&code, txn.method)?;
			let params = meta.decode(&txn.params)?;
			views.push(ProposalView {
				id: txn.id,
				to: txn.to,
				value: txn.value.to_string(),
				method: meta.name,
				params: format!("{params:?}"),
				approved: txn.approved,
			});
			progress.report(0.5 + (i + 1) as f64 * base);
		}
		Ok(views)
	}
}

fn txn_call(key: &str, msig: &str, txn_id: &str, approve: bool) -> Result<(Account, Call), EngineError> {
	let msig = parse_address("msig", msig)?;
	let txn_id = parse_number("txn id", txn_id)?;
	let account = Account::open(key)?;
	Ok((account, tx_builder::approve_or_cancel(msig, txn_id, approve)?))
}
