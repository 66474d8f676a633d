//! Pure constructors for every message the engine sends. Nothing here
//! touches the network: addresses that must be in ID form are expected
//! to be resolved by the caller.

use serde::Serialize;

use crate::actors::{init, miner, multisig, ActorKind, METHOD_SEND};
use crate::address::Address;
use crate::encoding::{to_cbor, RawBytes};
use crate::error::EngineError;
use crate::message::{MethodNum, UnsignedMessage};
use crate::token::TokenAmount;

/// An actor method invocation, before it is bound to a sender.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
	pub to: Address,
	pub value: TokenAmount,
	pub method: MethodNum,
	pub params: Vec<u8>,
}

impl Call {
	fn new(to: Address, method: MethodNum) -> Self {
		Self {
			to,
			value: TokenAmount::zero(),
			method,
			params: Vec::new(),
		}
	}

	fn with_params<T: Serialize>(mut self, what: &'static str, params: &T) -> Result<Self, EngineError> {
		self.params = encode(what, params)?;
		Ok(self)
	}

	/// Wrap this call in a Propose on `msig`. The wallet, not the signer,
	/// becomes the eventual caller.
	pub fn propose(self, msig: &Address) -> Result<Call, EngineError> {
		let params = multisig::ProposeParams {
			to: self.to,
			value: self.value,
			method: self.method,
			params: RawBytes(self.params),
		};
		Call::new(msig.clone(), multisig::PROPOSE).with_params("propose params", &params)
	}

	pub fn into_message(self, from: Address) -> UnsignedMessage {
		UnsignedMessage::new(from, self.to, self.value, self.method, self.params)
	}
}

fn encode<T: Serialize>(what: &'static str, params: &T) -> Result<Vec<u8>, EngineError> {
	to_cbor(params).map_err(|source| EngineError::Encode { what, source })
}

// -- Transfers and miner management --

pub fn send(to: Address, value: TokenAmount) -> Call {
	Call {
		value,
		..Call::new(to, METHOD_SEND)
	}
}

/// Propose or confirm a new owner. Both steps send the same method;
/// the confirmation carries the new owner's own ID.
pub fn change_owner(miner_id: Address, owner_id: &Address) -> Result<Call, EngineError> {
	Call::new(miner_id, miner::CHANGE_OWNER_ADDRESS).with_params("owner address", owner_id)
}

pub fn withdraw(miner_id: Address, amount: TokenAmount) -> Result<Call, EngineError> {
	let params = miner::WithdrawBalanceParams {
		amount_requested: amount,
	};
	Call::new(miner_id, miner::WITHDRAW_BALANCE).with_params("withdraw params", &params)
}

pub fn change_worker(miner_id: Address, worker_id: Address, control_ids: Vec<Address>) -> Result<Call, EngineError> {
	let params = miner::ChangeWorkerAddressParams {
		new_worker: worker_id,
		new_control_addrs: control_ids,
	};
	Call::new(miner_id, miner::CHANGE_WORKER_ADDRESS).with_params("change worker params", &params)
}

pub fn confirm_change_worker(miner_id: Address) -> Call {
	Call::new(miner_id, miner::CONFIRM_UPDATE_WORKER_KEY)
}

// -- Multisig wallet --

/// Exec on the init actor, constructing a multisig with the given
/// signers and `initial` balance.
pub fn create_multisig(
	signers: Vec<Address>,
	threshold: u64,
	unlock_duration: i64,
	initial: TokenAmount,
) -> Result<Call, EngineError> {
	let ctor = multisig::ConstructorParams {
		signers,
		num_approvals_threshold: threshold,
		unlock_duration,
		start_epoch: 0,
	};
	let code_cid = ActorKind::Multisig.code().map_err(|source| EngineError::Encode {
		what: "multisig code",
		source,
	})?;
	let params = init::ExecParams {
		code_cid,
		constructor_params: RawBytes(encode("multisig constructor params", &ctor)?),
	};
	Ok(Call {
		value: initial,
		..Call::new(init::INIT_ACTOR, init::EXEC).with_params("exec params", &params)?
	})
}

pub fn add_signer(msig: &Address, signer: Address, increase: bool) -> Result<Call, EngineError> {
	let params = multisig::AddSignerParams { signer, increase };
	Call::new(msig.clone(), multisig::ADD_SIGNER).with_params("add signer params", &params)
}

pub fn remove_signer(msig: &Address, signer: Address, decrease: bool) -> Result<Call, EngineError> {
	let params = multisig::RemoveSignerParams { signer, decrease };
	Call::new(msig.clone(), multisig::REMOVE_SIGNER).with_params("remove signer params", &params)
}

pub fn swap_signer(msig: &Address, from: Address, to: Address) -> Result<Call, EngineError> {
	let params = multisig::SwapSignerParams { from, to };
	Call::new(msig.clone(), multisig::SWAP_SIGNER).with_params("swap signer params", &params)
}

pub fn change_threshold(msig: &Address, new_threshold: u64) -> Result<Call, EngineError> {
	let params = multisig::ChangeNumApprovalsThresholdParams { new_threshold };
	Call::new(msig.clone(), multisig::CHANGE_NUM_APPROVALS_THRESHOLD).with_params("threshold params", &params)
}

pub fn lock_balance(
	msig: &Address,
	start_epoch: i64,
	unlock_duration: i64,
	amount: TokenAmount,
) -> Result<Call, EngineError> {
	let params = multisig::LockBalanceParams {
		start_epoch,
		unlock_duration,
		amount,
	};
	Call::new(msig.clone(), multisig::LOCK_BALANCE).with_params("lock balance params", &params)
}

/// Approve (`approve = true`) or cancel a pending transaction.
pub fn approve_or_cancel(msig: Address, txn_id: i64, approve: bool) -> Result<Call, EngineError> {
	let method = if approve { multisig::APPROVE } else { multisig::CANCEL };
	let params = multisig::TxnIdParams {
		id: txn_id,
		proposal_hash: RawBytes::default(),
	};
	Call::new(msig, method).with_params("txn id params", &params)
}
