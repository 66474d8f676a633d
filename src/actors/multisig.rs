use serde_tuple::{Deserialize_tuple, Serialize_tuple};

use crate::address::Address;
use crate::encoding::RawBytes;
use crate::message::MethodNum;
use crate::token::TokenAmount;

pub const CONSTRUCTOR: MethodNum = 1;
pub const PROPOSE: MethodNum = 2;
pub const APPROVE: MethodNum = 3;
pub const CANCEL: MethodNum = 4;
pub const ADD_SIGNER: MethodNum = 5;
pub const REMOVE_SIGNER: MethodNum = 6;
pub const SWAP_SIGNER: MethodNum = 7;
pub const CHANGE_NUM_APPROVALS_THRESHOLD: MethodNum = 8;
pub const LOCK_BALANCE: MethodNum = 9;

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ConstructorParams {
	pub signers: Vec<Address>,
	pub num_approvals_threshold: u64,
	pub unlock_duration: i64,
	pub start_epoch: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ProposeParams {
	pub to: Address,
	pub value: TokenAmount,
	pub method: MethodNum,
	pub params: RawBytes,
}

/// `applied` is set when the proposer's own approval already met the
/// threshold and the transaction ran inside the propose call.
#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ProposeReturn {
	pub txn_id: i64,
	pub applied: bool,
	pub code: i64,
	pub ret: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct TxnIdParams {
	pub id: i64,
	pub proposal_hash: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ApproveReturn {
	pub applied: bool,
	pub code: i64,
	pub ret: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct AddSignerParams {
	pub signer: Address,
	pub increase: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct RemoveSignerParams {
	pub signer: Address,
	pub decrease: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct SwapSignerParams {
	pub from: Address,
	pub to: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ChangeNumApprovalsThresholdParams {
	pub new_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct LockBalanceParams {
	pub start_epoch: i64,
	pub unlock_duration: i64,
	pub amount: TokenAmount,
}
