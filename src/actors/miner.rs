use serde_tuple::{Deserialize_tuple, Serialize_tuple};

use crate::address::Address;
use crate::encoding::RawBytes;
use crate::message::MethodNum;
use crate::token::TokenAmount;

pub const CONSTRUCTOR: MethodNum = 1;
pub const CONTROL_ADDRESSES: MethodNum = 2;
pub const CHANGE_WORKER_ADDRESS: MethodNum = 3;
pub const CHANGE_PEER_ID: MethodNum = 4;
pub const SUBMIT_WINDOWED_POST: MethodNum = 5;
pub const PRE_COMMIT_SECTOR: MethodNum = 6;
pub const PROVE_COMMIT_SECTOR: MethodNum = 7;
pub const EXTEND_SECTOR_EXPIRATION: MethodNum = 8;
pub const TERMINATE_SECTORS: MethodNum = 9;
pub const DECLARE_FAULTS: MethodNum = 10;
pub const DECLARE_FAULTS_RECOVERED: MethodNum = 11;
pub const ON_DEFERRED_CRON_EVENT: MethodNum = 12;
pub const CHECK_SECTOR_PROVEN: MethodNum = 13;
pub const APPLY_REWARDS: MethodNum = 14;
pub const REPORT_CONSENSUS_FAULT: MethodNum = 15;
pub const WITHDRAW_BALANCE: MethodNum = 16;
pub const CONFIRM_SECTOR_PROOFS_VALID: MethodNum = 17;
pub const CHANGE_MULTIADDRS: MethodNum = 18;
pub const COMPACT_PARTITIONS: MethodNum = 19;
pub const COMPACT_SECTOR_NUMBERS: MethodNum = 20;
pub const CONFIRM_UPDATE_WORKER_KEY: MethodNum = 21;
pub const REPAY_DEBT: MethodNum = 22;
pub const CHANGE_OWNER_ADDRESS: MethodNum = 23;
pub const DISPUTE_WINDOWED_POST: MethodNum = 24;
pub const PRE_COMMIT_SECTOR_BATCH: MethodNum = 25;
pub const PROVE_COMMIT_AGGREGATE: MethodNum = 26;

/// Worker and control addresses must be in ID form.
#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ChangeWorkerAddressParams {
	pub new_worker: Address,
	pub new_control_addrs: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ChangePeerIdParams {
	pub new_id: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ProveCommitSectorParams {
	pub sector_number: u64,
	pub proof: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct CheckSectorProvenParams {
	pub sector_number: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ApplyRewardParams {
	pub reward: TokenAmount,
	pub penalty: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ReportConsensusFaultParams {
	pub block_header1: RawBytes,
	pub block_header2: RawBytes,
	pub block_header_extra: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct WithdrawBalanceParams {
	pub amount_requested: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ChangeMultiaddrsParams {
	pub new_multi_addrs: Vec<RawBytes>,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct DisputeWindowedPoStParams {
	pub deadline: u64,
	pub post_index: u64,
}
