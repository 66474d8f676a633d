//! Method numbers and parameter layouts of the remaining system actors.
//! Only decoded for display; nothing here is ever sent by this tool.

pub mod account {
	use crate::message::MethodNum;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const PUBKEY_ADDRESS: MethodNum = 2;
}

pub mod system {
	use crate::message::MethodNum;

	pub const CONSTRUCTOR: MethodNum = 1;
}

pub mod cron {
	use serde_tuple::{Deserialize_tuple, Serialize_tuple};

	use crate::address::Address;
	use crate::message::MethodNum;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const EPOCH_TICK: MethodNum = 2;

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct Entry {
		pub receiver: Address,
		pub method_num: MethodNum,
	}

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct ConstructorParams {
		pub entries: Vec<Entry>,
	}
}

pub mod reward {
	use serde_tuple::{Deserialize_tuple, Serialize_tuple};

	use crate::address::Address;
	use crate::message::MethodNum;
	use crate::token::TokenAmount;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const AWARD_BLOCK_REWARD: MethodNum = 2;
	pub const THIS_EPOCH_REWARD: MethodNum = 3;
	pub const UPDATE_NETWORK_KPI: MethodNum = 4;

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct AwardBlockRewardParams {
		pub miner: Address,
		pub penalty: TokenAmount,
		pub gas_reward: TokenAmount,
		pub win_count: i64,
	}
}

pub mod paych {
	use serde_tuple::{Deserialize_tuple, Serialize_tuple};

	use crate::address::Address;
	use crate::message::MethodNum;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const UPDATE_CHANNEL_STATE: MethodNum = 2;
	pub const SETTLE: MethodNum = 3;
	pub const COLLECT: MethodNum = 4;

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct ConstructorParams {
		pub from: Address,
		pub to: Address,
	}
}

pub mod market {
	use serde_tuple::{Deserialize_tuple, Serialize_tuple};

	use crate::address::Address;
	use crate::message::MethodNum;
	use crate::token::TokenAmount;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const ADD_BALANCE: MethodNum = 2;
	pub const WITHDRAW_BALANCE: MethodNum = 3;
	pub const PUBLISH_STORAGE_DEALS: MethodNum = 4;
	pub const VERIFY_DEALS_FOR_ACTIVATION: MethodNum = 5;
	pub const ACTIVATE_DEALS: MethodNum = 6;
	pub const ON_MINER_SECTORS_TERMINATE: MethodNum = 7;
	pub const COMPUTE_DATA_COMMITMENT: MethodNum = 8;
	pub const CRON_TICK: MethodNum = 9;

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct WithdrawBalanceParams {
		pub provider_or_client_address: Address,
		pub amount: TokenAmount,
	}
}

pub mod power {
	use serde_tuple::{Deserialize_tuple, Serialize_tuple};

	use crate::address::Address;
	use crate::encoding::RawBytes;
	use crate::message::MethodNum;
	use crate::token::BigIntValue;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const CREATE_MINER: MethodNum = 2;
	pub const UPDATE_CLAIMED_POWER: MethodNum = 3;
	pub const ENROLL_CRON_EVENT: MethodNum = 4;
	pub const ON_EPOCH_TICK_END: MethodNum = 5;
	pub const UPDATE_PLEDGE_TOTAL: MethodNum = 6;
	pub const SUBMIT_POREP_FOR_BULK_VERIFY: MethodNum = 8;
	pub const CURRENT_TOTAL_POWER: MethodNum = 9;

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct CreateMinerParams {
		pub owner: Address,
		pub worker: Address,
		pub window_post_proof_type: i64,
		pub peer: RawBytes,
		pub multiaddrs: Vec<RawBytes>,
	}

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct UpdateClaimedPowerParams {
		pub raw_byte_delta: BigIntValue,
		pub quality_adjusted_delta: BigIntValue,
	}

	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct EnrollCronEventParams {
		pub event_epoch: i64,
		pub payload: RawBytes,
	}
}

pub mod verifreg {
	use serde_tuple::{Deserialize_tuple, Serialize_tuple};

	use crate::address::Address;
	use crate::message::MethodNum;
	use crate::token::BigIntValue;

	pub const CONSTRUCTOR: MethodNum = 1;
	pub const ADD_VERIFIER: MethodNum = 2;
	pub const REMOVE_VERIFIER: MethodNum = 3;
	pub const ADD_VERIFIED_CLIENT: MethodNum = 4;
	pub const USE_BYTES: MethodNum = 5;
	pub const RESTORE_BYTES: MethodNum = 6;

	/// Shared by AddVerifier and AddVerifiedClient.
	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct AllowanceParams {
		pub address: Address,
		pub allowance: BigIntValue,
	}

	/// Shared by UseBytes and RestoreBytes.
	#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
	pub struct BytesParams {
		pub address: Address,
		pub deal_size: BigIntValue,
	}
}
