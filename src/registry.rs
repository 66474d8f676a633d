use std::collections::HashMap;
use std::fmt;

use cid::Cid;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::actors::builtin::{account, cron, market, paych, power, reward, system, verifreg};
use crate::actors::{init, miner, multisig, ActorKind, METHOD_SEND};
use crate::address::Address;
use crate::encoding::{from_cbor, CborValue};
use crate::error::RegistryError;
use crate::message::MethodNum;
use crate::token::{BigIntValue, TokenAmount};

/// Decoded method parameters, printable with `{:?}`.
pub type DecodedParams = Box<dyn fmt::Debug + Send + Sync>;

type Decoder = fn(&[u8]) -> Result<DecodedParams, String>;

/// Placeholder for methods that take no parameters.
pub struct NoParams;

impl fmt::Debug for NoParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(none)")
	}
}

// -- Decoders --

fn typed<T>(bytes: &[u8]) -> Result<DecodedParams, String>
where
	T: DeserializeOwned + fmt::Debug + Send + Sync + 'static,
{
	Ok(Box::new(from_cbor::<T>(bytes).map_err(|e| e.to_string())?))
}

fn empty(bytes: &[u8]) -> Result<DecodedParams, String> {
	if bytes.is_empty() {
		Ok(Box::new(NoParams))
	} else {
		Err(format!("expected no parameters, got {} bytes", bytes.len()))
	}
}

/// For proof and deal batches: show the raw CBOR tree.
fn structural(bytes: &[u8]) -> Result<DecodedParams, String> {
	if bytes.is_empty() {
		return Ok(Box::new(NoParams));
	}
	typed::<CborValue>(bytes)
}

// -- Method tables --

type MethodTable = &'static [(MethodNum, &'static str, Decoder)];

static ACCOUNT: MethodTable = &[
	(account::CONSTRUCTOR, "Constructor", typed::<Address>),
	(account::PUBKEY_ADDRESS, "PubkeyAddress", empty),
];

static SYSTEM: MethodTable = &[(system::CONSTRUCTOR, "Constructor", empty)];

static INIT: MethodTable = &[
	(init::CONSTRUCTOR, "Constructor", typed::<init::ConstructorParams>),
	(init::EXEC, "Exec", typed::<init::ExecParams>),
];

static CRON: MethodTable = &[
	(cron::CONSTRUCTOR, "Constructor", typed::<cron::ConstructorParams>),
	(cron::EPOCH_TICK, "EpochTick", empty),
];

static REWARD: MethodTable = &[
	(reward::CONSTRUCTOR, "Constructor", typed::<BigIntValue>),
	(reward::AWARD_BLOCK_REWARD, "AwardBlockReward", typed::<reward::AwardBlockRewardParams>),
	(reward::THIS_EPOCH_REWARD, "ThisEpochReward", empty),
	(reward::UPDATE_NETWORK_KPI, "UpdateNetworkKPI", typed::<BigIntValue>),
];

static MULTISIG: MethodTable = &[
	(multisig::CONSTRUCTOR, "Constructor", typed::<multisig::ConstructorParams>),
	(multisig::PROPOSE, "Propose", typed::<multisig::ProposeParams>),
	(multisig::APPROVE, "Approve", typed::<multisig::TxnIdParams>),
	(multisig::CANCEL, "Cancel", typed::<multisig::TxnIdParams>),
	(multisig::ADD_SIGNER, "AddSigner", typed::<multisig::AddSignerParams>),
	(multisig::REMOVE_SIGNER, "RemoveSigner", typed::<multisig::RemoveSignerParams>),
	(multisig::SWAP_SIGNER, "SwapSigner", typed::<multisig::SwapSignerParams>),
	(
		multisig::CHANGE_NUM_APPROVALS_THRESHOLD,
		"ChangeNumApprovalsThreshold",
		typed::<multisig::ChangeNumApprovalsThresholdParams>,
	),
	(multisig::LOCK_BALANCE, "LockBalance", typed::<multisig::LockBalanceParams>),
];

static PAYCH: MethodTable = &[
	(paych::CONSTRUCTOR, "Constructor", typed::<paych::ConstructorParams>),
	(paych::UPDATE_CHANNEL_STATE, "UpdateChannelState", structural),
	(paych::SETTLE, "Settle", empty),
	(paych::COLLECT, "Collect", empty),
];

static MARKET: MethodTable = &[
	(market::CONSTRUCTOR, "Constructor", empty),
	(market::ADD_BALANCE, "AddBalance", typed::<Address>),
	(market::WITHDRAW_BALANCE, "WithdrawBalance", typed::<market::WithdrawBalanceParams>),
	(market::PUBLISH_STORAGE_DEALS, "PublishStorageDeals", structural),
	(market::VERIFY_DEALS_FOR_ACTIVATION, "VerifyDealsForActivation", structural),
	(market::ACTIVATE_DEALS, "ActivateDeals", structural),
	(market::ON_MINER_SECTORS_TERMINATE, "OnMinerSectorsTerminate", structural),
	(market::COMPUTE_DATA_COMMITMENT, "ComputeDataCommitment", structural),
	(market::CRON_TICK, "CronTick", empty),
];

static POWER: MethodTable = &[
	(power::CONSTRUCTOR, "Constructor", empty),
	(power::CREATE_MINER, "CreateMiner", typed::<power::CreateMinerParams>),
	(power::UPDATE_CLAIMED_POWER, "UpdateClaimedPower", typed::<power::UpdateClaimedPowerParams>),
	(power::ENROLL_CRON_EVENT, "EnrollCronEvent", typed::<power::EnrollCronEventParams>),
	(power::ON_EPOCH_TICK_END, "OnEpochTickEnd", empty),
	(power::UPDATE_PLEDGE_TOTAL, "UpdatePledgeTotal", typed::<TokenAmount>),
	(power::SUBMIT_POREP_FOR_BULK_VERIFY, "SubmitPoRepForBulkVerify", structural),
	(power::CURRENT_TOTAL_POWER, "CurrentTotalPower", empty),
];

static MINER: MethodTable = &[
	(miner::CONSTRUCTOR, "Constructor", structural),
	(miner::CONTROL_ADDRESSES, "ControlAddresses", empty),
	(miner::CHANGE_WORKER_ADDRESS, "ChangeWorkerAddress", typed::<miner::ChangeWorkerAddressParams>),
	(miner::CHANGE_PEER_ID, "ChangePeerID", typed::<miner::ChangePeerIdParams>),
	(miner::SUBMIT_WINDOWED_POST, "SubmitWindowedPoSt", structural),
	(miner::PRE_COMMIT_SECTOR, "PreCommitSector", structural),
	(miner::PROVE_COMMIT_SECTOR, "ProveCommitSector", typed::<miner::ProveCommitSectorParams>),
	(miner::EXTEND_SECTOR_EXPIRATION, "ExtendSectorExpiration", structural),
	(miner::TERMINATE_SECTORS, "TerminateSectors", structural),
	(miner::DECLARE_FAULTS, "DeclareFaults", structural),
	(miner::DECLARE_FAULTS_RECOVERED, "DeclareFaultsRecovered", structural),
	(miner::ON_DEFERRED_CRON_EVENT, "OnDeferredCronEvent", structural),
	(miner::CHECK_SECTOR_PROVEN, "CheckSectorProven", typed::<miner::CheckSectorProvenParams>),
	(miner::APPLY_REWARDS, "ApplyRewards", typed::<miner::ApplyRewardParams>),
	(
		miner::REPORT_CONSENSUS_FAULT,
		"ReportConsensusFault",
		typed::<miner::ReportConsensusFaultParams>,
	),
	(miner::WITHDRAW_BALANCE, "WithdrawBalance", typed::<miner::WithdrawBalanceParams>),
	(miner::CONFIRM_SECTOR_PROOFS_VALID, "ConfirmSectorProofsValid", structural),
	(miner::CHANGE_MULTIADDRS, "ChangeMultiaddrs", typed::<miner::ChangeMultiaddrsParams>),
	(miner::COMPACT_PARTITIONS, "CompactPartitions", structural),
	(miner::COMPACT_SECTOR_NUMBERS, "CompactSectorNumbers", structural),
	(miner::CONFIRM_UPDATE_WORKER_KEY, "ConfirmUpdateWorkerKey", empty),
	(miner::REPAY_DEBT, "RepayDebt", empty),
	(miner::CHANGE_OWNER_ADDRESS, "ChangeOwnerAddress", typed::<Address>),
	(
		miner::DISPUTE_WINDOWED_POST,
		"DisputeWindowedPoSt",
		typed::<miner::DisputeWindowedPoStParams>,
	),
	(miner::PRE_COMMIT_SECTOR_BATCH, "PreCommitSectorBatch", structural),
	(miner::PROVE_COMMIT_AGGREGATE, "ProveCommitAggregate", structural),
];

static VERIFREG: MethodTable = &[
	(verifreg::CONSTRUCTOR, "Constructor", typed::<Address>),
	(verifreg::ADD_VERIFIER, "AddVerifier", typed::<verifreg::AllowanceParams>),
	(verifreg::REMOVE_VERIFIER, "RemoveVerifier", typed::<Address>),
	(verifreg::ADD_VERIFIED_CLIENT, "AddVerifiedClient", typed::<verifreg::AllowanceParams>),
	(verifreg::USE_BYTES, "UseBytes", typed::<verifreg::BytesParams>),
	(verifreg::RESTORE_BYTES, "RestoreBytes", typed::<verifreg::BytesParams>),
];

fn table(kind: ActorKind) -> MethodTable {
	match kind {
		ActorKind::System => SYSTEM,
		ActorKind::Init => INIT,
		ActorKind::Cron => CRON,
		ActorKind::Account => ACCOUNT,
		ActorKind::Reward => REWARD,
		ActorKind::PaymentChannel => PAYCH,
		ActorKind::StorageMarket => MARKET,
		ActorKind::StoragePower => POWER,
		ActorKind::StorageMiner => MINER,
		ActorKind::Multisig => MULTISIG,
		ActorKind::VerifiedRegistry => VERIFREG,
	}
}

// -- Registry --

pub struct MethodMeta {
	pub actor: ActorKind,
	pub name: &'static str,
	decoder: Decoder,
}

impl MethodMeta {
	/// Decode raw parameter bytes into a printable value.
	pub fn decode(&self, params: &[u8]) -> Result<DecodedParams, RegistryError> {
		(self.decoder)(params).map_err(|reason| RegistryError::Malformed {
			actor: self.actor.name(),
			method: self.name,
			reason,
		})
	}
}

impl fmt::Debug for MethodMeta {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.actor.name(), self.name)
	}
}

/// (actor kind, method number) -> method metadata for every built-in actor.
pub struct MethodRegistry {
	methods: HashMap<(ActorKind, MethodNum), MethodMeta>,
}

static REGISTRY: Lazy<MethodRegistry> = Lazy::new(MethodRegistry::build);

/// The process-wide registry, built on first use.
pub fn registry() -> &'static MethodRegistry {
	&REGISTRY
}

impl MethodRegistry {
	fn build() -> Self {
		let mut methods = HashMap::new();
		for actor in ActorKind::ALL {
			methods.insert(
				(actor, METHOD_SEND),
				MethodMeta {
					actor,
					name: "Send",
					decoder: empty,
				},
			);
			for &(num, name, decoder) in table(actor) {
				methods.insert((actor, num), MethodMeta { actor, name, decoder });
			}
		}
		log::debug!("method registry built with {} entries", methods.len());
		Self { methods }
	}

	pub fn len(&self) -> usize {
		self.methods.len()
	}

	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}

	pub fn get(&self, actor: ActorKind, method: MethodNum) -> Option<&MethodMeta> {
		self.methods.get(&(actor, method))
	}

	/// Look up by the actor code reported by the node.
	pub fn lookup(&self, code: &Cid, method: MethodNum) -> Result<&MethodMeta, RegistryError> {
		let actor = ActorKind::from_code(code).ok_or(RegistryError::UnknownActor(*code))?;
		self.get(actor, method)
			.ok_or(RegistryError::UnknownMethod { code: *code, method })
	}
}
