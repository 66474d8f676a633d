//! Engine behaviour against a scripted in-memory gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cid::Cid;
use tokio::sync::Notify;

use filmsig::actors::multisig::{ApproveReturn, ProposeParams, ProposeReturn};
use filmsig::actors::miner::ChangeWorkerAddressParams;
use filmsig::actors::{miner, multisig, ActorKind};
use filmsig::address::Address;
use filmsig::encoding::{from_cbor, to_cbor, RawBytes};
use filmsig::engine::{Engine, Outcome, Proposal, Route, Settings};
use filmsig::error::{EngineError, GatewayError, RegistryError};
use filmsig::keyinfo::{KeyInfo, KeyType};
use filmsig::message::{SignedMessage, SigType, UnsignedMessage};
use filmsig::progress::{Progress, Silent};
use filmsig::rpc::{ChainGateway, PendingTransaction};
use filmsig::signer;
use filmsig::token::TokenAmount;

// -- Scripted gateway --

#[derive(Default)]
struct State {
	balance: TokenAmount,
	miner_available: TokenAmount,
	nonce: u64,
	/// Return bytes, or the exit code the message fails with.
	receipt: Option<Result<Vec<u8>, i64>>,
	pending: Vec<PendingTransaction>,
	codes: HashMap<Address, Cid>,
	ids: HashMap<Address, Address>,

	calls: Mutex<Vec<&'static str>>,
	pushed: Mutex<Vec<SignedMessage>>,
	/// When set, `get_balance` signals the first notify and waits on the second.
	hold: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl State {
	fn record(&self, call: &'static str) {
		self.calls.lock().unwrap().push(call);
	}

	fn calls(&self) -> Vec<&'static str> {
		self.calls.lock().unwrap().clone()
	}

	fn last_pushed(&self) -> UnsignedMessage {
		self.pushed.lock().unwrap().last().unwrap().message.clone()
	}
}

struct Scripted(Arc<State>);

#[async_trait]
impl ChainGateway for Scripted {
	async fn get_nonce(&self, _addr: &Address) -> Result<u64, GatewayError> {
		self.0.record("get_nonce");
		Ok(self.0.nonce)
	}

	async fn estimate_gas(
		&self,
		_max_fee: &TokenAmount,
		mut msg: UnsignedMessage,
	) -> Result<UnsignedMessage, GatewayError> {
		self.0.record("estimate_gas");
		msg.gas_limit = 1_000_000;
		msg.gas_premium = TokenAmount::from_atto(100);
		Ok(msg)
	}

	async fn push_signed(&self, msg: &SignedMessage) -> Result<Cid, GatewayError> {
		self.0.record("push");
		self.0.pushed.lock().unwrap().push(msg.clone());
		msg.message.cid().map_err(GatewayError::Encode)
	}

	async fn get_balance(&self, _addr: &Address) -> Result<TokenAmount, GatewayError> {
		self.0.record("get_balance");
		if let Some((entered, release)) = &self.0.hold {
			entered.notify_one();
			release.notified().await;
		}
		Ok(self.0.balance.clone())
	}

	async fn wait_for_receipt(&self, cid: &Cid, _confidence: u64) -> Result<Vec<u8>, GatewayError> {
		self.0.record("wait");
		match &self.0.receipt {
			Some(Err(code)) => Err(GatewayError::ExitCode { cid: *cid, code: *code }),
			Some(Ok(ret)) => Ok(ret.clone()),
			None => Ok(Vec::new()),
		}
	}

	async fn resolve_to_id(&self, addr: &Address) -> Result<Address, GatewayError> {
		self.0.record("resolve_to_id");
		self.0.ids.get(addr).cloned().ok_or_else(|| GatewayError::Remote {
			method: "Filecoin.StateLookupID",
			code: 1,
			message: format!("actor {addr} not found"),
		})
	}

	async fn miner_available_balance(&self, _miner: &Address) -> Result<TokenAmount, GatewayError> {
		self.0.record("miner_available_balance");
		Ok(self.0.miner_available.clone())
	}

	async fn pending_multisig(&self, _msig: &Address) -> Result<Vec<PendingTransaction>, GatewayError> {
		self.0.record("pending_multisig");
		Ok(self.0.pending.clone())
	}

	async fn actor_code(&self, addr: &Address) -> Result<Cid, GatewayError> {
		self.0.record("actor_code");
		self.0.codes.get(addr).copied().ok_or_else(|| GatewayError::Remote {
			method: "Filecoin.StateGetActor",
			code: 1,
			message: format!("actor {addr} not found"),
		})
	}
}

#[derive(Default)]
struct Recorded(Mutex<Vec<f64>>);

impl Progress for Recorded {
	fn report(&self, fraction: f64) {
		self.0.lock().unwrap().push(fraction);
	}
}

impl Recorded {
	fn fractions(&self) -> Vec<f64> {
		self.0.lock().unwrap().clone()
	}
}

// -- Fixtures --

fn fil(n: u64) -> TokenAmount {
	TokenAmount::from_whole(n)
}

fn settings(aes_key: Option<[u8; 32]>) -> Settings {
	Settings {
		max_fee: fil(1),
		gas_fee_cap: TokenAmount::from_atto(12345),
		confidence: 1,
		aes_key,
	}
}

fn engine_with(state: State) -> (Engine, Arc<State>) {
	let state = Arc::new(state);
	let engine = Engine::new(Box::new(Scripted(state.clone())), settings(Some([3u8; 32])));
	(engine, state)
}

fn secp_key() -> String {
	KeyInfo {
		key_type: KeyType::Secp256k1,
		private_key: vec![1u8; 32],
	}
	.to_hex()
	.unwrap()
}

fn secp_address() -> Address {
	signer::for_key_type(KeyType::Secp256k1)
		.to_address(&[1u8; 32])
		.unwrap()
}

fn msig() -> Address {
	Address::new_id(2000)
}

fn propose_return(txn_id: i64, applied: bool, code: i64) -> Vec<u8> {
	to_cbor(&ProposeReturn {
		txn_id,
		applied,
		code,
		ret: RawBytes::default(),
	})
	.unwrap()
}

// -- Direct sends --

#[tokio::test]
async fn send_below_fee_plus_amount_fails_before_nonce() {
	let (engine, state) = engine_with(State {
		balance: fil(9),
		..Default::default()
	});

	let err = engine
		.send(&secp_key(), "f01234", "9", &Route::Direct, &Silent)
		.await
		.unwrap_err();

	match err {
		EngineError::InsufficientFunds { balance, required } => {
			assert_eq!(balance, fil(9));
			assert_eq!(required, fil(10));
		}
		other => panic!("unexpected error {other:?}"),
	}
	assert_eq!(state.calls(), ["get_balance"]);
}

#[tokio::test]
async fn send_at_exact_balance_runs_full_pipeline() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		nonce: 42,
		..Default::default()
	});
	let progress = Recorded::default();

	let outcome = engine
		.send(&secp_key(), "f01234", "9", &Route::Direct, &progress)
		.await
		.unwrap();

	assert_eq!(
		state.calls(),
		["get_balance", "get_nonce", "estimate_gas", "push", "wait"]
	);

	let pushed = state.pushed.lock().unwrap()[0].clone();
	assert_eq!(pushed.message.from, secp_address());
	assert_eq!(pushed.message.to, Address::new_id(1234));
	assert_eq!(pushed.message.value, fil(9));
	assert_eq!(pushed.message.nonce, 42);
	assert_eq!(pushed.message.gas_fee_cap, TokenAmount::from_atto(12345));
	assert_eq!(pushed.signature.sig_type, SigType::Secp256k1);
	assert_eq!(pushed.signature.data.len(), 65);

	match outcome {
		Outcome::Executed { cid, .. } => assert_eq!(cid, pushed.message.cid().unwrap()),
		other => panic!("unexpected outcome {other:?}"),
	}

	let expected: Vec<f64> = (1..=6).map(|k| k as f64 / 6.0).collect();
	assert_eq!(progress.fractions(), expected);
}

#[tokio::test]
async fn failed_receipt_is_reported_as_submitted() {
	let (engine, _state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Err(16)),
		..Default::default()
	});

	let err = engine
		.send(&secp_key(), "f01234", "1", &Route::Direct, &Silent)
		.await
		.unwrap_err();

	assert!(err.was_submitted());
	assert!(matches!(
		err,
		EngineError::Unconfirmed {
			source: GatewayError::ExitCode { code: 16, .. },
			..
		}
	));
}

#[tokio::test]
async fn bad_input_makes_no_calls() {
	let (engine, state) = engine_with(State::default());

	let err = engine
		.send(&secp_key(), "x9999", "1", &Route::Direct, &Silent)
		.await
		.unwrap_err();
	assert!(matches!(err, EngineError::InvalidInput { field: "to", .. }));

	let err = engine
		.send(&secp_key(), "f01234", "1.2.3", &Route::Direct, &Silent)
		.await
		.unwrap_err();
	assert!(matches!(err, EngineError::InvalidInput { field: "amount", .. }));

	assert!(state.calls().is_empty());
}

// -- Multisig propose / approve --

#[tokio::test]
async fn propose_returns_pending_txn_id() {
	let (engine, state) = engine_with(State {
		balance: fil(1),
		receipt: Some(Ok(propose_return(5, false, 0))),
		..Default::default()
	});

	// The wallet pays the value, so only the fee is checked against the signer.
	let outcome = engine
		.send(&secp_key(), "f01234", "100", &Route::ViaMultisig(msig()), &Silent)
		.await
		.unwrap();

	match outcome {
		Outcome::Proposed(p) => assert_eq!(p, Proposal { msig: msig(), txn_id: 5 }),
		other => panic!("unexpected outcome {other:?}"),
	}

	let msg = state.last_pushed();
	assert_eq!(msg.to, msig());
	assert_eq!(msg.method, multisig::PROPOSE);
	assert!(msg.value.is_zero());

	let inner: ProposeParams = from_cbor(&msg.params).unwrap();
	assert_eq!(inner.to, Address::new_id(1234));
	assert_eq!(inner.value, fil(100));
	assert_eq!(inner.method, 0);
	assert!(inner.params.is_empty());
}

#[tokio::test]
async fn propose_applied_immediately_is_an_error() {
	let (engine, _state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(propose_return(0, true, 0))),
		..Default::default()
	});

	let err = engine
		.send(&secp_key(), "f01234", "1", &Route::ViaMultisig(msig()), &Silent)
		.await
		.unwrap_err();

	assert!(matches!(err, EngineError::AppliedDuringPropose { code: 0 }));
	assert!(err.was_submitted());
}

#[tokio::test]
async fn approval_that_executes_still_succeeds() {
	let ret = to_cbor(&ApproveReturn {
		applied: true,
		code: 0,
		ret: RawBytes::default(),
	})
	.unwrap();
	let (engine, state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(ret)),
		..Default::default()
	});

	let approval = engine
		.approve(&secp_key(), "f02000", "5", &Silent)
		.await
		.unwrap();
	assert!(approval.applied);
	assert_eq!(approval.code, 0);

	let msg = state.last_pushed();
	assert_eq!(msg.to, msig());
	assert_eq!(msg.method, multisig::APPROVE);
	assert_eq!(msg.params, vec![0x82, 0x05, 0x40]);
}

#[tokio::test]
async fn cancel_sends_cancel_method() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		..Default::default()
	});

	engine.cancel(&secp_key(), "f02000", "7", &Silent).await.unwrap();
	assert_eq!(state.last_pushed().method, multisig::CANCEL);
}

#[tokio::test]
async fn wallet_management_is_proposed_to_the_wallet() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(propose_return(9, false, 0))),
		..Default::default()
	});

	let p = engine
		.propose_add_signer(&secp_key(), "f02000", "f0300", true, &Silent)
		.await
		.unwrap();
	assert_eq!(p.txn_id, 9);

	let inner: ProposeParams = from_cbor(&state.last_pushed().params).unwrap();
	assert_eq!(inner.to, msig());
	assert_eq!(inner.method, multisig::ADD_SIGNER);
}

#[tokio::test]
async fn lock_balance_requires_every_field() {
	let (engine, state) = engine_with(State::default());

	let err = engine
		.propose_lock_balance(&secp_key(), "f02000", "", "100", "1", &Silent)
		.await
		.unwrap_err();
	assert!(matches!(err, EngineError::InvalidInput { field: "start epoch", .. }));
	assert!(state.calls().is_empty());
}

#[tokio::test]
async fn undecodable_propose_return_counts_as_submitted() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(vec![0xff])),
		..Default::default()
	});

	let err = engine
		.send(&secp_key(), "f01234", "1", &Route::ViaMultisig(msig()), &Silent)
		.await
		.unwrap_err();

	let pushed = state.last_pushed().cid().unwrap();
	match &err {
		EngineError::ReturnUndecodable { cid, what, .. } => {
			assert_eq!(*cid, pushed);
			assert_eq!(*what, "propose return");
		}
		other => panic!("unexpected error {other:?}"),
	}
	assert!(err.was_submitted());
}

#[tokio::test]
async fn undecodable_approve_return_counts_as_submitted() {
	let (engine, _state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(vec![0xff])),
		..Default::default()
	});

	let err = engine
		.approve(&secp_key(), "f02000", "5", &Silent)
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		EngineError::ReturnUndecodable { what: "approve return", .. }
	));
	assert!(err.was_submitted());
}

// -- Create multisig --

#[tokio::test]
async fn create_multisig_validates_before_any_call() {
	let (engine, state) = engine_with(State::default());

	let err = engine
		.create_multisig(&secp_key(), &[], "1", "0", "0", &Silent)
		.await
		.unwrap_err();
	assert!(matches!(err, EngineError::InvalidInput { field: "signers", .. }));

	let signers = vec!["f0100".to_owned(), "f0101".to_owned()];
	let err = engine
		.create_multisig(&secp_key(), &signers, "3", "0", "0", &Silent)
		.await
		.unwrap_err();
	assert!(matches!(err, EngineError::InvalidInput { field: "threshold", .. }));

	assert!(state.calls().is_empty());
}

#[tokio::test]
async fn create_multisig_returns_new_addresses() {
	let exec = to_cbor(&(Address::new_id(3000), Address::new_actor(b"wallet"))).unwrap();
	let (engine, state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(exec)),
		..Default::default()
	});

	let signers = vec!["f0100".to_owned(), "f0101".to_owned()];
	let created = engine
		.create_multisig(&secp_key(), &signers, "2", "0", "5", &Silent)
		.await
		.unwrap();
	assert_eq!(created.id_address, Address::new_id(3000));
	assert_eq!(created.robust_address, Address::new_actor(b"wallet"));

	let msg = state.last_pushed();
	assert_eq!(msg.to, Address::new_id(1));
	assert_eq!(msg.value, fil(5));
}

#[tokio::test]
async fn undecodable_exec_return_names_the_message() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(vec![0xff])),
		..Default::default()
	});

	let signers = vec!["f0100".to_owned()];
	let err = engine
		.create_multisig(&secp_key(), &signers, "1", "0", "", &Silent)
		.await
		.unwrap_err();

	let pushed = state.last_pushed().cid().unwrap();
	assert!(matches!(
		&err,
		EngineError::ReturnUndecodable { cid, what, .. } if *cid == pushed && *what == "exec return"
	));
	assert!(err.was_submitted());
	assert!(err.to_string().contains(&pushed.to_string()));
}

// -- Miner operations --

#[tokio::test]
async fn change_owner_resolves_new_owner_first() {
	let owner = secp_address();
	let mut ids = HashMap::new();
	ids.insert(owner.clone(), Address::new_id(777));
	let (engine, state) = engine_with(State {
		balance: fil(10),
		ids,
		..Default::default()
	});
	let progress = Recorded::default();

	engine
		.propose_change_owner(&secp_key(), "f01000", &owner.to_string(), &Route::Direct, &progress)
		.await
		.unwrap();

	assert_eq!(state.calls()[0], "resolve_to_id");
	let msg = state.last_pushed();
	assert_eq!(msg.method, miner::CHANGE_OWNER_ADDRESS);
	assert_eq!(from_cbor::<Address>(&msg.params).unwrap(), Address::new_id(777));

	let fractions = progress.fractions();
	assert_eq!(fractions.len(), 7);
	assert_eq!(fractions[0], 1.0 / 7.0);
	assert_eq!(fractions[6], 1.0);
}

#[tokio::test]
async fn confirm_owner_through_wallet_names_the_wallet() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		receipt: Some(Ok(propose_return(1, false, 0))),
		..Default::default()
	});

	engine
		.confirm_change_owner(&secp_key(), "f01000", &Route::ViaMultisig(msig()), &Silent)
		.await
		.unwrap();

	// Already an ID address: no lookup needed.
	assert!(!state.calls().contains(&"resolve_to_id"));
	let inner: ProposeParams = from_cbor(&state.last_pushed().params).unwrap();
	assert_eq!(from_cbor::<Address>(&inner.params.0).unwrap(), msig());
}

#[tokio::test]
async fn change_worker_resolves_worker_and_controls() {
	let worker = Address::new_actor(b"worker");
	let control = secp_address();
	let mut ids = HashMap::new();
	ids.insert(worker.clone(), Address::new_id(801));
	ids.insert(control.clone(), Address::new_id(802));
	let (engine, state) = engine_with(State {
		balance: fil(10),
		ids,
		..Default::default()
	});
	let progress = Recorded::default();

	let controls = vec!["f0500".to_owned(), control.to_string()];
	engine
		.propose_change_worker(
			&secp_key(),
			"f01000",
			&worker.to_string(),
			&controls,
			&Route::Direct,
			&progress,
		)
		.await
		.unwrap();

	assert_eq!(
		state.calls(),
		[
			"resolve_to_id",
			"resolve_to_id",
			"get_balance",
			"get_nonce",
			"estimate_gas",
			"push",
			"wait"
		]
	);

	let msg = state.last_pushed();
	assert_eq!(msg.to, Address::new_id(1000));
	assert_eq!(msg.method, miner::CHANGE_WORKER_ADDRESS);
	let params: ChangeWorkerAddressParams = from_cbor(&msg.params).unwrap();
	assert_eq!(params.new_worker, Address::new_id(801));
	assert_eq!(
		params.new_control_addrs,
		[Address::new_id(500), Address::new_id(802)]
	);

	let expected: Vec<f64> = (1..=8).map(|k| k as f64 / 8.0).collect();
	assert_eq!(progress.fractions(), expected);
}

#[tokio::test]
async fn confirm_worker_sends_method_without_params() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		..Default::default()
	});

	engine
		.confirm_change_worker(&secp_key(), "f01000", &Route::Direct, &Silent)
		.await
		.unwrap();

	assert!(!state.calls().contains(&"resolve_to_id"));
	let msg = state.last_pushed();
	assert_eq!(msg.to, Address::new_id(1000));
	assert_eq!(msg.method, miner::CONFIRM_UPDATE_WORKER_KEY);
	assert!(msg.params.is_empty());
	assert!(msg.value.is_zero());
}

#[tokio::test]
async fn withdraw_checks_available_balance() {
	let (engine, state) = engine_with(State {
		balance: fil(10),
		miner_available: fil(1),
		..Default::default()
	});

	let err = engine
		.withdraw(&secp_key(), "f01000", "2", &Route::Direct, &Silent)
		.await
		.unwrap_err();

	assert!(matches!(err, EngineError::InsufficientMinerBalance { .. }));
	assert_eq!(state.calls(), ["miner_available_balance"]);
}

#[tokio::test]
async fn withdraw_requires_amount() {
	let (engine, state) = engine_with(State::default());

	let err = engine
		.withdraw(&secp_key(), "f01000", " ", &Route::Direct, &Silent)
		.await
		.unwrap_err();
	assert!(matches!(err, EngineError::InvalidInput { field: "amount", .. }));
	assert!(state.calls().is_empty());
}

// -- Pending proposals --

#[tokio::test]
async fn pending_proposals_are_decoded() {
	let mut codes = HashMap::new();
	codes.insert(Address::new_id(1000), ActorKind::StorageMiner.code().unwrap());
	let (engine, _state) = engine_with(State {
		pending: vec![PendingTransaction {
			id: 3,
			to: Address::new_id(1000),
			value: TokenAmount::zero(),
			method: miner::CHANGE_OWNER_ADDRESS,
			params: vec![0x43, 0x00, 0xe8, 0x07],
			approved: vec![Address::new_id(100)],
		}],
		codes,
		..Default::default()
	});
	let progress = Recorded::default();

	let views = engine.pending_proposals("f02000", &progress).await.unwrap();
	assert_eq!(views.len(), 1);
	assert_eq!(views[0].id, 3);
	assert_eq!(views[0].method, "ChangeOwnerAddress");
	assert_eq!(views[0].params, "f01000");
	assert_eq!(views[0].approved, [Address::new_id(100)]);
	assert_eq!(progress.fractions(), [0.5, 1.0]);
}

#[tokio::test]
async fn unregistered_method_fails_the_whole_listing() {
	let mut codes = HashMap::new();
	codes.insert(Address::new_id(1000), ActorKind::StorageMiner.code().unwrap());
	let (engine, _state) = engine_with(State {
		pending: vec![PendingTransaction {
			id: 1,
			to: Address::new_id(1000),
			value: TokenAmount::zero(),
			method: 99,
			params: Vec::new(),
			approved: Vec::new(),
		}],
		codes,
		..Default::default()
	});

	let err = engine.pending_proposals("f02000", &Silent).await.unwrap_err();
	assert!(matches!(
		err,
		EngineError::Registry(RegistryError::UnknownMethod { method: 99, .. })
	));
}

#[tokio::test]
async fn empty_listing_completes_progress() {
	let (engine, _state) = engine_with(State::default());
	let progress = Recorded::default();

	assert!(engine.pending_proposals("f02000", &progress).await.unwrap().is_empty());
	assert_eq!(progress.fractions(), [1.0]);
}

// -- Keys --

#[tokio::test]
async fn key_codec_is_disabled_without_aes_key() {
	let engine = Engine::new(Box::new(Scripted(Arc::default())), settings(None));
	assert!(matches!(
		engine.encrypt_key(&secp_key()),
		Err(EngineError::KeyCodecDisabled)
	));
	assert!(matches!(
		engine.decrypt_key(&secp_key()),
		Err(EngineError::KeyCodecDisabled)
	));
}

#[tokio::test]
async fn encrypt_then_decrypt_restores_key() {
	let (engine, _state) = engine_with(State::default());

	let encrypted = engine.encrypt_key(&secp_key()).unwrap();
	assert_eq!(encrypted.address, secp_address());
	assert_ne!(encrypted.record, secp_key());

	let decrypted = engine.decrypt_key(&encrypted.record).unwrap();
	assert_eq!(decrypted.record, secp_key());
	assert_eq!(decrypted.address, secp_address());
}

#[tokio::test]
async fn sign_raw_prefixes_signature_type() {
	let (engine, _state) = engine_with(State::default());

	let sig = engine.sign_raw(&secp_key(), "0xdeadbeef").unwrap();
	let sig = hex::decode(sig).unwrap();
	assert_eq!(sig[0], 1);
	assert_eq!(sig.len(), 66);
}

#[tokio::test]
async fn generated_keys_open_to_their_address() {
	let (engine, _state) = engine_with(State::default());

	let generated = engine.generate_key("bls").unwrap();
	assert_eq!(engine.address_of(&generated.record).unwrap(), generated.address);
	assert!(matches!(
		engine.generate_key("ed25519"),
		Err(EngineError::InvalidInput { field: "key type", .. })
	));
}

// -- Gate --

#[tokio::test]
async fn second_operation_is_rejected_while_one_runs() {
	let entered = Arc::new(Notify::new());
	let release = Arc::new(Notify::new());
	let (engine, _state) = engine_with(State {
		balance: fil(10),
		hold: Some((entered.clone(), release.clone())),
		..Default::default()
	});

	let key = secp_key();
	let first = engine.send(&key, "f01234", "1", &Route::Direct, &Silent);
	let second = async {
		entered.notified().await;
		let r = engine.address_of(&secp_key());
		release.notify_one();
		r
	};
	let (first, second) = tokio::join!(first, second);

	assert!(first.is_ok());
	assert!(matches!(second, Err(EngineError::Busy)));

	// Released once the first finished.
	assert_eq!(engine.address_of(&secp_key()).unwrap(), secp_address());
}
