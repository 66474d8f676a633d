use super::{parse_address, parse_amount, required, Account, Engine, Outcome, Route, PUSH_STEPS};
use crate::error::EngineError;
use crate::progress::Progress;
use crate::tx_builder;

impl Engine {
	/// First step of an owner change: name the new owner.
	pub async fn propose_change_owner(
		&self,
		key: &str,
		miner: &str,
		new_owner: &str,
		route: &Route,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		let _gate = self.acquire()?;
		let miner = parse_address("miner", miner)?;
		let account = Account::open(key)?;
		let new_owner = parse_address("new owner", new_owner)?;

		let (ids, start) = self.resolve_ids(vec![new_owner], progress).await?;
		let call = tx_builder::change_owner(miner, &ids[0])?;
		self.execute(&account, route, call, start, progress).await
	}

	/// Second step: the new owner accepts. Sent directly, the signer's
	/// own account is the new owner; through a multisig, the wallet is.
	pub async fn confirm_change_owner(
		&self,
		key: &str,
		miner: &str,
		route: &Route,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		let _gate = self.acquire()?;
		let miner = parse_address("miner", miner)?;
		let account = Account::open(key)?;

		let owner = match route {
			Route::Direct => account.address.clone(),
			Route::ViaMultisig(msig) => msig.clone(),
		};
		let (ids, start) = self.resolve_ids(vec![owner], progress).await?;
		let call = tx_builder::change_owner(miner, &ids[0])?;
		self.execute(&account, route, call, start, progress).await
	}

	/// Withdraw from the miner's available balance to its owner.
	pub async fn withdraw(
		&self,
		key: &str,
		miner: &str,
		amount: &str,
		route: &Route,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		let _gate = self.acquire()?;
		required("miner", miner)?;
		required("amount", amount)?;
		let miner = parse_address("miner", miner)?;
		let amount = parse_amount("amount", amount)?;
		let account = Account::open(key)?;

		progress.report(1.0 / (1 + PUSH_STEPS) as f64);
		let available = self.gateway.miner_available_balance(&miner).await?;
		if available < amount {
			return Err(EngineError::InsufficientMinerBalance {
				available,
				requested: amount,
			});
		}

		let call = tx_builder::withdraw(miner, amount)?;
		self.execute(&account, route, call, 1, progress).await
	}

	/// Start a worker change. Worker and control addresses are resolved
	/// to ID form first.
	pub async fn propose_change_worker(
		&self,
		key: &str,
		miner: &str,
		new_worker: &str,
		controls: &[String],
		route: &Route,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		let _gate = self.acquire()?;
		let miner = parse_address("miner", miner)?;
		let mut addrs = vec![parse_address("new worker", new_worker)?];
		for c in controls {
			addrs.push(parse_address("control address", c)?);
		}
		let account = Account::open(key)?;

		let (mut ids, start) = self.resolve_ids(addrs, progress).await?;
		let controls = ids.split_off(1);
		let worker = ids.remove(0);
		let call = tx_builder::change_worker(miner, worker, controls)?;
		self.execute(&account, route, call, start, progress).await
	}

	/// Apply a worker change once its delay has passed.
	pub async fn confirm_change_worker(
		&self,
		key: &str,
		miner: &str,
		route: &Route,
		progress: &dyn Progress,
	) -> Result<Outcome, EngineError> {
		let _gate = self.acquire()?;
		let miner = parse_address("miner", miner)?;
		let account = Account::open(key)?;
		self.execute(&account, route, tx_builder::confirm_change_worker(miner), 0, progress)
			.await
	}
}
