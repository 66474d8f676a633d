use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cid::Cid;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::address::Address;
use crate::encoding::base64_bytes;
use crate::error::GatewayError;
use crate::message::{MethodNum, SignedMessage, UnsignedMessage};
use crate::signer::Signer;
use crate::token::TokenAmount;

/// The chain operations the engine needs from a node.
///
/// Implemented over HTTP by [`LotusClient`]; tests drive the engine with
/// scripted implementations.
#[async_trait]
pub trait ChainGateway: Send + Sync {
	async fn get_nonce(&self, addr: &Address) -> Result<u64, GatewayError>;

	/// Fill in gas limit, fee cap and premium, spending at most `max_fee`.
	async fn estimate_gas(
		&self,
		max_fee: &TokenAmount,
		msg: UnsignedMessage,
	) -> Result<UnsignedMessage, GatewayError>;

	async fn push_signed(&self, msg: &SignedMessage) -> Result<Cid, GatewayError>;

	/// Sign the message CID with `signer` and push the result to the pool.
	async fn submit(
		&self,
		private_key: &[u8],
		msg: UnsignedMessage,
		signer: &dyn Signer,
	) -> Result<Cid, GatewayError> {
		let signed = msg.sign(private_key, signer)?;
		self.push_signed(&signed).await
	}

	async fn get_balance(&self, addr: &Address) -> Result<TokenAmount, GatewayError>;

	/// Block until `cid` executed with `confidence` blocks on top. A
	/// non-zero exit code is an error; otherwise returns the return bytes.
	async fn wait_for_receipt(&self, cid: &Cid, confidence: u64) -> Result<Vec<u8>, GatewayError>;

	async fn resolve_to_id(&self, addr: &Address) -> Result<Address, GatewayError>;

	async fn miner_available_balance(&self, miner: &Address) -> Result<TokenAmount, GatewayError>;

	async fn pending_multisig(&self, msig: &Address) -> Result<Vec<PendingTransaction>, GatewayError>;

	async fn actor_code(&self, addr: &Address) -> Result<Cid, GatewayError>;
}

// -- Wire types --

/// A multisig transaction waiting for approvals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PendingTransaction {
	#[serde(rename = "ID")]
	pub id: i64,
	pub to: Address,
	pub value: TokenAmount,
	pub method: MethodNum,
	#[serde(with = "base64_bytes", default)]
	pub params: Vec<u8>,
	#[serde(deserialize_with = "null_as_empty", default)]
	pub approved: Vec<Address>,
}

/// CIDs travel as `{"/": "<cid>"}` in Lotus JSON.
#[derive(Serialize, Deserialize)]
struct CidJson {
	#[serde(rename = "/")]
	cid: String,
}

impl CidJson {
	fn new(cid: &Cid) -> Self {
		Self { cid: cid.to_string() }
	}

	fn parse(self, method: &'static str) -> Result<Cid, GatewayError> {
		Cid::try_from(self.cid.as_str()).map_err(|e| GatewayError::Response {
			method,
			reason: format!("bad cid {:?}: {e}", self.cid),
		})
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MsgLookup {
	receipt: Receipt,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Receipt {
	exit_code: i64,
	#[serde(rename = "Return", with = "base64_bytes", default)]
	ret: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ActorJson {
	code: CidJson,
}

fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

// -- Lotus client --

/// JSON-RPC 2.0 client for a Lotus node's HTTP endpoint.
///
/// No client-side timeout: `StateWaitMsg` legitimately blocks for
/// several blocks.
pub struct LotusClient {
	endpoint: String,
	token: Option<String>,
	http: reqwest::Client,
	next_id: AtomicU64,
}

impl LotusClient {
	pub fn new(endpoint: &str, token: &str) -> Result<Self, GatewayError> {
		let url = reqwest::Url::parse(endpoint).map_err(|e| GatewayError::Endpoint {
			endpoint: endpoint.to_owned(),
			reason: e.to_string(),
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(GatewayError::Endpoint {
				endpoint: endpoint.to_owned(),
				reason: format!("unsupported scheme {:?}, use http or https", url.scheme()),
			});
		}

		let token = token.trim();
		let token = token.strip_prefix("Bearer ").unwrap_or(token);

		Ok(Self {
			endpoint: url.to_string(),
			token: (!token.is_empty()).then(|| token.to_owned()),
			http: reqwest::Client::new(),
			next_id: AtomicU64::new(1),
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	async fn call<T: DeserializeOwned>(&self, method: &'static str, params: Value) -> Result<T, GatewayError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});
		log::debug!("rpc #{id} {method}");

		let mut req = self.http.post(&self.endpoint).json(&body);
		if let Some(token) = &self.token {
			req = req.bearer_auth(token);
		}
		let resp = req
			.send()
			.await
			.map_err(|source| GatewayError::Transport { method, source })?;

		let status = resp.status();
		if !status.is_success() {
			let text = resp.text().await.unwrap_or_default();
			return Err(GatewayError::Remote {
				method,
				code: i64::from(status.as_u16()),
				message: text.trim().to_owned(),
			});
		}

		let resp: Value = resp
			.json()
			.await
			.map_err(|source| GatewayError::Transport { method, source })?;

		if let Some(err) = resp.get("error").filter(|e| !e.is_null()) {
			return Err(GatewayError::Remote {
				method,
				code: err.get("code").and_then(Value::as_i64).unwrap_or_default(),
				message: err
					.get("message")
					.and_then(Value::as_str)
					.unwrap_or_default()
					.to_owned(),
			});
		}

		let result = resp.get("result").cloned().unwrap_or(Value::Null);
		serde_json::from_value(result).map_err(|e| GatewayError::Response {
			method,
			reason: e.to_string(),
		})
	}
}

fn to_value<T: Serialize>(method: &'static str, v: T) -> Result<Value, GatewayError> {
	serde_json::to_value(v).map_err(|e| GatewayError::Response {
		method,
		reason: e.to_string(),
	})
}

#[async_trait]
impl ChainGateway for LotusClient {
	async fn get_nonce(&self, addr: &Address) -> Result<u64, GatewayError> {
		self.call("Filecoin.MpoolGetNonce", json!([addr])).await
	}

	async fn estimate_gas(
		&self,
		max_fee: &TokenAmount,
		msg: UnsignedMessage,
	) -> Result<UnsignedMessage, GatewayError> {
		const METHOD: &str = "Filecoin.GasEstimateMessageGas";
		let msg = to_value(METHOD, &msg)?;
		let spec = json!({ "MaxFee": to_value(METHOD, max_fee)? });
		self.call(METHOD, json!([msg, spec, null])).await
	}

	async fn push_signed(&self, msg: &SignedMessage) -> Result<Cid, GatewayError> {
		const METHOD: &str = "Filecoin.MpoolPush";
		let cid: CidJson = self.call(METHOD, json!([to_value(METHOD, msg)?])).await?;
		let cid = cid.parse(METHOD)?;
		log::info!("pushed message {cid} from {}", msg.message.from);
		Ok(cid)
	}

	async fn get_balance(&self, addr: &Address) -> Result<TokenAmount, GatewayError> {
		self.call("Filecoin.WalletBalance", json!([addr])).await
	}

	async fn wait_for_receipt(&self, cid: &Cid, confidence: u64) -> Result<Vec<u8>, GatewayError> {
		let lookup: MsgLookup = self
			.call("Filecoin.StateWaitMsg", json!([CidJson::new(cid), confidence]))
			.await?;
		let code = lookup.receipt.exit_code;
		if code != 0 {
			log::warn!("message {cid} failed with exit code {code}");
			return Err(GatewayError::ExitCode { cid: *cid, code });
		}
		log::info!("message {cid} confirmed");
		Ok(lookup.receipt.ret)
	}

	async fn resolve_to_id(&self, addr: &Address) -> Result<Address, GatewayError> {
		if addr.is_id() {
			return Ok(addr.clone());
		}
		self.call("Filecoin.StateLookupID", json!([addr, null])).await
	}

	async fn miner_available_balance(&self, miner: &Address) -> Result<TokenAmount, GatewayError> {
		self.call("Filecoin.StateMinerAvailableBalance", json!([miner, null]))
			.await
	}

	async fn pending_multisig(&self, msig: &Address) -> Result<Vec<PendingTransaction>, GatewayError> {
		let pending: Option<Vec<PendingTransaction>> =
			self.call("Filecoin.MsigGetPending", json!([msig, null])).await?;
		Ok(pending.unwrap_or_default())
	}

	async fn actor_code(&self, addr: &Address) -> Result<Cid, GatewayError> {
		const METHOD: &str = "Filecoin.StateGetActor";
		let actor: ActorJson = self.call(METHOD, json!([addr, null])).await?;
		actor.code.parse(METHOD)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_must_be_http() {
		assert!(LotusClient::new("http://127.0.0.1:1234/rpc/v0", "").is_ok());
		assert!(matches!(
			LotusClient::new("ws://127.0.0.1:1234/rpc/v0", ""),
			Err(GatewayError::Endpoint { .. })
		));
		assert!(matches!(
			LotusClient::new("not a url", ""),
			Err(GatewayError::Endpoint { .. })
		));
	}

	#[test]
	fn bearer_prefix_is_stripped() {
		let client = LotusClient::new("http://localhost:1234/rpc/v0", "Bearer abc.def").unwrap();
		assert_eq!(client.token.as_deref(), Some("abc.def"));

		let client = LotusClient::new("http://localhost:1234/rpc/v0", "  ").unwrap();
		assert_eq!(client.token, None);
	}

	#[test]
	fn pending_transaction_from_lotus_json() {
		let tx: PendingTransaction = serde_json::from_value(json!({
			"ID": 3,
			"To": "f01000",
			"Value": "1000000000000000000",
			"Method": 23,
			"Params": "QwDoBw==",
			"Approved": ["f0100"]
		}))
		.unwrap();
		assert_eq!(tx.id, 3);
		assert_eq!(tx.to, Address::new_id(1000));
		assert_eq!(tx.value, TokenAmount::from_whole(1));
		assert_eq!(tx.params, vec![0x43, 0x00, 0xe8, 0x07]);
		assert_eq!(tx.approved, vec![Address::new_id(100)]);
	}

	#[test]
	fn pending_transaction_tolerates_nulls() {
		let tx: PendingTransaction = serde_json::from_value(json!({
			"ID": 0,
			"To": "f099",
			"Value": "0",
			"Method": 0,
			"Params": null,
			"Approved": null
		}))
		.unwrap();
		assert!(tx.params.is_empty());
		assert!(tx.approved.is_empty());
	}

	#[test]
	fn receipt_return_is_base64() {
		let lookup: MsgLookup = serde_json::from_value(json!({
			"Message": { "/": "bafy2bzaceaa" },
			"Receipt": { "ExitCode": 0, "Return": "gw==", "GasUsed": 100 },
			"Height": 10
		}))
		.unwrap();
		assert_eq!(lookup.receipt.exit_code, 0);
		assert_eq!(lookup.receipt.ret, vec![0x83]);
	}

	#[test]
	fn cid_json_shape() {
		use multihash::{Code, MultihashDigest};
		let cid = Cid::new_v1(0x71, Code::Blake2b256.digest(b"message"));
		let v = serde_json::to_value(CidJson::new(&cid)).unwrap();
		assert_eq!(v, json!({ "/": cid.to_string() }));
		assert_eq!(CidJson { cid: cid.to_string() }.parse("test").unwrap(), cid);
	}
}
