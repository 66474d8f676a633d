use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::address;

#[derive(Parser)]
#[command(
	name = "filmsig",
	about = "Sign and submit Filecoin messages, directly or through a multisig wallet.",
	version
)]
pub struct Cli {
	/// Config file [default: ~/.filmsig/config.toml].
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	/// Override the Lotus RPC endpoint.
	#[arg(long, global = true)]
	pub endpoint: Option<String>,

	/// Override the network used for address prefixes.
	#[arg(long, global = true)]
	pub network: Option<Network>,

	/// Log more (-v info, -vv debug).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// No progress bar.
	#[arg(short, long, global = true)]
	pub quiet: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Network {
	Mainnet,
	Testnet,
}

impl From<Network> for address::Network {
	fn from(n: Network) -> Self {
		match n {
			Network::Mainnet => Self::Mainnet,
			Network::Testnet => Self::Testnet,
		}
	}
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KeyTypeArg {
	Bls,
	Secp256k1,
}

impl KeyTypeArg {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Bls => "bls",
			Self::Secp256k1 => "secp256k1",
		}
	}
}

/// Hex key record of the signing account.
#[derive(Args)]
pub struct KeyArg {
	/// Hex-encoded key record (Lotus `wallet export` format).
	#[arg(long, env = "FILMSIG_KEY", hide_env_values = true)]
	pub key: String,
}

#[derive(Subcommand)]
pub enum Command {
	/// Generate, inspect and transform key records.
	Key {
		#[command(subcommand)]
		command: KeyCommand,
	},

	/// Transfer FIL.
	Send {
		#[command(flatten)]
		key: KeyArg,

		/// Recipient address.
		to: String,

		/// Amount, e.g. "1.5" or "1.5 FIL".
		amount: String,

		/// Propose through this multisig wallet instead of sending directly.
		#[arg(long)]
		msig: Option<String>,
	},

	/// Manage a storage miner's owner, worker and balance.
	Miner {
		#[command(subcommand)]
		command: MinerCommand,
	},

	/// Create multisig wallets and drive their proposals.
	Msig {
		#[command(subcommand)]
		command: MsigCommand,
	},

	/// Manage the config file.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
}

#[derive(Subcommand)]
pub enum KeyCommand {
	/// Generate a new random key.
	New {
		#[arg(long = "type", value_enum, default_value = "secp256k1")]
		key_type: KeyTypeArg,
	},

	/// Print the address a key controls.
	Address {
		#[command(flatten)]
		key: KeyArg,
	},

	/// Encrypt a key record with the configured aes_key.
	Encrypt {
		#[command(flatten)]
		key: KeyArg,
	},

	/// Decrypt a key record with the configured aes_key.
	Decrypt {
		#[command(flatten)]
		key: KeyArg,
	},

	/// Sign hex-encoded bytes.
	Sign {
		#[command(flatten)]
		key: KeyArg,

		/// Hex-encoded message.
		message: String,
	},
}

#[derive(Subcommand)]
pub enum MinerCommand {
	/// Propose a new owner (step 1 of 2).
	ProposeOwner {
		#[command(flatten)]
		key: KeyArg,

		/// Miner actor address.
		miner: String,

		/// New owner address.
		new_owner: String,

		#[arg(long)]
		msig: Option<String>,
	},

	/// Accept ownership as the new owner (step 2 of 2).
	ConfirmOwner {
		#[command(flatten)]
		key: KeyArg,

		miner: String,

		#[arg(long)]
		msig: Option<String>,
	},

	/// Withdraw available balance to the owner.
	Withdraw {
		#[command(flatten)]
		key: KeyArg,

		miner: String,

		/// Amount in FIL.
		amount: String,

		#[arg(long)]
		msig: Option<String>,
	},

	/// Request a worker change (applied after a delay).
	ChangeWorker {
		#[command(flatten)]
		key: KeyArg,

		miner: String,

		new_worker: String,

		/// Control address; repeat for several.
		#[arg(long = "control")]
		controls: Vec<String>,

		#[arg(long)]
		msig: Option<String>,
	},

	/// Apply a pending worker change.
	ConfirmWorker {
		#[command(flatten)]
		key: KeyArg,

		miner: String,

		#[arg(long)]
		msig: Option<String>,
	},
}

#[derive(Subcommand)]
pub enum MsigCommand {
	/// Create a multisig wallet.
	Create {
		#[command(flatten)]
		key: KeyArg,

		/// Signer address; repeat for each signer.
		#[arg(long = "signer")]
		signers: Vec<String>,

		/// Approvals required to execute a transaction.
		#[arg(long)]
		threshold: String,

		/// Vesting duration of the initial balance, in epochs.
		#[arg(long, default_value = "0")]
		unlock_duration: String,

		/// Initial balance in FIL.
		#[arg(long, default_value = "0")]
		value: String,
	},

	/// Propose adding a signer.
	AddSigner {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		signer: String,

		/// Also raise the threshold by one.
		#[arg(long)]
		increase: bool,
	},

	/// Propose removing a signer.
	RemoveSigner {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		signer: String,

		/// Also lower the threshold by one.
		#[arg(long)]
		decrease: bool,
	},

	/// Propose replacing one signer with another.
	SwapSigner {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		old: String,

		new: String,
	},

	/// Propose a new approval threshold.
	Threshold {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		threshold: String,
	},

	/// Propose locking part of the wallet balance.
	Lock {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		#[arg(long)]
		start: String,

		#[arg(long)]
		duration: String,

		/// Amount in FIL.
		#[arg(long)]
		amount: String,
	},

	/// Approve a pending transaction.
	Approve {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		txn_id: String,
	},

	/// Cancel a pending transaction you proposed.
	Cancel {
		#[command(flatten)]
		key: KeyArg,

		msig: String,

		txn_id: String,
	},

	/// List pending transactions with decoded parameters.
	Pending {
		msig: String,

		/// Print JSON instead of text.
		#[arg(long)]
		json: bool,
	},
}

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Write a default config file.
	Init {
		/// Overwrite an existing file.
		#[arg(long)]
		force: bool,
	},

	/// Print the active config, secrets masked.
	Show,
}
