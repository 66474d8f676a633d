use anyhow::Result;

use crate::cli::{Cli, MsigCommand};
use crate::commands::{build_engine, progress};
use crate::engine::{Engine, Proposal, ProposalView};
use crate::progress::Progress;

pub async fn run(cli: &Cli, cmd: &MsigCommand) -> Result<()> {
	let engine = build_engine(cli)?;
	let progress = progress(cli);
	let result = dispatch(&engine, cmd, progress.as_ref()).await;
	engine.close();
	result
}

async fn dispatch(engine: &Engine, cmd: &MsigCommand, progress: &dyn Progress) -> Result<()> {
	match cmd {
		MsigCommand::Create {
			key,
			signers,
			threshold,
			unlock_duration,
			value,
		} => {
			let created = engine
				.create_multisig(&key.key, signers, threshold, unlock_duration, value, progress)
				.await?;
			println!("ID address:     {}", created.id_address);
			println!("Robust address: {}", created.robust_address);
		}
		MsigCommand::AddSigner { key, msig, signer, increase } => {
			let p = engine
				.propose_add_signer(&key.key, msig, signer, *increase, progress)
				.await?;
			print_proposal(&p);
		}
		MsigCommand::RemoveSigner { key, msig, signer, decrease } => {
			let p = engine
				.propose_remove_signer(&key.key, msig, signer, *decrease, progress)
				.await?;
			print_proposal(&p);
		}
		MsigCommand::SwapSigner { key, msig, old, new } => {
			let p = engine
				.propose_swap_signer(&key.key, msig, old, new, progress)
				.await?;
			print_proposal(&p);
		}
		MsigCommand::Threshold { key, msig, threshold } => {
			let p = engine
				.propose_change_threshold(&key.key, msig, threshold, progress)
				.await?;
			print_proposal(&p);
		}
		MsigCommand::Lock {
			key,
			msig,
			start,
			duration,
			amount,
		} => {
			let p = engine
				.propose_lock_balance(&key.key, msig, start, duration, amount, progress)
				.await?;
			print_proposal(&p);
		}
		MsigCommand::Approve { key, msig, txn_id } => {
			let approval = engine.approve(&key.key, msig, txn_id, progress).await?;
			println!("Message:  {}", approval.cid);
			if approval.applied {
				println!("Executed: exit code {}", approval.code);
				if !approval.ret.is_empty() {
					println!("Return:   {:?}", approval.ret);
				}
			} else {
				println!("Approved, threshold not reached yet");
			}
		}
		MsigCommand::Cancel { key, msig, txn_id } => {
			let cid = engine.cancel(&key.key, msig, txn_id, progress).await?;
			println!("Message:  {cid}");
		}
		MsigCommand::Pending { msig, json } => {
			let views = engine.pending_proposals(msig, progress).await?;
			if *json {
				println!("{}", serde_json::to_string_pretty(&views)?);
			} else {
				print_pending(&views);
			}
		}
	}
	Ok(())
}

fn print_proposal(p: &Proposal) {
	println!("Proposed: {}", p.msig);
	println!("Txn ID:   {}", p.txn_id);
}

fn print_pending(views: &[ProposalView]) {
	if views.is_empty() {
		println!("No pending transactions.");
		return;
	}
	for v in views {
		println!("#{}  {} -> {}", v.id, v.method, v.to);
		println!("    value:    {}", v.value);
		println!("    params:   {}", v.params);
		let approved: Vec<String> = v.approved.iter().map(ToString::to_string).collect();
		println!("    approved: {}", approved.join(", "));
	}
}
