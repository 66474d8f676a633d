use k256::ecdsa::{RecoveryId, Signature, SigningKey};

use crate::address::Address;
use crate::crypto;
use crate::error::SignerError;
use crate::message::SigType;

const SCHEME: &str = "secp256k1";

/// secp256k1 accounts: the address hashes the uncompressed public key and
/// signatures are recoverable `r || s || v` over blake2b-256 of the input.
pub struct Secp256k1Signer;

fn signing_key(private_key: &[u8]) -> Result<SigningKey, SignerError> {
	SigningKey::from_slice(private_key).map_err(|_| SignerError::InvalidKey { scheme: SCHEME })
}

impl super::Signer for Secp256k1Signer {
	fn generate_key(&self) -> Result<Vec<u8>, SignerError> {
		// Out-of-range scalars are astronomically rare; retry a few times.
		for _ in 0..8 {
			let candidate: [u8; 32] = rand::random();
			if let Ok(key) = SigningKey::from_slice(&candidate) {
				return Ok(key.to_bytes().to_vec());
			}
		}
		Err(SignerError::KeyGen { scheme: SCHEME })
	}

	fn to_address(&self, private_key: &[u8]) -> Result<Address, SignerError> {
		let key = signing_key(private_key)?;
		let point = key.verifying_key().to_encoded_point(false);
		Address::new_secp256k1(point.as_bytes()).map_err(|e| SignerError::Signing {
			scheme: SCHEME,
			reason: e.to_string(),
		})
	}

	fn sign(&self, private_key: &[u8], msg: &[u8]) -> Result<Vec<u8>, SignerError> {
		let key = signing_key(private_key)?;
		let digest = crypto::blake2b_256(msg);
		let (sig, recovery): (Signature, RecoveryId) = key
			.sign_prehash_recoverable(&digest)
			.map_err(|e| SignerError::Signing {
				scheme: SCHEME,
				reason: e.to_string(),
			})?;

		let mut out = Vec::with_capacity(65);
		out.extend_from_slice(&sig.to_bytes());
		out.push(recovery.to_byte());
		Ok(out)
	}

	fn sig_type(&self) -> SigType {
		SigType::Secp256k1
	}
}
