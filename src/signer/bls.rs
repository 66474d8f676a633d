use blst::min_pk::SecretKey;

use crate::address::Address;
use crate::error::SignerError;
use crate::message::SigType;

const SCHEME: &str = "bls";

/// Domain separation tag of Filecoin BLS signatures.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// BLS12-381 accounts: public keys in G1 (48 bytes), signatures in G2
/// (96 bytes). Private keys are serialized little-endian.
pub struct BlsSigner;

fn secret_key(private_key: &[u8]) -> Result<SecretKey, SignerError> {
	let mut be = private_key.to_vec();
	be.reverse();
	SecretKey::from_bytes(&be).map_err(|_| SignerError::InvalidKey { scheme: SCHEME })
}

impl super::Signer for BlsSigner {
	fn generate_key(&self) -> Result<Vec<u8>, SignerError> {
		let ikm: [u8; 32] = rand::random();
		let key = SecretKey::key_gen(&ikm, &[]).map_err(|_| SignerError::KeyGen { scheme: SCHEME })?;
		let mut le = key.to_bytes().to_vec();
		le.reverse();
		Ok(le)
	}

	fn to_address(&self, private_key: &[u8]) -> Result<Address, SignerError> {
		let key = secret_key(private_key)?;
		Address::new_bls(&key.sk_to_pk().compress()).map_err(|e| SignerError::Signing {
			scheme: SCHEME,
			reason: e.to_string(),
		})
	}

	fn sign(&self, private_key: &[u8], msg: &[u8]) -> Result<Vec<u8>, SignerError> {
		let key = secret_key(private_key)?;
		Ok(key.sign(msg, DST, &[]).compress().to_vec())
	}

	fn sig_type(&self) -> SigType {
		SigType::Bls
	}
}
