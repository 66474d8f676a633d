pub mod bls;
pub mod secp;

use crate::address::Address;
use crate::error::SignerError;
use crate::keyinfo::KeyType;
use crate::message::SigType;

/// A signature scheme. Implementations are pure: no key storage, no I/O.
pub trait Signer: Send + Sync {
	/// Fresh random private key in the scheme's serialized form.
	fn generate_key(&self) -> Result<Vec<u8>, SignerError>;

	/// The account address controlled by `private_key`.
	fn to_address(&self, private_key: &[u8]) -> Result<Address, SignerError>;

	/// Sign `msg` (for messages, the CID bytes) with `private_key`.
	fn sign(&self, private_key: &[u8], msg: &[u8]) -> Result<Vec<u8>, SignerError>;

	fn sig_type(&self) -> SigType;
}

/// Pick the signer matching a key record's type.
pub fn for_key_type(key_type: KeyType) -> Box<dyn Signer> {
	match key_type {
		KeyType::Bls => Box::new(bls::BlsSigner),
		KeyType::Secp256k1 => Box::new(secp::Secp256k1Signer),
	}
}
