use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256, Block};

use crate::error::KeyError;
use crate::keyinfo::KeyInfo;

// -- Hashing --

/// blake2b with a 4-byte digest, used for address checksums.
pub fn checksum(data: &[u8]) -> [u8; 4] {
	blake2b::<4>(data)
}

/// blake2b-160, the payload hash of secp256k1 and actor addresses.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
	blake2b::<20>(data)
}

/// blake2b-256, the digest secp256k1 signatures are computed over.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
	blake2b::<32>(data)
}

fn blake2b<const N: usize>(data: &[u8]) -> [u8; N] {
	let hash = blake2b_simd::Params::new().hash_length(N).hash(data);
	let mut out = [0u8; N];
	out.copy_from_slice(hash.as_bytes());
	out
}

// -- Key material codec --

/// Reversible transform over 32-byte private keys so an operator can
/// keep an "encrypted" key record instead of the raw one.
///
/// The key is treated as two 16-byte AES-256 blocks transformed
/// independently: no IV, no chaining. Identical halves produce identical
/// ciphertext halves, so this hides nothing from someone holding more than
/// one record. It is kept bit-compatible with records already in use.
pub struct KeyCodec {
	cipher: Aes256,
}

impl KeyCodec {
	pub fn new(key: &[u8; 32]) -> Self {
		Self {
			cipher: Aes256::new(GenericArray::from_slice(key)),
		}
	}

	pub fn encrypt(&self, ki: &KeyInfo) -> Result<KeyInfo, KeyError> {
		self.transform(ki, |cipher, block| cipher.encrypt_block(block))
	}

	pub fn decrypt(&self, ki: &KeyInfo) -> Result<KeyInfo, KeyError> {
		self.transform(ki, |cipher, block| cipher.decrypt_block(block))
	}

	fn transform<F>(&self, ki: &KeyInfo, apply: F) -> Result<KeyInfo, KeyError>
	where
		F: Fn(&Aes256, &mut Block),
	{
		if ki.private_key.len() != 32 {
			return Err(KeyError::Size(ki.private_key.len()));
		}

		let mut out = Vec::with_capacity(32);
		for half in ki.private_key.chunks_exact(16) {
			let mut block = GenericArray::clone_from_slice(half);
			apply(&self.cipher, &mut block);
			out.extend_from_slice(&block);
		}

		Ok(KeyInfo {
			key_type: ki.key_type,
			private_key: out,
		})
	}
}
