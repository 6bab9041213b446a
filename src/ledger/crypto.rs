//! Hashing and key derivation primitives
//!
//! Accounts are derived from a seed string and addresses are built from
//! the public key, both through `secure_hash = sha256(blake2b256(x))`.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::SigningKey;
use sha2::Sha256;

type Blake2b256 = Blake2b<U32>;

/// Address version byte
pub const ADDRESS_VERSION: u8 = 0x01;

/// Length of a decoded address
pub const ADDRESS_LENGTH: usize = 26;

/// Length of the address checksum
pub const CHECKSUM_LENGTH: usize = 4;

/// Length of the public key hash embedded in an address
pub const KEY_HASH_LENGTH: usize = 20;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// `sha256(blake2b256(data))`
pub fn secure_hash(data: &[u8]) -> [u8; 32] {
    sha256(&blake2b256(data))
}

/// Deterministically derive a signing key from a seed string
///
/// The seed is prefixed with a zero nonce, secure-hashed, then sha256'd into
/// the 32 byte ed25519 secret.
pub fn signing_key_from_seed(seed: &str) -> SigningKey {
    let mut input = Vec::with_capacity(4 + seed.len());
    input.extend_from_slice(&0u32.to_be_bytes());
    input.extend_from_slice(seed.as_bytes());

    let secret = sha256(&secure_hash(&input));
    SigningKey::from_bytes(&secret)
}

/// Build the raw 26 byte address for a public key on a chain
pub fn address_bytes(public_key: &[u8; 32], chain_id: u8) -> [u8; ADDRESS_LENGTH] {
    let mut out = [0u8; ADDRESS_LENGTH];
    out[0] = ADDRESS_VERSION;
    out[1] = chain_id;
    out[2..2 + KEY_HASH_LENGTH].copy_from_slice(&secure_hash(public_key)[..KEY_HASH_LENGTH]);

    let body_len = ADDRESS_LENGTH - CHECKSUM_LENGTH;
    let checksum = secure_hash(&out[..body_len]);
    out[body_len..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
    out
}

/// Check version byte and checksum of a raw address
pub fn is_valid_address(raw: &[u8]) -> bool {
    if raw.len() != ADDRESS_LENGTH || raw[0] != ADDRESS_VERSION {
        return false;
    }
    let body_len = ADDRESS_LENGTH - CHECKSUM_LENGTH;
    secure_hash(&raw[..body_len])[..CHECKSUM_LENGTH] == raw[body_len..]
}
