use super::crypto;
use crate::errors::{LedgerError, LedgerResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base58 encoded account address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string after checking its shape and checksum
    pub fn parse(value: &str) -> LedgerResult<Self> {
        let raw = bs58::decode(value)
            .into_vec()
            .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", value, e)))?;
        if !crypto::is_valid_address(&raw) {
            return Err(LedgerError::InvalidAddress(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw 26 byte form used in signing payloads
    pub fn to_bytes(&self) -> LedgerResult<[u8; crypto::ADDRESS_LENGTH]> {
        let raw = bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", self.0, e)))?;
        raw.try_into()
            .map_err(|_| LedgerError::InvalidAddress(self.0.clone()))
    }

    /// Chain id byte embedded in the address
    pub fn chain_id(&self) -> LedgerResult<u8> {
        Ok(self.to_bytes()?[1])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Address {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<String> for Address {
    fn eq(&self, other: &String) -> bool {
        &self.0 == other
    }
}

/// An ed25519 key pair bound to a chain, derived from a seed
#[derive(Clone)]
pub struct Account {
    signing_key: SigningKey,
    chain_id: u8,
    address: Address,
}

impl Account {
    /// Derive an account from a seed string; the same seed always yields the same account
    pub fn from_seed(seed: &str, chain_id: u8) -> Self {
        let signing_key = crypto::signing_key_from_seed(seed);
        let raw = crypto::address_bytes(signing_key.verifying_key().as_bytes(), chain_id);
        Self {
            signing_key,
            chain_id,
            address: Address(bs58::encode(raw).into_string()),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn chain_id(&self) -> u8 {
        self.chain_id
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Base58 public key as sent in broadcast bodies
    pub fn public_key_base58(&self) -> String {
        bs58::encode(self.public_key().as_bytes()).into_string()
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature).is_ok()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("chain_id", &(self.chain_id as char))
            .finish()
    }
}
