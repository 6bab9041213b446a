//! Ledger client primitives
//!
//! This module provides what scenarios need from a ledger client library:
//! - **Account** - ed25519 accounts derived from seed strings, base58 addresses
//! - **Transaction** - intents per kind, signing payloads, broadcast JSON
//! - **Crypto** - hashing and key derivation helpers
//!
//! Nothing here talks to the network; broadcasting lives in [`crate::node`].

pub mod account;
pub mod crypto;
pub mod transaction;

// Re-export main types
pub use account::{Account, Address};
pub use transaction::{
    SignedTransaction, TransactionIntent, TransactionKind, UnsignedTransaction, DEFAULT_VERSION,
};
