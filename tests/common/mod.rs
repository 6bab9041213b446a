//! Common Test Utilities
//!
//! Shared helpers for the unit and integration suites: an in-memory node
//! and configuration tuned for fast polling.

#![allow(dead_code)]

pub mod fake_node;

pub use fake_node::FakeNode;

use ledger_e2e::config::AppConfig;
use ledger_e2e::identity::{IdentityDeriver, Label};
use ledger_e2e::ledger::Address;

/// Balance given to the root account of every fake node
pub const ROOT_BALANCE: u64 = 1_000_000 * 100_000_000;

/// Default configuration with a 10 ms poll interval and a 1 s wait budget
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.polling.interval_ms = 10;
    config.polling.timeout_seconds = 1;
    config
}

pub fn deriver(config: &AppConfig) -> IdentityDeriver {
    IdentityDeriver::from_config(config).unwrap()
}

/// Address a label maps to under `config`
pub fn address_of(config: &AppConfig, label: &str) -> Address {
    deriver(config).account(&Label::new(label)).address().clone()
}

/// A fake node whose root account is funded
pub fn funded_node(config: &AppConfig) -> FakeNode {
    let node = FakeNode::new();
    node.set_balance(deriver(config).root().address(), ROOT_BALANCE);
    node
}

/// Units to minor units at the default precision
pub fn lto(units: u64) -> u64 {
    units * 100_000_000
}
