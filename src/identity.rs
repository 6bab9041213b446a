//! Label to account derivation
//!
//! Scenario actors are named with short labels ("Alice", "Bob"). A label
//! shorter than the minimum seed length is right-padded with a filler
//! character and the padded string is used as the account seed. The mapping
//! is pure: no cache, no network.

use crate::config::{AccountsConfig, AppConfig};
use crate::errors::AppError;
use crate::ledger::Account;
use std::fmt;

/// A short human name for a test actor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalised seed for this label
    pub fn seed(&self, min_length: usize, filler: char) -> String {
        seed_for(&self.0, min_length, filler)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Use `name` verbatim when long enough, otherwise right-pad it with `filler`
///
/// Length is counted in characters, so multi-byte labels pad the same way
/// as ASCII ones.
///
/// # Examples
/// ```
/// use ledger_e2e::identity::seed_for;
///
/// assert_eq!(seed_for("Alice", 15, 'a'), "Aliceaaaaaaaaaa");
/// assert_eq!(seed_for("a much longer seed phrase", 15, 'a'), "a much longer seed phrase");
/// ```
pub fn seed_for(name: &str, min_length: usize, filler: char) -> String {
    let len = name.chars().count();
    if len >= min_length {
        return name.to_string();
    }
    let mut seed = String::with_capacity(name.len() + (min_length - len) * filler.len_utf8());
    seed.push_str(name);
    seed.extend(std::iter::repeat(filler).take(min_length - len));
    seed
}

/// Derives accounts for labels under one chain and padding rule
#[derive(Debug, Clone)]
pub struct IdentityDeriver {
    chain_id: u8,
    accounts: AccountsConfig,
}

impl IdentityDeriver {
    pub fn new(chain_id: u8, accounts: AccountsConfig) -> Self {
        Self { chain_id, accounts }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let chain_id = config.node.chain_id_byte()?;
        Ok(Self::new(chain_id, config.accounts.clone()))
    }

    pub fn chain_id(&self) -> u8 {
        self.chain_id
    }

    /// Seed that `label` maps to
    pub fn seed(&self, label: &Label) -> String {
        label.seed(self.accounts.min_seed_length, self.accounts.seed_filler)
    }

    /// Account for a label; recomputed on every call
    pub fn account(&self, label: &Label) -> Account {
        Account::from_seed(&self.seed(label), self.chain_id)
    }

    /// The funding account
    pub fn root(&self) -> Account {
        self.account(&Label::new(self.accounts.root_seed.clone()))
    }
}
